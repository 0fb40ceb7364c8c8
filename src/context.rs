//! Deadline and cancellation for a single invocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why a context stopped permitting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    Canceled,
    DeadlineExceeded,
}

/// Bounds an invocation in time and lets another thread cancel it.
#[derive(Debug, Clone)]
pub struct RunContext {
    deadline: Option<Instant>,
    canceled: Arc<AtomicBool>,
}

/// Cancels every invocation bound to the originating context.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::background()
    }
}

impl RunContext {
    /// No deadline; only explicit cancellation stops it.
    pub fn background() -> Self {
        Self {
            deadline: None,
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.canceled.clone())
    }

    /// `Some` once the context is canceled or past its deadline.
    pub fn done(&self) -> Option<Done> {
        if self.canceled.load(Ordering::SeqCst) {
            return Some(Done::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Done::DeadlineExceeded),
            _ => None,
        }
    }
}
