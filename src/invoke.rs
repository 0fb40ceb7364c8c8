//! Real subprocess execution with deadline, cancellation and combined output.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::context::{Done, RunContext};
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One call of the external tool.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Left unset when `None`.
    pub working_dir: Option<PathBuf>,
    /// Replaces the inherited environment when non-empty.
    pub env: Vec<(String, String)>,
}

impl InvocationRequest {
    pub fn new(program: impl Into<PathBuf>, args: &[impl AsRef<str>]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.as_ref().to_string()).collect(),
            working_dir: None,
            env: Vec::new(),
        }
    }
}

/// Run the request to completion or until `ctx` is done.
///
/// Output is stdout and stderr interleaved in arrival order. A non-zero exit
/// returns [`Error::CommandFailed`] carrying that output.
pub fn execute(ctx: &RunContext, request: &InvocationRequest) -> Result<String> {
    if let Some(done) = ctx.done() {
        return Err(done_error(done, String::new()));
    }

    let mut command = Command::new(&request.program);
    command
        .args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = request.working_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
        command.current_dir(dir);
    }
    if !request.env.is_empty() {
        command.env_clear().envs(request.env.iter().map(|(k, v)| (k, v)));
    }
    own_process_group(&mut command);

    log::debug!(
        "executing {} {}",
        request.program.display(),
        request.args.join(" ")
    );
    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: request.program.display().to_string(),
        source,
    })?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let mut pumps = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        pumps.push(pump(stdout, captured.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(pump(stderr, captured.clone()));
    }

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(err) => {
                terminate(&mut child);
                return Err(Error::io(
                    format!("failed waiting on {}", request.program.display()),
                    err,
                ));
            }
        }
        if let Some(done) = ctx.done() {
            terminate(&mut child);
            // Readers are left to finish on their own; a descendant that
            // escaped the group may still hold the pipes open.
            return Err(done_error(done, snapshot(&captured)));
        }
        thread::sleep(POLL_INTERVAL);
    };

    for handle in pumps {
        let _ = handle.join();
    }
    let output = snapshot(&captured);
    if status.success() {
        Ok(output)
    } else {
        Err(Error::CommandFailed { status, output })
    }
}

#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// Kill the child and everything in its process group, then reap it.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // The child leads its own group, see `own_process_group`.
            if unsafe { libc::killpg(pid, libc::SIGKILL) } == 0 {
                let _ = child.wait();
                return;
            }
            log::debug!(
                "killpg({}) failed: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn pump<R: Read + Send + 'static>(
    mut reader: R,
    sink: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => sink
                    .lock()
                    .expect("output buffer poisoned")
                    .extend_from_slice(&buf[..n]),
            }
        }
    })
}

fn snapshot(captured: &Mutex<Vec<u8>>) -> String {
    String::from_utf8_lossy(&captured.lock().expect("output buffer poisoned")).into_owned()
}

fn done_error(done: Done, output: String) -> Error {
    match done {
        Done::Canceled => Error::Canceled { output },
        Done::DeadlineExceeded => Error::DeadlineExceeded { output },
    }
}
