//! composer-kit: locate, install and run PHP Composer.

pub mod cli;
pub mod composer;
pub mod config;
pub mod context;
pub mod detector;
pub mod download;
pub mod elevation;
pub mod environment;
pub mod error;
pub mod fixtures;
pub mod fsutil;
pub mod installer;
pub mod invoke;
pub mod platform;
pub mod probe;
pub mod runner;

pub use composer::{Composer, Options};
pub use error::{Error, ErrorKind, Result};
pub use fixtures::{clear_mock_outputs, setup_mock_output};
