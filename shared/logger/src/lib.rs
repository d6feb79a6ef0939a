//! Leveled logging with file and in-memory destinations.
//!
//! File loggers hand each line to a dedicated writer thread so callers never
//! block on disk I/O. In-memory loggers record lines synchronously and are
//! what tests use to assert on diagnostics.

pub mod error;
mod log_level;
mod log_message;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::{LogCapture, Logger};
