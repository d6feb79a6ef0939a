//! Thread-safe logger handle.
//!
//! A [`Logger`] either appends to a file through a dedicated writer thread
//! or keeps its lines in memory, where a [`LogCapture`] can read them back.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_writer::{Destination, spawn_file_destination};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Thread-safe, cloneable logger.
///
/// Clones share the same destination.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, Logger};
///
/// let (logger, capture) = Logger::in_memory(LogLevel::Info);
/// logger.info("Codec ready");
/// logger.debug("Filtered out");
/// assert_eq!(capture.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    destination: Destination,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

/// Read side of an in-memory logger.
#[derive(Clone, Debug)]
pub struct LogCapture {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
    /// Returns a snapshot of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True if any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Logger {
    /// Creates a logger that appends to `log_path`.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        Ok(Logger {
            destination: spawn_file_destination(&log_path)?,
            level,
            component: None,
            console_output: false,
        })
    }

    /// Creates a file logger tagged with a component name, optionally
    /// echoing every line to stdout.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: String,
        console_output: bool,
    ) -> Result<Self> {
        Ok(Logger {
            destination: spawn_file_destination(&log_path)?,
            level,
            component: Some(component),
            console_output,
        })
    }

    /// Creates a logger that records lines in memory.
    ///
    /// Writes are synchronous, so a line is visible through the returned
    /// [`LogCapture`] as soon as the logging call returns.
    pub fn in_memory(level: LogLevel) -> (Self, LogCapture) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger {
            destination: Destination::Memory(lines.clone()),
            level,
            component: None,
            console_output: false,
        };
        (logger, LogCapture { lines })
    }

    /// Returns a logger sharing this one's destination and level under a
    /// different component name.
    ///
    /// ```
    /// use logging::{LogLevel, Logger};
    ///
    /// let (logger, capture) = Logger::in_memory(LogLevel::Debug);
    /// logger.for_component("json_codec").warn("limit hit");
    /// assert!(capture.contains("[component: json_codec]: limit hit"));
    /// ```
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(component.to_string()),
            ..self.clone()
        }
    }

    /// Minimum level this logger records.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message at `level` would be recorded.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let msg = LogMessage::new(level, self.component.as_deref(), message);
        if self.console_output {
            println!("{}", msg.line());
        }
        self.destination.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn wait_for_write() {
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_logger_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Debug).unwrap();
        logger.info("Test message");
        wait_for_write();

        assert!(log_path.exists());
        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Test message"));
    }

    #[test]
    fn test_in_memory_respects_level() {
        let (logger, capture) = Logger::in_memory(LogLevel::Warn);
        logger.debug("Debug message");
        logger.info("Info message");
        logger.warn("Warn message");
        logger.error("Error message");

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WARN: Warn message"));
        assert!(lines[1].contains("ERROR: Error message"));
    }

    #[test]
    fn test_in_memory_clone_across_threads() {
        let (logger, capture) = Logger::in_memory(LogLevel::Info);
        let logger_clone = logger.clone();

        thread::spawn(move || logger_clone.info("Message from thread"))
            .join()
            .unwrap();
        logger.info("Message from main");

        assert!(capture.contains("Message from thread"));
        assert!(capture.contains("Message from main"));
    }

    #[test]
    fn test_for_component_shares_destination() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let codec_logger = logger.for_component("codec");
        logger.info("plain");
        codec_logger.info("tagged");
        drop(logger);
        drop(codec_logger);
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("INFO: plain"));
        assert!(content.contains("INFO [component: codec]: tagged"));
    }

    #[test]
    fn test_capture_after_panicking_writer() {
        let (logger, capture) = Logger::in_memory(LogLevel::Info);
        let poisoner = capture.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.lines.lock().unwrap();
            panic!("poison the capture");
        })
        .join();

        logger.warn("still recorded");
        assert!(capture.contains("WARN: still recorded"));
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn test_enabled() {
        let (logger, _capture) = Logger::in_memory(LogLevel::Info);
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(logger.enabled(LogLevel::Error));
        assert_eq!(logger.level(), LogLevel::Info);
    }
}
