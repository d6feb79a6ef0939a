//! Internal log message structure.

use crate::log_level::LogLevel;
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single formatted-on-demand log record.
#[derive(Debug, Clone)]
pub(crate) struct LogMessage {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogMessage {
    /// Creates a message stamped with the current local time.
    pub fn new(level: LogLevel, component: Option<&str>, message: &str) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            component: component.map(str::to_string),
            message: message.to_string(),
        }
    }

    /// `[timestamp] LEVEL [component: name]: message`, without newline.
    pub fn line(&self) -> String {
        match &self.component {
            Some(component) => format!(
                "[{}] {} [component: {}]: {}",
                self.timestamp, self.level, component, self.message
            ),
            None => format!("[{}] {}: {}", self.timestamp, self.level, self.message),
        }
    }
}
