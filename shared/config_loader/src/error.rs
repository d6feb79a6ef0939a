use std::fmt;
use std::io;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while locating or reading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No file exists at the given path, or none of the searched locations
    /// held one.
    FileNotFound(String),

    /// The file exists but could not be read as UTF-8 text.
    ReadError { path: String, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read configuration file {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::FileNotFound(_) => None,
        }
    }
}
