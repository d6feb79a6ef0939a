//! Error types for JSON codec operations.

use config_loader::ConfigError;
use logging::LoggingError;
use std::fmt;
use std::io;

/// Result type for JSON codec operations.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Error type for serialization and deserialization failures.
///
/// Every variant fails the whole call; there is no partial-result mode.
#[derive(Debug)]
pub enum JsonError {
    /// The configured byte or nesting budget was exceeded mid-parse.
    ResourceLimitExceeded {
        /// Name of the exhausted resource ("bytes" or "depth").
        resource: &'static str,
        /// Configured ceiling.
        limit: usize,
        /// Amount consumed when the parse was aborted.
        consumed: usize,
    },
    /// The input is not well-formed JSON.
    MalformedInput {
        /// Byte offset where the problem was detected.
        offset: usize,
        /// Human-readable description.
        reason: String,
    },
    /// A JSON value does not fit the statically expected target shape.
    FieldTypeMismatch {
        /// What the target slot accepts.
        expected: String,
        /// What the input provided.
        found: String,
    },
    /// The output sink rejected a write.
    SinkWriteFailure(io::Error),
    /// The byte source failed while being read.
    SourceReadFailure(io::Error),
    /// Codec configuration could not be loaded.
    Config(ConfigError),
    /// The configured logger could not be set up.
    Logging(LoggingError),
}

/// Coarse classification of a [`JsonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceLimitExceeded,
    MalformedInput,
    FieldTypeMismatch,
    SinkWriteFailure,
    SourceReadFailure,
    Config,
    Logging,
}

impl JsonError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::ResourceLimitExceeded { .. } => ErrorKind::ResourceLimitExceeded,
            JsonError::MalformedInput { .. } => ErrorKind::MalformedInput,
            JsonError::FieldTypeMismatch { .. } => ErrorKind::FieldTypeMismatch,
            JsonError::SinkWriteFailure(_) => ErrorKind::SinkWriteFailure,
            JsonError::SourceReadFailure(_) => ErrorKind::SourceReadFailure,
            JsonError::Config(_) => ErrorKind::Config,
            JsonError::Logging(_) => ErrorKind::Logging,
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        JsonError::MalformedInput {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        JsonError::FieldTypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::ResourceLimitExceeded {
                resource,
                limit,
                consumed,
            } => write!(
                f,
                "Resource limit exceeded: {} {} over limit of {}",
                resource, consumed, limit
            ),
            JsonError::MalformedInput { offset, reason } => {
                write!(f, "Malformed JSON at byte {}: {}", offset, reason)
            }
            JsonError::FieldTypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            JsonError::SinkWriteFailure(err) => write!(f, "Sink write failed: {}", err),
            JsonError::SourceReadFailure(err) => write!(f, "Source read failed: {}", err),
            JsonError::Config(err) => write!(f, "Configuration error: {}", err),
            JsonError::Logging(err) => write!(f, "Logger setup failed: {}", err),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::SinkWriteFailure(err) | JsonError::SourceReadFailure(err) => Some(err),
            JsonError::Config(err) => Some(err),
            JsonError::Logging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for JsonError {
    fn from(err: ConfigError) -> Self {
        JsonError::Config(err)
    }
}

impl From<LoggingError> for JsonError {
    fn from(err: LoggingError) -> Self {
        JsonError::Logging(err)
    }
}
