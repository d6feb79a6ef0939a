//! File-based codec configuration.
//!
//! The configuration document is itself JSON and is read with this codec:
//!
//! ```json
//! {
//!   "max_bytes": 1048576,
//!   "max_depth": 64,
//!   "ignore_empty_members": true,
//!   "log_level": "warn"
//! }
//! ```

use crate::deserializer::from_str_into;
use crate::error::Result;
use crate::impl_json;
use crate::options::{DEFAULT_MAX_DEPTH, DeserializeOptions, SerializeOptions};
use logging::{LogLevel, Logger};
use std::path::{Path, PathBuf};

/// Codec settings loaded from a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    /// Byte budget for each parse; `null` or absent means unlimited.
    pub max_bytes: Option<usize>,
    pub max_depth: usize,
    pub ignore_empty_members: bool,
    pub log_level: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_bytes: None,
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_empty_members: true,
            log_level: "info".to_string(),
        }
    }
}

impl_json! {
    CodecConfig {
        max_bytes: Option<usize>,
        max_depth: usize,
        ignore_empty_members: bool,
        log_level: String,
    }
}

impl CodecConfig {
    /// Parses a configuration document. Absent members keep their defaults.
    ///
    /// # Errors
    ///
    /// Besides parse errors, fails with [`JsonError::Logging`] when
    /// `log_level` names no known level.
    ///
    /// [`JsonError::Logging`]: crate::JsonError::Logging
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config = CodecConfig::default();
        from_str_into(&mut config, json)?;
        config.log_level()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = config_loader::load_config_file(path)?;
        Self::from_json(&content)
    }

    /// Locates `filename` in the usual places and loads it.
    pub fn find_and_load(filename: &str) -> Result<Self> {
        let content = config_loader::find_and_load(filename)?;
        Self::from_json(&content)
    }

    /// Log level to use for codec diagnostics.
    pub fn log_level(&self) -> Result<LogLevel> {
        Ok(self.log_level.parse::<LogLevel>()?)
    }

    /// Opens a file logger at the configured level, tagged `json_codec`.
    pub fn logger(&self, log_path: PathBuf) -> Result<Logger> {
        let level = self.log_level()?;
        Ok(Logger::with_component(
            log_path,
            level,
            "json_codec".to_string(),
            false,
        )?)
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            ignore_empty_members: self.ignore_empty_members,
        }
    }

    pub fn deserialize_options(&self, logger: Option<Logger>) -> DeserializeOptions {
        DeserializeOptions {
            max_bytes: self.max_bytes,
            max_depth: self.max_depth,
            logger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = CodecConfig::from_json(r#"{"max_bytes": 4000}"#).unwrap();
        assert_eq!(config.max_bytes, Some(4000));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.ignore_empty_members);
    }

    #[test]
    fn test_null_budget_is_unlimited() {
        let config = CodecConfig::from_json(r#"{"max_bytes": null, "log_level": "debug"}"#).unwrap();
        assert_eq!(config.max_bytes, None);
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = CodecConfig::from_json(r#"{"log_level": "verbose"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Logging);

        let config = CodecConfig {
            log_level: "loud".to_string(),
            ..CodecConfig::default()
        };
        assert_eq!(config.log_level().unwrap_err().kind(), ErrorKind::Logging);
        let dir = tempdir().unwrap();
        assert!(config.logger(dir.path().join("codec.log")).is_err());
    }

    #[test]
    fn test_logger_uses_configured_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("codec.log");
        let config = CodecConfig::from_json(r#"{"log_level": "WARN"}"#).unwrap();

        let logger = config.logger(log_path.clone()).unwrap();
        assert_eq!(logger.level(), LogLevel::Warn);
        logger.info("dropped");
        logger.warn("kept");
        drop(logger);
        std::thread::sleep(std::time::Duration::from_millis(100));

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("dropped"));
        assert!(content.contains("WARN [component: json_codec]: kept"));
    }

    #[test]
    fn test_options_mapping() {
        let config = CodecConfig {
            max_bytes: Some(10),
            max_depth: 4,
            ignore_empty_members: false,
            log_level: "warn".to_string(),
        };
        assert!(!config.serialize_options().ignore_empty_members);
        let options = config.deserialize_options(None);
        assert_eq!(options.max_bytes, Some(10));
        assert_eq!(options.max_depth, 4);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codec.json");
        fs::write(&path, r#"{"max_depth": 16, "ignore_empty_members": false}"#).unwrap();

        let config = CodecConfig::load_from_file(&path).unwrap();
        assert_eq!(config.max_depth, 16);
        assert!(!config.ignore_empty_members);
    }

    #[test]
    fn test_missing_file() {
        let err = CodecConfig::load_from_file("/path/that/does/not/exist.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_wrong_member_type() {
        let err = CodecConfig::from_json(r#"{"max_depth": "deep"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
    }
}
