//! # Config Loader
//!
//! Locates configuration files on disk and returns their raw text. Parsing
//! is left to the caller.
//!
//! ```no_run
//! use config_loader::{find_config_file, load_config_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Search the usual locations
//!     let path = find_config_file("codec.json")?;
//!     let content = load_config_file(&path)?;
//!
//!     // Or read an explicit path
//!     let content = load_config_file("./config/codec.json")?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted first by [`find_config_file`].
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Reads a configuration file into a `String`.
///
/// # Examples
///
/// ```no_run
/// use config_loader::load_config_file;
///
/// let content = load_config_file("./config/codec.json")?;
/// println!("Config content: {}", content);
/// # Ok::<(), config_loader::ConfigError>(())
/// ```
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    })
}

/// Searches for a configuration file in the usual locations.
///
/// Order:
/// 1. The path in the `CONFIG_PATH` environment variable, if it exists
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    let env_path = env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    find_config_file_in(filename, env_path, Path::new("."))
}

/// Same search as [`find_config_file`], rooted at `base` instead of the
/// working directory and with the override path passed in explicitly.
pub fn find_config_file_in(
    filename: &str,
    override_path: Option<PathBuf>,
    base: &Path,
) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
    }

    let candidates = [base.join("config").join(filename), base.join(filename)];
    if let Some(found) = candidates.into_iter().find(|candidate| candidate.is_file()) {
        return Ok(found);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: {} env var, {}/config/{}, {}/{}",
        filename,
        CONFIG_PATH_VAR,
        base.display(),
        filename,
        base.display(),
        filename
    )))
}

/// Finds and loads a configuration file in one step.
///
/// ```no_run
/// use config_loader::find_and_load;
///
/// let content = find_and_load("codec.json")?;
/// # Ok::<(), config_loader::ConfigError>(())
/// ```
pub fn find_and_load(filename: &str) -> Result<String> {
    let path = find_config_file(filename)?;
    load_config_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config_file("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let result = load_config_file(dir.path());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codec.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_find_prefers_config_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config").join("codec.json"), "{}").unwrap();
        fs::write(dir.path().join("codec.json"), "{}").unwrap();

        let found = find_config_file_in("codec.json", None, dir.path()).unwrap();
        assert_eq!(found, dir.path().join("config").join("codec.json"));
    }

    #[test]
    fn test_find_override_wins() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.json");
        fs::write(&custom, "{}").unwrap();
        fs::write(dir.path().join("codec.json"), "{}").unwrap();

        let found = find_config_file_in("codec.json", Some(custom.clone()), dir.path()).unwrap();
        assert_eq!(found, custom);
    }

    #[test]
    fn test_find_missing_override_falls_through() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("codec.json"), "{}").unwrap();

        let found = find_config_file_in(
            "codec.json",
            Some(dir.path().join("missing.json")),
            dir.path(),
        )
        .unwrap();
        assert_eq!(found, dir.path().join("codec.json"));
    }

    #[test]
    fn test_find_nonexistent_file() {
        let dir = tempdir().unwrap();
        let err = find_config_file_in("codec.json", None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("'codec.json' not found"));
    }
}
