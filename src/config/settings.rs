//! Application settings and paths.
//!
//! Settings live in an optional JSON file under the XDG configuration
//! directory. They only supply defaults; command-line flags always win.

use crate::cli::OutputFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ScanMode, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsift)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("org", "portsift", "portsift")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Host scanned when `--addr` is not given.
    pub default_host: String,
    /// Default worker-pool capacity.
    pub default_concurrency: usize,
    /// Default timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default scan mode.
    pub default_mode: ScanMode,
    /// Default output format.
    pub default_output_format: OutputFormat,
    /// UDP payload, sent as UTF-8 bytes.
    pub udp_payload: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_host: "localhost".to_string(),
            default_concurrency: DEFAULT_CONCURRENCY,
            default_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            default_mode: ScanMode::Concurrent,
            default_output_format: OutputFormat::Plain,
            udp_payload: "data".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// A missing file is not an error; built-in defaults are used instead.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_host, "localhost");
        assert_eq!(settings.default_concurrency, 50);
        assert_eq!(settings.default_timeout_ms, 10);
        assert_eq!(settings.default_mode, ScanMode::Concurrent);
        assert_eq!(settings.udp_payload, "data");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_concurrency": 8, "default_mode": "sequential"}}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.default_concurrency, 8);
        assert_eq!(settings.default_mode, ScanMode::Sequential);
        assert_eq!(settings.default_timeout_ms, 10);
        assert_eq!(settings.default_host, "localhost");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppSettings::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = AppSettings::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_settings_file_name() {
        let paths = Paths {
            config_dir: PathBuf::from("/tmp/portsift"),
        };
        assert_eq!(paths.settings_file(), PathBuf::from("/tmp/portsift/settings.json"));
    }
}
