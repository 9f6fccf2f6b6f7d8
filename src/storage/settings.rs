//! User settings for CrossDocs
//!
//! Settings are stored in `~/.config/crossdocs/config.toml` (or the platform
//! equivalent) and only affect how builds run, never how projects parse.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Timeout applied when the settings leave it unset or zero
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Build-related user settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Doxygen executable, looked up on `PATH` when not absolute
    pub doxygen_path: String,

    /// Seconds an external tool may run before the build is abandoned
    pub build_timeout_secs: u64,

    /// Folder for generated Doxyfiles and aggregated sources
    pub work_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            doxygen_path: "doxygen".to_string(),
            build_timeout_secs: DEFAULT_BUILD_TIMEOUT_SECS,
            work_dir: None,
        }
    }
}

impl Settings {
    /// Returns the settings directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "crossdocs", "crossdocs").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads settings from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from a specific file, or defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| SettingsError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Effective build timeout; zero means the default
    pub fn build_timeout(&self) -> Duration {
        match self.build_timeout_secs {
            0 => Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.doxygen_path, "doxygen");
        assert_eq!(settings.build_timeout(), Duration::from_secs(120));
        assert!(settings.work_dir.is_none());
    }

    #[test]
    fn parse_partial_settings() {
        let toml = r#"
doxygen_path = "/opt/doxygen/bin/doxygen"
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.doxygen_path, "/opt/doxygen/bin/doxygen");
        assert_eq!(settings.build_timeout_secs, DEFAULT_BUILD_TIMEOUT_SECS);
    }

    #[test]
    fn zero_timeout_uses_default() {
        let settings = Settings {
            build_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.build_timeout(), Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "doxygen_path = \"doxy\"\nbuild_timeout_secs = 30\nwork_dir = \"/tmp/work\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.doxygen_path, "doxy");
        assert_eq!(settings.build_timeout(), Duration::from_secs(30));
        assert_eq!(settings.work_dir, Some(PathBuf::from("/tmp/work")));
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "build_timeout_secs = \"soon\"").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
