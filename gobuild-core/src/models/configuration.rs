//! Configuration data structures

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Logging level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    #[default]
    Warn,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Resolved settings snapshot.
///
/// Loaded once at the start of a command and handed to the classifier and
/// dispatcher; nothing re-reads the settings file mid-decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Module name offered when creating go.mod
    pub default_module_name: String,
    /// Create go.mod automatically when a command needs one
    pub auto_create_mod: bool,
    /// Run the formatter from the pre-save hook
    pub format_on_save: bool,
    /// Prefer goimports over gofmt when formatting on save
    pub use_goimports: bool,
    /// Go toolchain executable
    pub go_binary: String,
    /// gofmt executable
    pub gofmt_binary: String,
    /// goimports executable
    pub goimports_binary: String,
    /// Timeout for toolchain commands
    pub command_timeout_seconds: u32,
    /// Timeout for formatting, import fixing, env queries and playground uploads
    pub format_timeout_seconds: u32,
    /// Go playground base URL
    pub playground_url: String,
    /// Additional dotted namespaces treated as standard library
    pub extra_standard_namespaces: Vec<String>,
    /// Logging verbosity level
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_module_name: String::new(),
            auto_create_mod: false,
            format_on_save: false,
            use_goimports: true,
            go_binary: "go".to_string(),
            gofmt_binary: "gofmt".to_string(),
            goimports_binary: "goimports".to_string(),
            command_timeout_seconds: 30,
            format_timeout_seconds: 10,
            playground_url: "https://play.golang.org/".to_string(),
            extra_standard_namespaces: Vec::new(),
            log_level: LogLevel::Warn,
        }
    }
}

impl Settings {
    /// Load settings from file, falling back to defaults when it doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    /// Get the XDG config file path
    pub fn default_config_path() -> Result<PathBuf, SettingsError> {
        let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(config_dir.join("gobuild").join("settings.toml"))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.command_timeout_seconds))
    }

    pub fn format_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.format_timeout_seconds))
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("command_timeout_seconds", self.command_timeout_seconds),
            ("format_timeout_seconds", self.format_timeout_seconds),
        ] {
            if value == 0 || value > 3600 {
                errors.push(format!("{} must be between 1 and 3600", name));
            }
        }

        if self.default_module_name.chars().any(char::is_whitespace) {
            errors.push("default_module_name cannot contain whitespace".to_string());
        }

        for (name, value) in [
            ("go_binary", &self.go_binary),
            ("gofmt_binary", &self.gofmt_binary),
            ("goimports_binary", &self.goimports_binary),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{} cannot be empty", name));
            }
        }

        if url::Url::parse(&self.playground_url).is_err() {
            errors.push(format!(
                "playground_url is not a valid URL: {}",
                self.playground_url
            ));
        }

        for namespace in &self.extra_standard_namespaces {
            if !namespace.contains('.') {
                errors.push(format!(
                    "extra_standard_namespaces entry '{}' has no dot and is already standard library",
                    namespace
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_module_name, "");
        assert!(!settings.auto_create_mod);
        assert!(!settings.format_on_save);
        assert!(settings.use_goimports);
        assert_eq!(settings.command_timeout(), Duration::from_secs(30));
        assert_eq!(settings.format_timeout(), Duration::from_secs(10));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("auto_create_mod = true\n").unwrap();
        assert!(settings.auto_create_mod);
        assert!(settings.use_goimports);
        assert_eq!(settings.go_binary, "go");
    }

    #[test]
    fn test_settings_validation() {
        let settings = Settings {
            command_timeout_seconds: 0,
            default_module_name: "my module".to_string(),
            playground_url: "not a url".to_string(),
            extra_standard_namespaces: vec!["fmt".to_string()],
            ..Settings::default()
        };

        let errors = settings.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("command_timeout_seconds")));
        assert!(errors.iter().any(|e| e.contains("default_module_name")));
        assert!(errors.iter().any(|e| e.contains("playground_url")));
        assert!(errors.iter().any(|e| e.contains("extra_standard_namespaces")));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings = Settings::load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_file_operations() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");

        let settings = Settings {
            default_module_name: "example.com/demo".to_string(),
            format_on_save: true,
            ..Settings::default()
        };
        settings.save_to_file(&path).unwrap();
        assert!(path.exists());

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded.default_module_name, "example.com/demo");
        assert!(loaded.format_on_save);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "auto_create_mod = \"yes\"").unwrap();

        let err = Settings::load_from_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
