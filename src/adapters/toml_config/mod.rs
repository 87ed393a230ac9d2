// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Section of the file holding the cropper settings
const SECTION: &str = "cropper";

/// Keys accepted by [`TomlConfigAdapter::set_config`]
pub const CONFIG_KEYS: [&str; 6] = [
    "ffmpeg_path",
    "ffprobe_path",
    "canvas_width",
    "canvas_height",
    "preview_timestamp",
    "log_level",
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: RwLock<AppConfig>,
    config_file_path: RwLock<Option<PathBuf>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            config: RwLock::new(AppConfig::default()),
            config_file_path: RwLock::new(None),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, AppConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge the `[cropper]` section of a TOML document
    fn deserialize_config(&self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;

        let Some(section) = parsed.get(SECTION) else {
            debug!("Config file has no [{}] section", SECTION);
            return Ok(());
        };
        let table = section.as_table().ok_or_else(|| {
            DomainError::ConfigFail(format!("[{}] must be a table", SECTION))
        })?;

        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(DomainError::ConfigFail(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            self.set_config(key, &value)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| DomainError::ConfigFail(format!("Invalid value for {}: {} ({})", key, value, e)))
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}

impl ConfigPort for TomlConfigAdapter {
    fn current(&self) -> AppConfig {
        self.read().clone()
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut config = self.write();
        match key {
            "ffmpeg_path" => config.ffmpeg_path = optional_path(value),
            "ffprobe_path" => config.ffprobe_path = optional_path(value),
            "canvas_width" => config.canvas_width = parse_number(key, value)?,
            "canvas_height" => config.canvas_height = parse_number(key, value)?,
            "preview_timestamp" => config.preview_timestamp = parse_number(key, value)?,
            "log_level" => {
                config.log_level = LogLevel::parse(value)
                    .map_err(|e| DomainError::ConfigFail(e.to_string()))?
            }
            _ => {
                return Err(DomainError::ConfigFail(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        debug!("Set config {} = {}", key, value);
        Ok(())
    }

    fn load_config(&self, path: &Path) -> Result<(), DomainError> {
        if !path.is_file() {
            return Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        self.deserialize_config(&content)?;

        *self
            .config_file_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.to_path_buf());
        Ok(())
    }

    fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read();

        config
            .canvas()
            .map_err(|_| DomainError::ConfigFail("Canvas size must be positive".to_string()))?;

        if !config.preview_timestamp.is_finite() || config.preview_timestamp < 0.0 {
            return Err(DomainError::ConfigFail(
                "preview_timestamp must be a non-negative number of seconds".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
