//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Cli;
use crate::ports::{AppConfig, ConfigPort};

/// Environment variables and the config keys they set
pub const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("CROPPER_FFMPEG_PATH", "ffmpeg_path"),
    ("CROPPER_FFPROBE_PATH", "ffprobe_path"),
    ("CROPPER_CANVAS_WIDTH", "canvas_width"),
    ("CROPPER_CANVAS_HEIGHT", "canvas_height"),
    ("CROPPER_PREVIEW_TIMESTAMP", "preview_timestamp"),
    ("CROPPER_LOG_LEVEL", "log_level"),
];

/// Initialize configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(config: &dyn ConfigPort, cli: &Cli) -> Result<AppConfig> {
    // Defaults are already in place when the adapter is created
    match &cli.config {
        Some(path) => config
            .load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => {
            if let Some(path) = default_config_paths().into_iter().find(|p| p.is_file()) {
                load_config_file(config, &path)?;
            }
        }
    }

    apply_env_overrides(config, |name| std::env::var(name).ok())?;
    apply_cli_overrides(config, cli)?;

    config.validate_config().context("Invalid configuration")?;
    Ok(config.current())
}

fn load_config_file(config: &dyn ConfigPort, path: &Path) -> Result<()> {
    debug!("Loading configuration from: {}", path.display());
    config
        .load_config(path)
        .with_context(|| format!("Failed to load config file {}", path.display()))
}

/// Candidate config files, most specific first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("cropper.toml")];
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(dir).join("cropper").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".config").join("cropper").join("config.toml"));
    }
    if let Some(appdata) = std::env::var_os("APPDATA") {
        paths.push(PathBuf::from(appdata).join("cropper").join("config.toml"));
    }
    paths
}

/// Apply `CROPPER_*` variables found by `lookup`
pub fn apply_env_overrides(
    config: &dyn ConfigPort,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<usize> {
    let mut applied = 0;
    for (env_var, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(env_var) {
            config
                .set_config(key, &value)
                .with_context(|| format!("Invalid value in {}", env_var))?;
            debug!("Found environment override: {} = {}", env_var, value);
            applied += 1;
        }
    }
    Ok(applied)
}

/// Apply values given on the command line
pub fn apply_cli_overrides(config: &dyn ConfigPort, cli: &Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        config
            .set_config("log_level", level)
            .context("Invalid --log-level")?;
    }
    Ok(())
}
