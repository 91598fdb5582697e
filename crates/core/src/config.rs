//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

/// Directory name used under the platform config/data directories.
pub const APP_DIR: &str = "gameday";

const DEFAULT_CONFIG: &str = r#"# Player game-day tracker configuration.
#
# Every value can also be set through the environment, e.g.
# GAMEDAY_EXPORT_DIR=/tmp/exports

# Directory holding the stored players, teams, config and theme.
# data_dir = "/path/to/data"

# Directory exports are written into (defaults to the working directory).
# export_dir = "."

# Directory for the log file.
# log_dir = "/path/to/logs"

# Use the transposed preview layout for team sheets in the combined export.
preview_layout = false
"#;

/// Runtime settings resolved from defaults, the config file and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory of the key-value store.
    pub data_dir: PathBuf,
    /// Destination of spreadsheet and document exports.
    pub export_dir: PathBuf,
    /// Directory of `gameday.log`.
    pub log_dir: PathBuf,
    /// Team sheets of the combined export use the preview layout.
    #[serde(default)]
    pub preview_layout: bool,
}

impl AppConfig {
    /// Load configuration from the default file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration using `path` as the (optional) config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let base = base_dir();
        let settings = Config::builder()
            .set_default("data_dir", path_string(&base.join("data")))?
            .set_default("export_dir", ".")?
            .set_default("log_dir", path_string(&base.join("logs")))?
            .set_default("preview_layout", false)?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("GAMEDAY"))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Write a commented default configuration if none exists yet. Returns
/// `true` when a file was written.
pub fn ensure_default_config() -> Result<bool> {
    ensure_default_config_at(config_path())
}

/// Write the default configuration to `path` unless the file already exists.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("missing.toml"))?;
        assert!(config.data_dir.ends_with("data"));
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(!config.preview_layout);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "export_dir = \"/tmp/exports\"\npreview_layout = true\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert!(config.preview_layout);
        Ok(())
    }

    #[test]
    fn default_file_is_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        assert!(ensure_default_config_at(&path)?);
        assert!(fs::read_to_string(&path)?.contains("preview_layout"));

        fs::write(&path, "preview_layout = true\n")?;
        assert!(!ensure_default_config_at(&path)?);
        assert_eq!(fs::read_to_string(&path)?, "preview_layout = true\n");

        let config = AppConfig::load_from(&path)?;
        assert!(config.preview_layout);
        Ok(())
    }
}
