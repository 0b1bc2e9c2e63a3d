// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// A missing file falls back to defaults; a file that exists but does not
/// parse is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::warn!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::load(path).map_err(|e| AppError::config(format!("{}: {e}", path.display())))
}

/// Load and validate configuration.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = load_config(path)?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {}: {e}", path.display())))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_validated(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.collector.workers, 5);
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/config.toml");
        let config = load_validated(&path).unwrap();
        assert_eq!(config.limit, Some(200));
        assert_eq!(config.rates.len(), 3);
        let area = config.query.get("area").and_then(|v| v.to_params().pop());
        assert_eq!(area.as_deref(), Some("1"));
    }

    #[test]
    fn test_broken_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[collector\nworkers = ").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[rates]\nRUR = 0.0\n").unwrap();
        assert!(load_validated(&path).is_err());
    }
}
