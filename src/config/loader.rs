//! Settings file loader and validation.

use super::FetchConfig;
use crate::error::FetchError;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the global settings path: ~/.config/kernel-patch-fetch/settings.json
pub fn default_settings_path() -> Result<PathBuf, FetchError> {
    let home = dirs::home_dir()
        .ok_or_else(|| FetchError::Config("Cannot determine home directory".to_string()))?;

    Ok(home.join(".config/kernel-patch-fetch").join("settings.json"))
}

/// Load config from a JSON file.
pub fn load_config_from_file(path: &Path) -> Result<FetchConfig, FetchError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FetchError::Config(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            FetchError::Io(e)
        }
    })?;

    let config: FetchConfig = serde_json::from_str(&content)
        .map_err(|e| FetchError::Config(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_config(&config)?;
    Ok(config)
}

/// Resolve the effective config.
///
/// An explicit path must exist. Without one, the global settings file is
/// used when present and the built-in defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<FetchConfig, FetchError> {
    if let Some(path) = explicit {
        return load_config_from_file(path);
    }

    match default_settings_path() {
        Ok(path) if path.exists() => {
            log::debug!("[Config] Loading settings from {}", path.display());
            load_config_from_file(&path)
        }
        _ => Ok(FetchConfig::default()),
    }
}

/// Validate config path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), FetchError> {
    if path.as_os_str().is_empty() {
        return Err(FetchError::Config(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => Ok(()),
        Some(ext) => Err(FetchError::Config(format!(
            "Configuration file must have .json extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(FetchError::Config(
            "Configuration file must have .json extension".to_string(),
        )),
    }
}

/// Reject settings no run could succeed with.
pub fn validate_config(config: &FetchConfig) -> Result<(), FetchError> {
    let urls = [
        ("grsec_feed_url", &config.grsec_feed_url),
        ("github_api_base", &config.github_api_base),
        ("kernel_mirror_base", &config.kernel_mirror_base),
    ];
    for (field, value) in urls {
        if value.trim().is_empty() {
            return Err(FetchError::Config(format!("{} cannot be empty", field)));
        }
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(FetchError::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                field, value
            )));
        }
    }

    if config.kernel_series_dir.trim_matches('/').is_empty() {
        return Err(FetchError::Config(
            "kernel_series_dir cannot be empty".to_string(),
        ));
    }

    if config.max_workers == 0 {
        return Err(FetchError::Config(
            "max_workers must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"github_api_base": "http://127.0.0.1:8080", "max_workers": 8}"#,
        )
        .unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.github_api_base, "http://127.0.0.1:8080");
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.kernel_series_dir, "v4.x");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_config_from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_config_from_file(&path),
            Err(FetchError::Config(_))
        ));
    }

    #[test]
    fn test_validate_config_path() {
        assert!(validate_config_path(Path::new("settings.json")).is_ok());
        assert!(validate_config_path(Path::new("settings.toml")).is_err());
        assert!(validate_config_path(Path::new("settings")).is_err());
        assert!(validate_config_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_config_rules() {
        assert!(validate_config(&FetchConfig::default()).is_ok());

        let zero_workers = FetchConfig {
            max_workers: 0,
            ..FetchConfig::default()
        };
        assert!(validate_config(&zero_workers).is_err());

        let bad_url = FetchConfig {
            kernel_mirror_base: "ftp://mirror".to_string(),
            ..FetchConfig::default()
        };
        assert!(validate_config(&bad_url).is_err());

        let empty_series = FetchConfig {
            kernel_series_dir: "/".to_string(),
            ..FetchConfig::default()
        };
        assert!(validate_config(&empty_series).is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(load_or_default(Some(&dir.path().join("nope.json"))).is_err());
    }
}
