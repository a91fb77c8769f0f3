//! Configuration module
//!
//! Settings come from the environment. Nothing here is persisted.

use std::env;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::EventType;

/// Path of the JSON trip file to load.
pub const DATA_ENV: &str = "TRIPBOARD_DATA";
/// Event type new events start with.
pub const DEFAULT_TYPE_ENV: &str = "TRIPBOARD_DEFAULT_TYPE";

const DEFAULT_EVENT_TYPE: &str = "flight";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Trip file to load; `None` means the demo trip.
    pub data_path: Option<PathBuf>,
    /// Set when the path was asked for explicitly, so a missing file is an error.
    pub data_path_required: bool,
    pub default_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            data_path_required: false,
            default_type: DEFAULT_EVENT_TYPE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default_type = env::var(DEFAULT_TYPE_ENV).unwrap_or_else(|_| DEFAULT_EVENT_TYPE.to_string());

        if let Ok(path) = env::var(DATA_ENV) {
            return Self {
                data_path: Some(PathBuf::from(path)),
                data_path_required: true,
                default_type,
            };
        }

        // Fall back to a trip file in the user's data directory, if one exists.
        let discovered = dirs::data_dir()
            .map(|dir| dir.join("tripboard").join("trip.json"))
            .filter(|path| path.exists());
        Self {
            data_path: discovered,
            data_path_required: false,
            default_type,
        }
    }

    pub fn default_event_type(&self) -> AppResult<EventType> {
        self.default_type
            .trim()
            .to_lowercase()
            .parse()
            .map_err(AppError::config)
    }
}

/// Validates the configuration before the window opens.
///
/// # Returns
///
/// * `Ok(())` - the trip file (if required) exists and the default type is known
/// * `Err(AppError::Config)` - otherwise
pub fn validate_config(config: &Config) -> AppResult<()> {
    info!("Validating configuration");

    if let Some(path) = &config.data_path {
        if config.data_path_required && !path.exists() {
            return Err(AppError::config(format!(
                "{} points to {} which does not exist",
                DATA_ENV,
                path.display()
            )));
        }
        info!("Trip file: {}", path.display());
    } else {
        warn!("No trip file found, the demo trip will be shown");
    }

    config.default_event_type()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var(DATA_ENV);
        env::remove_var(DEFAULT_TYPE_ENV);
    }

    #[test]
    fn test_default_config_passes() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.default_event_type().unwrap(), EventType::Flight);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_explicit_path() {
        clear_env();
        let file = tempfile::NamedTempFile::new().unwrap();
        env::set_var(DATA_ENV, file.path());
        env::set_var(DEFAULT_TYPE_ENV, "Check-In");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.data_path.as_deref(), Some(file.path()));
        assert!(config.data_path_required);
        assert_eq!(config.default_event_type().unwrap(), EventType::CheckIn);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_rejected() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        env::set_var(DATA_ENV, dir.path().join("absent.json"));

        let config = Config::from_env();
        clear_env();

        assert!(matches!(validate_config(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_default_type_is_rejected() {
        let config = Config {
            default_type: "rocket".to_string(),
            ..Config::default()
        };
        assert!(matches!(validate_config(&config), Err(AppError::Config(_))));
    }
}
