//! Main application configuration
//!
//! This module defines the top-level configuration structure for court-rotation,
//! including environment variable loading, TOML file loading and validation.

use crate::config::{BlendConfig, PairingConfig, RatingConfig, RotationConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub blend: BlendConfig,
    pub rotation: RotationConfig,
    pub pairing: PairingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "court-rotation".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Read and parse an environment variable if it is set
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("ROTATION_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("ROTATION_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Some(v) = env_parse("ROTATION_DEFAULT_RATING")? {
            self.rating.default_rating = v;
        }
        if let Some(v) = env_parse("ROTATION_MIN_RATING")? {
            self.rating.min_rating = v;
        }
        if let Some(v) = env_parse("ROTATION_MAX_RATING")? {
            self.rating.max_rating = v;
        }
        if let Some(v) = env_parse("ROTATION_K_NEW_PLAYER")? {
            self.rating.k_new_player = v;
        }
        if let Some(v) = env_parse("ROTATION_K_REGULAR")? {
            self.rating.k_regular = v;
        }
        if let Some(v) = env_parse("ROTATION_PROVISIONAL_GAMES")? {
            self.rating.provisional_games = v;
        }
        if let Some(v) = env_parse("ROTATION_DRAW_COUNTS_AS_GAME")? {
            self.rating.draw_counts_as_game = v;
        }

        // Blend settings
        if let Some(v) = env_parse("ROTATION_RAMP_GAMES")? {
            self.blend.ramp_games = v;
        }

        // Rotation settings
        if let Some(v) = env_parse("ROTATION_NUM_COURTS")? {
            self.rotation.num_courts = v;
        }
        if let Some(v) = env_parse("ROTATION_TEAM_SIZE")? {
            self.rotation.team_size = v;
        }
        if let Some(v) = env_parse::<u32>("ROTATION_REST_THRESHOLD")? {
            // 0 in the environment switches the filter off
            self.rotation.rest_threshold = (v > 0).then_some(v);
        }

        // Pairing settings
        if let Some(v) = env_parse("ROTATION_RECORD_DRAWS")? {
            self.pairing.record_draws = v;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.blend.validate()?;
    config.rotation.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.rotation.rest_threshold, Some(3));
        assert!(config.pairing.record_draws);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [rotation]
            num_courts = 3
            team_size = 1

            [rating]
            k_regular = 16.0
            "#,
        )
        .unwrap();

        assert_eq!(config.rotation.num_courts, 3);
        assert_eq!(config.rotation.team_size, 1);
        assert_eq!(config.rotation.rest_threshold, Some(3));
        assert_eq!(config.rating.k_regular, 16.0);
        assert_eq!(config.rating.k_new_player, 32.0);
        assert_eq!(config.service.log_level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_nested_validation_propagates() {
        let mut config = AppConfig::default();
        config.rotation.team_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
