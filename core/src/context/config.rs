//! Application configuration
//!
//! Re-exports the shared types from edgeline-types and adds persistence
//! through confy (TOML under the platform config directory).

use std::path::PathBuf;

use edgeline_types::{AppConfig, IndicatorConfig};

use super::error::ConfigError;

pub const APP_NAME: &str = "edgeline";
pub const CONFIG_NAME: &str = "config";

/// Longest animation or hide delay accepted from a config file
const MAX_TIMING_MS: u64 = 60_000;

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load the stored config, falling back to defaults (with a warning)
    /// when it is missing, unreadable or invalid.
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        validate_indicator(&config.indicator).map_err(|reason| ConfigError::Invalid {
            path: Self::config_path().unwrap_or_default(),
            reason,
        })?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Path)
    }
}

/// Reject values the overlay cannot honor.
pub(crate) fn validate_indicator(config: &IndicatorConfig) -> Result<(), String> {
    if config.animation_duration_ms > MAX_TIMING_MS {
        return Err(format!(
            "animation_duration_ms {} exceeds {MAX_TIMING_MS}",
            config.animation_duration_ms
        ));
    }
    if config.hide_delay_ms > MAX_TIMING_MS {
        return Err(format!(
            "hide_delay_ms {} exceeds {MAX_TIMING_MS}",
            config.hide_delay_ms
        ));
    }
    if !config.density.is_finite() || config.density <= 0.0 {
        return Err(format!("density must be positive, got {}", config.density));
    }
    if config.namespace.trim().is_empty() {
        return Err("namespace must not be empty".to_string());
    }
    if config.namespace.contains('\0') {
        return Err("namespace must not contain NUL bytes".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_indicator(&IndicatorConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_density_and_timing() {
        let bad_density = IndicatorConfig {
            density: 0.0,
            ..Default::default()
        };
        assert!(validate_indicator(&bad_density).is_err());

        let slow = IndicatorConfig {
            hide_delay_ms: MAX_TIMING_MS + 1,
            ..Default::default()
        };
        let err = validate_indicator(&slow).unwrap_err();
        assert!(err.contains("hide_delay_ms"));

        let unnamed = IndicatorConfig {
            namespace: "  ".to_string(),
            ..Default::default()
        };
        assert!(validate_indicator(&unnamed).is_err());
    }

    #[test]
    fn rejects_nul_in_namespace() {
        let config = IndicatorConfig {
            namespace: "edge\0line".to_string(),
            ..Default::default()
        };
        let err = validate_indicator(&config).unwrap_err();
        assert!(err.contains("NUL"));
    }
}
