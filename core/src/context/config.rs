//! Application configuration
//!
//! Re-exports the shared config types from quill-types and adds persistence
//! and validation on top of them.

pub use quill_types::{
    Action, ActionCommands, AppConfig, DeviceConfig, DeviceRole, MAX_POLL_INTERVAL_MS,
    PressTiming, TierTableKind, WordCountingStrategy,
};

use super::error::ConfigError;

const APP_NAME: &str = "quill";
const CONFIG_NAME: &str = "config";

/// Extension trait for AppConfig persistence and validation
pub trait AppConfigExt: Sized {
    /// Load the stored config, falling back to defaults when it is missing or unreadable
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
    fn to_toml(&self) -> Result<String, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_threshold_secs == 0 {
            return Err(ConfigError::ZeroIdleThreshold);
        }
        if !(1..=MAX_POLL_INTERVAL_MS).contains(&self.poll_interval_ms) {
            return Err(ConfigError::PollInterval {
                value: self.poll_interval_ms,
                max: MAX_POLL_INTERVAL_MS,
            });
        }
        if self.press.short_press_max_ms >= self.press.long_press_min_ms {
            return Err(ConfigError::PressTiming {
                short: self.press.short_press_max_ms,
                long: self.press.long_press_min_ms,
            });
        }
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        Ok(())
    }

    fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Path of the stored config file, for display
pub fn config_path() -> Result<std::path::PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.idle_threshold_secs, 1800);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.press, PressTiming::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = AppConfig {
            idle_threshold_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroIdleThreshold)));

        let config = AppConfig {
            poll_interval_ms: 250,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PollInterval { value: 250, .. })
        ));

        let config = AppConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            press: PressTiming {
                short_press_max_ms: 2000,
                long_press_min_ms: 2000,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PressTiming { .. })));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            idle_threshold_secs = 300
            word_counting = "boundary_detection"

            [press]
            long_press_min_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.idle_threshold_secs, 300);
        assert_eq!(config.word_counting, WordCountingStrategy::BoundaryDetection);
        assert_eq!(config.press.short_press_max_ms, 500);
        assert_eq!(config.press.long_press_min_ms, 1500);
        assert_eq!(config.devices.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_roles_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [[devices]]
            path = "/dev/input/event0"

            [[devices]]
            path = "/dev/input/event3"
            role = "keyboard"
            optional = true
            "#,
        )
        .unwrap();

        assert_eq!(config.devices[0].role, DeviceRole::Buttons);
        assert!(!config.devices[0].optional);
        assert_eq!(config.devices[1], DeviceConfig::keyboard("/dev/input/event3"));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = AppConfig {
            achievement_table: TierTableKind::Chronicle,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("achievement_table = \"chronicle\""));
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
