use std::net::IpAddr;
use std::sync::Arc;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> String {
        self.env_override.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    /// Load a setting value with source tracking.
    ///
    /// Returns `Ok(None)` for an optional setting with neither an environment
    /// value nor a default.
    pub fn load_setting_with_source(&self) -> Result<Option<ConfigValue>, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;
                return Ok(Some(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                }));
            }
        }

        if let Some(default) = &self.default_value {
            return Ok(Some(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            }));
        }

        if self.required {
            return Err(ApplicationError::MissingRequiredSetting {
                setting_name: self.setting_name(),
            });
        }

        Ok(None)
    }

    /// Load a setting that always resolves (has a default or is required)
    pub fn load_value(&self) -> Result<String, ApplicationError> {
        self.load_setting_with_source()?
            .map(|config| config.value)
            .ok_or_else(|| ApplicationError::MissingRequiredSetting {
                setting_name: self.setting_name(),
            })
    }

    fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min) = self.min_length {
            if value.len() < min {
                return Err(ApplicationError::InvalidSetting {
                    setting_name: setting_name.to_string(),
                    reason: format!("must be at least {} characters long", min),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason,
            })?;
        }

        Ok(())
    }

    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("host address cannot be empty".to_string());
        }
        if value == "localhost" || value.parse::<IpAddr>().is_ok() {
            return Ok(());
        }
        Err(format!("'{}' is not a valid IP address or 'localhost'", value))
    }

    pub fn validate_port(value: &str) -> Result<(), String> {
        match value.parse::<u16>() {
            Ok(0) => Err("port must be between 1 and 65535".to_string()),
            Ok(_) => Ok(()),
            Err(_) => Err(format!("'{}' is not a valid port number", value)),
        }
    }

    pub fn validate_bool(value: &str) -> Result<(), String> {
        Self::parse_bool_value(value)
            .map(|_| ())
            .ok_or_else(|| format!("'{}' is not a boolean (true/false)", value))
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        value.parse::<u16>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: e.to_string(),
        })
    }

    pub fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ApplicationError> {
        Self::parse_bool_value(value).ok_or_else(|| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("'{}' is not a boolean", value),
        })
    }

    fn parse_bool_value(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn spec(env: MockEnvironment) -> ConfigSpec {
        ConfigSpec::new(Arc::new(env)).env_override("SETTING")
    }

    #[test]
    fn test_env_value_wins_over_default() {
        let value = spec(MockEnvironment::empty().with_var("SETTING", "from-env"))
            .default_value("fallback")
            .load_setting_with_source()
            .unwrap()
            .unwrap();

        assert_eq!(value.value, "from-env");
        assert_eq!(value.source, ConfigValueSource::EnvironmentVariable { name: "SETTING".to_string() });
    }

    #[test]
    fn test_default_used_when_env_missing() {
        let value = spec(MockEnvironment::empty())
            .default_value("fallback")
            .load_setting_with_source()
            .unwrap()
            .unwrap();

        assert_eq!(value.value, "fallback");
        assert_eq!(value.source, ConfigValueSource::Default);
    }

    #[test]
    fn test_optional_setting_without_value_is_none() {
        let value = spec(MockEnvironment::empty()).load_setting_with_source().unwrap();

        assert!(value.is_none());
    }

    #[test]
    fn test_required_setting_without_value_fails() {
        let result = spec(MockEnvironment::empty()).required(true).load_value();

        assert_eq!(
            result,
            Err(ApplicationError::MissingRequiredSetting { setting_name: "SETTING".to_string() })
        );
    }

    #[test]
    fn test_min_length_and_validator_apply_to_env_values() {
        let short = spec(MockEnvironment::empty().with_var("SETTING", ""))
            .min_length(1)
            .load_setting_with_source();
        assert!(matches!(short, Err(ApplicationError::InvalidSetting { .. })));

        let bad_port = spec(MockEnvironment::empty().with_var("SETTING", "99999"))
            .validator(ConfigSpec::validate_port)
            .load_setting_with_source();
        assert!(matches!(bad_port, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(ConfigSpec::parse_bool("TRUE", "X"), Ok(true));
        assert_eq!(ConfigSpec::parse_bool("off", "X"), Ok(false));
        assert!(ConfigSpec::parse_bool("maybe", "X").is_err());
    }

    #[test]
    fn test_host_validation() {
        assert!(ConfigSpec::validate_host_address("0.0.0.0").is_ok());
        assert!(ConfigSpec::validate_host_address("localhost").is_ok());
        assert!(ConfigSpec::validate_host_address("::1").is_ok());
        assert!(ConfigSpec::validate_host_address("not a host").is_err());
    }
}
