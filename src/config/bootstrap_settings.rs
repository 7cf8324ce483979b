use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Which persistence backend serves the stone repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Relational database through sea-orm (SQLite or Postgres)
    Sql,
    /// In-process store, lost on restart
    Memory,
}

impl StorageBackend {
    fn validate(value: &str) -> Result<(), String> {
        Self::parse(value)
            .map(|_| ())
            .ok_or_else(|| format!("'{}' is not a storage backend (sql, memory)", value))
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sql" => Some(Self::Sql),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Bootstrap settings for infrastructure configuration
///
/// `database_url` is deliberately optional: a missing URL does not stop the
/// server, it makes every storage call fail with a configuration error.
pub struct BootstrapSettings {
    storage_backend: StorageBackend,
    database_url: Option<String>,
    server_host: String,
    server_port: u16,
    cors_allowed_origin: String,
    require_admin_token: bool,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let backend_spec = ConfigSpec::new(env_provider.clone())
            .env_override("STORAGE_BACKEND")
            .default_value("sql")
            .validator(StorageBackend::validate);

        let database_url_spec = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .min_length(1);

        let host_spec = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address);

        let port_spec = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .validator(ConfigSpec::validate_port);

        let origin_spec = ConfigSpec::new(env_provider.clone())
            .env_override("CORS_ALLOWED_ORIGIN")
            .default_value("*")
            .min_length(1);

        let require_token_spec = ConfigSpec::new(env_provider.clone())
            .env_override("REQUIRE_ADMIN_TOKEN")
            .default_value("true")
            .validator(ConfigSpec::validate_bool);

        let storage_backend = StorageBackend::parse(&backend_spec.load_value()?)
            .unwrap_or(StorageBackend::Sql);

        let database_url = database_url_spec
            .load_setting_with_source()?
            .map(|config| config.value);

        let server_host = host_spec.load_value()?;
        let server_port = ConfigSpec::parse_port(&port_spec.load_value()?, "PORT")?;
        let cors_allowed_origin = origin_spec.load_value()?;
        let require_admin_token =
            ConfigSpec::parse_bool(&require_token_spec.load_value()?, "REQUIRE_ADMIN_TOKEN")?;

        Ok(Self {
            storage_backend,
            database_url,
            server_host,
            server_port,
            cors_allowed_origin,
            require_admin_token,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn cors_allowed_origin(&self) -> &str {
        &self.cors_allowed_origin
    }

    pub fn require_admin_token(&self) -> bool {
        self.require_admin_token
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The URL can embed credentials
        f.debug_struct("BootstrapSettings")
            .field("storage_backend", &self.storage_backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("require_admin_token", &self.require_admin_token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use std::collections::HashMap;

    fn create_test_env(vars: &[(&str, &str)]) -> Arc<MockEnvironment> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Arc::new(MockEnvironment::new(vars))
    }

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env = create_test_env(&[
            ("DATABASE_URL", "postgres://stones@db/stones"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGIN", "https://stones.example"),
            ("REQUIRE_ADMIN_TOKEN", "false"),
            ("STORAGE_BACKEND", "sql"),
        ]);

        let settings = BootstrapSettings::from_env_provider(env).unwrap();

        assert_eq!(settings.database_url(), Some("postgres://stones@db/stones"));
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.cors_allowed_origin(), "https://stones.example");
        assert!(!settings.require_admin_token());
        assert_eq!(settings.storage_backend(), StorageBackend::Sql);
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = BootstrapSettings::from_env_provider(create_test_env(&[])).unwrap();

        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.cors_allowed_origin(), "*");
        assert!(settings.require_admin_token());
        assert_eq!(settings.storage_backend(), StorageBackend::Sql);
    }

    #[test]
    fn test_memory_backend_selection() {
        let env = create_test_env(&[("STORAGE_BACKEND", "Memory")]);

        let settings = BootstrapSettings::from_env_provider(env).unwrap();

        assert_eq!(settings.storage_backend(), StorageBackend::Memory);
    }

    #[test]
    fn test_unknown_backend_fails_validation() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("STORAGE_BACKEND", "mongo")]));

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, .. }) => {
                assert_eq!(setting_name, "STORAGE_BACKEND");
            }
            other => panic!("Expected InvalidSetting for STORAGE_BACKEND, got: {:?}", other.err()),
        }
    }

    #[test]
    fn test_empty_database_url_fails_validation() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("DATABASE_URL", "")]));

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, reason }) => {
                assert_eq!(setting_name, "DATABASE_URL");
                assert!(reason.contains("must be at least 1 characters long"));
            }
            other => panic!("Expected InvalidSetting for DATABASE_URL, got: {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_port_fails_validation() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("PORT", "not-a-port")]));

        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let env = create_test_env(&[("DATABASE_URL", "postgres://user:hunter2@db/stones")]);
        let settings = BootstrapSettings::from_env_provider(env).unwrap();

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
    }
}
