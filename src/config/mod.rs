mod bootstrap_settings;
mod config_spec;
mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_manager;

pub use bootstrap_settings::{BootstrapSettings, StorageBackend};
pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use database::{connect, migrate_database, DatabaseConnections};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{init_logging, init_logging_with, LoggingConfig, LoggingError};
pub use secret_manager::{SecretError, SecretManager};
