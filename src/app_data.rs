use std::sync::Arc;

use crate::config::{BootstrapSettings, DatabaseConnections, SecretManager, StorageBackend};
use crate::errors::InternalError;
use crate::services::AdminGate;
use crate::stores::{MemoryStoneStore, StoneRepository, StoneStore};

/// Centralized application data, created once in main.rs and shared by the
/// API layer
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings, secrets)
///   ├─ connections (SQL backend only, connects lazily)
///   ├─ repository  (StoneStore or MemoryStoneStore)
///   └─ admin_gate  (password check + token validation)
/// ```
pub struct AppData {
    pub connections: Option<Arc<DatabaseConnections>>,
    pub repository: Arc<dyn StoneRepository>,
    pub admin_gate: Arc<AdminGate>,
    pub cors_allowed_origin: String,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Never connects to the database; the first storage call does.
    pub fn init(settings: &BootstrapSettings, secrets: &SecretManager) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let admin_gate = Arc::new(AdminGate::new(secrets, settings.require_admin_token())?);

        let (connections, repository): (Option<Arc<DatabaseConnections>>, Arc<dyn StoneRepository>) =
            match settings.storage_backend() {
                StorageBackend::Sql => {
                    let connections = Arc::new(DatabaseConnections::new(
                        settings.database_url().map(str::to_string),
                    ));
                    let store: Arc<dyn StoneRepository> = Arc::new(StoneStore::new(connections.clone()));
                    (Some(connections), store)
                }
                StorageBackend::Memory => {
                    tracing::warn!("Using the in-memory stone store; data is lost on restart");
                    let store: Arc<dyn StoneRepository> = Arc::new(MemoryStoneStore::new());
                    (None, store)
                }
            };

        tracing::info!("AppData initialization complete");

        Ok(Self {
            connections,
            repository,
            admin_gate,
            cors_allowed_origin: settings.cors_allowed_origin().to_string(),
        })
    }

    /// Assemble from ready-made parts (tests, embedding)
    pub fn from_parts(
        connections: Option<Arc<DatabaseConnections>>,
        repository: Arc<dyn StoneRepository>,
        admin_gate: Arc<AdminGate>,
        cors_allowed_origin: &str,
    ) -> Self {
        Self {
            connections,
            repository,
            admin_gate,
            cors_allowed_origin: cors_allowed_origin.to_string(),
        }
    }
}
