use crate::config::{BootstrapSettings, DatabaseConnections, StorageBackend};
use crate::errors::internal::DatabaseError;

/// Run pending migrations against DATABASE_URL
///
/// Connects directly and does not initialize the full AppData structure.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    if settings.storage_backend() == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND is memory; there is no schema to migrate");
        return Ok(());
    }

    let database_url = settings.database_url().ok_or_else(|| DatabaseError::MissingConfiguration {
        setting: "DATABASE_URL".to_string(),
    })?;

    tracing::info!("Running database migrations...");
    DatabaseConnections::new(Some(database_url.to_string())).migrate().await?;
    tracing::info!("All migrations completed successfully");

    Ok(())
}
