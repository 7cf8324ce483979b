use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::config::DatabaseConnections;
use crate::types::dto::common::HealthResponse;

/// Health check API
///
/// Reports `degraded` when the SQL backend is in use and its database
/// cannot be reached; the endpoint itself always answers 200.
pub struct HealthApi {
    connections: Option<Arc<DatabaseConnections>>,
}

impl HealthApi {
    pub fn new(connections: Option<Arc<DatabaseConnections>>) -> Self {
        Self { connections }
    }
}

#[derive(Tags)]
enum HealthTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let status = match &self.connections {
            Some(connections) => match connections.get().await {
                Ok(_) => "healthy",
                Err(err) => {
                    tracing::warn!("Health check could not reach the database: {}", err);
                    "degraded"
                }
            },
            None => "healthy",
        };

        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_without_database() {
        let response = HealthApi::new(None).health().await;

        assert_eq!(response.0.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_with_unconfigured_database_is_degraded() {
        let api = HealthApi::new(Some(Arc::new(DatabaseConnections::new(None))));

        let response = api.health().await;

        assert_eq!(response.0.status, "degraded");
    }
}
