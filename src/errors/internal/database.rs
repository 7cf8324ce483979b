use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database configuration is missing: {setting} is not set")]
    MissingConfiguration { setting: String },

    #[error("Database connection failed: {source}")]
    Connect {
        #[source]
        source: DbErr,
    },

    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: DbErr,
    },
}

impl DatabaseError {
    /// Whether this failure means storage is unreachable or unconfigured
    /// rather than a fault in the query itself
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::MissingConfiguration { .. } | Self::Connect { .. } => true,
            Self::Operation { source, .. } => match source {
                DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
                other => {
                    let text = other.to_string().to_lowercase();
                    text.contains("timeout") || text.contains("timed out") || text.contains("connection")
                }
            },
        }
    }
}
