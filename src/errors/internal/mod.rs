use thiserror::Error;

pub mod admin_gate;
pub mod database;
pub mod stone;

pub use admin_gate::AdminGateError;
pub use database::DatabaseError;
pub use stone::StoneError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// belong to one component. Not exposed via API - endpoints convert to
/// StoneApiError or LoginError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Stone(#[from] StoneError),

    #[error(transparent)]
    AdminGate(#[from] AdminGateError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Configuration or connectivity failure (maps to 503)
    pub fn is_unavailable(&self) -> bool {
        match self {
            InternalError::Database(err) => err.is_connectivity(),
            InternalError::AdminGate(AdminGateError::SecretNotConfigured) => true,
            _ => false,
        }
    }
}
