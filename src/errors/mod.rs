// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::{LoginError, StoneApiError};
pub use internal::InternalError;
