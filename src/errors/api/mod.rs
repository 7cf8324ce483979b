// API-facing error types
pub mod login;
pub mod stone;

// Re-exports for convenience
pub use login::LoginError;
pub use stone::StoneApiError;
