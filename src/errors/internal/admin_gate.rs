use thiserror::Error;

/// Admin gate and admin token errors
#[derive(Error, Debug)]
pub enum AdminGateError {
    /// No password in the login request
    #[error("Password missing from request")]
    MissingPassword,

    /// ADMIN_PASSWORD is not configured on the server
    #[error("Admin secret is not configured")]
    SecretNotConfigured,

    /// Submitted password does not match
    #[error("Incorrect admin password")]
    IncorrectPassword,

    /// Write attempted without an admin token
    #[error("Admin token missing")]
    MissingToken,

    /// Token failed signature or claim validation
    #[error("Invalid admin token: {0}")]
    InvalidToken(String),

    /// Token is past its expiry
    #[error("Admin token expired")]
    ExpiredToken,
}
