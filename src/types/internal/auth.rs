use serde::{Deserialize, Serialize};

/// Subject claim carried by every admin session token
pub const ADMIN_SUBJECT: &str = "admin";

/// Claims of an admin session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject, always `admin`
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Token id
    pub jti: String,
}

/// A freshly issued admin session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}
