use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::internal::AdminGateError;
use crate::errors::InternalError;
use crate::types::internal::auth::ADMIN_SUBJECT;
use crate::types::internal::{AdminClaims, IssuedToken};

/// Admin session lifetime, matching the client's inactivity window
pub const ADMIN_TOKEN_TTL_MINUTES: i64 = 30;

/// Issues and validates admin session tokens (HS256 JWTs)
pub struct TokenService {
    signing_key: String,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(signing_key: String) -> Self {
        Self {
            signing_key,
            ttl_minutes: ADMIN_TOKEN_TTL_MINUTES,
        }
    }

    /// Issue a token valid from now
    pub fn issue(&self) -> Result<IssuedToken, InternalError> {
        self.issue_at(Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds)
    pub fn issue_at(&self, now: i64) -> Result<IssuedToken, InternalError> {
        let expires_in = self.ttl_minutes * 60;
        let jti = Uuid::new_v4().to_string();

        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            exp: now + expires_in,
            iat: now,
            jti: jti.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.signing_key.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        tracing::debug!(jti = %jti, "Issued admin token");

        Ok(IssuedToken {
            token,
            jti,
            expires_in,
        })
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<AdminClaims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.signing_key.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AdminGateError::ExpiredToken.into(),
            _ => AdminGateError::InvalidToken(e.to_string()).into(),
        })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("signing_key", &"<redacted>")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}
