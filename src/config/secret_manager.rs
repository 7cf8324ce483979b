use std::fmt;
use std::sync::Arc;

use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug, Clone, PartialEq)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Environment variable holding a secret, and what it must look like
struct SecretSpec {
    env_var: &'static str,
    required: bool,
    min_length: Option<usize>,
}

/// Shared admin password
const ADMIN_PASSWORD: SecretSpec = SecretSpec {
    env_var: "ADMIN_PASSWORD",
    required: false,
    min_length: None,
};

/// Admin token signing key
const ADMIN_TOKEN_SECRET: SecretSpec = SecretSpec {
    env_var: "ADMIN_TOKEN_SECRET",
    required: false,
    min_length: Some(32),
};

/// Centralized manager for application secrets
///
/// Both secrets are optional at load time. An absent admin password is not a
/// startup failure: the admin gate reports it on every login attempt instead.
/// A secret that is present but malformed is rejected here.
pub struct SecretManager {
    admin_password: Option<String>,
    token_secret: Option<String>,
}

impl SecretManager {
    /// Initialize from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::init_from(Arc::new(SystemEnvironment))
    }

    /// Initialize from the given environment provider
    pub fn init_from(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, SecretError> {
        let admin_password = Self::load_secret(env_provider.as_ref(), &ADMIN_PASSWORD)?;
        let token_secret = Self::load_secret(env_provider.as_ref(), &ADMIN_TOKEN_SECRET)?;

        if admin_password.is_none() {
            tracing::error!("ADMIN_PASSWORD is not set; admin login will fail until it is configured");
        }

        Ok(Self {
            admin_password,
            token_secret,
        })
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }

    /// Load one secret from the environment and check its shape
    fn load_secret(
        env_provider: &(dyn EnvironmentProvider + Send + Sync),
        spec: &SecretSpec,
    ) -> Result<Option<String>, SecretError> {
        let name = spec.env_var;
        let Some(value) = env_provider.get_non_empty(name) else {
            return if spec.required {
                Err(SecretError::missing(name))
            } else {
                Ok(None)
            };
        };

        if let Some(min_len) = spec.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(Some(value))
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
