use crate::errors::internal::{AdminGateError, InternalError};
use crate::types::dto::login::LoginResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Admin gate error types
///
/// Every variant carries the `{success: false}` body the front end expects.
#[derive(ApiResponse, Debug)]
pub enum LoginError {
    /// Missing password or unparseable body
    #[oai(status = 400)]
    BadRequest(Json<LoginResponse>),

    /// Password mismatch, or an admin token that can no longer be renewed
    #[oai(status = 401)]
    Unauthorized(Json<LoginResponse>),

    /// Admin secret not configured, or another server fault
    #[oai(status = 500)]
    InternalError(Json<LoginResponse>),
}

impl LoginError {
    pub fn bad_request() -> Self {
        LoginError::BadRequest(Json(LoginResponse::denied(
            "Invalid request or missing password",
        )))
    }

    pub fn incorrect_password() -> Self {
        LoginError::Unauthorized(Json(LoginResponse::denied("Incorrect password")))
    }

    pub fn session_expired() -> Self {
        LoginError::Unauthorized(Json(LoginResponse::denied("Admin session expired")))
    }

    pub fn configuration_error() -> Self {
        LoginError::InternalError(Json(LoginResponse::denied("Server configuration error")))
    }

    fn internal_server_error() -> Self {
        LoginError::InternalError(Json(LoginResponse::denied("An internal error occurred")))
    }

    /// Convert InternalError to LoginError
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::AdminGate(AdminGateError::MissingPassword) => Self::bad_request(),
            InternalError::AdminGate(AdminGateError::IncorrectPassword) => {
                tracing::debug!("Admin login with incorrect password");
                Self::incorrect_password()
            }
            InternalError::AdminGate(
                AdminGateError::MissingToken | AdminGateError::ExpiredToken | AdminGateError::InvalidToken(_),
            ) => {
                tracing::debug!("Admin token renewal refused: {}", err);
                Self::session_expired()
            }
            InternalError::AdminGate(AdminGateError::SecretNotConfigured) => {
                tracing::error!("ADMIN_PASSWORD is not configured; admin login is unavailable");
                Self::configuration_error()
            }
            _ => {
                tracing::error!("Unexpected error in admin login: {}", err);
                Self::internal_server_error()
            }
        }
    }

    pub fn response(&self) -> &LoginResponse {
        match self {
            LoginError::BadRequest(json)
            | LoginError::Unauthorized(json)
            | LoginError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for LoginError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().message.as_deref().unwrap_or("login failed"))
    }
}
