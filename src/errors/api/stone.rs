use crate::errors::internal::{AdminGateError, InternalError, StoneError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Stone endpoint error types
#[derive(ApiResponse, Debug)]
pub enum StoneApiError {
    /// Malformed JSON, missing required field or malformed id
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Admin token missing, invalid or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Well-formed id with no matching stone
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Unexpected failure
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),

    /// Storage unreachable or server misconfigured
    #[oai(status = 503)]
    ServiceUnavailable(Json<ErrorResponse>),
}

impl StoneApiError {
    /// Body that is not JSON, not sent as JSON, or has wrong field types
    pub fn invalid_body() -> Self {
        StoneApiError::BadRequest(Json(ErrorResponse::new(
            "invalid_body",
            "Invalid JSON in request body",
            400,
        )))
    }

    pub fn invalid_id() -> Self {
        StoneApiError::BadRequest(Json(ErrorResponse::new(
            "invalid_id",
            "Invalid stone ID format",
            400,
        )))
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        StoneApiError::BadRequest(Json(ErrorResponse::new(
            "missing_fields",
            format!("Missing required fields ({})", fields.join(", ")),
            400,
        )))
    }

    pub fn unknown_chakra(chakra: &str) -> Self {
        StoneApiError::BadRequest(Json(ErrorResponse::new(
            "unknown_chakra",
            format!("Unknown chakra: {}", chakra),
            400,
        )))
    }

    pub fn not_found() -> Self {
        StoneApiError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Stone not found",
            404,
        )))
    }

    pub fn unauthorized(message: &str) -> Self {
        StoneApiError::Unauthorized(Json(ErrorResponse::new(
            "unauthorized",
            message,
            401,
        )))
    }

    fn service_unavailable() -> Self {
        StoneApiError::ServiceUnavailable(Json(ErrorResponse::new(
            "service_unavailable",
            "Database connection error.",
            503,
        )))
    }

    /// Generic internal error; never carries internal details
    fn internal_server_error() -> Self {
        StoneApiError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "Internal Server Error",
            500,
        )))
    }

    /// Convert InternalError to StoneApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        if err.is_unavailable() {
            tracing::error!("Stone storage unavailable: {}", err);
            return Self::service_unavailable();
        }

        match &err {
            InternalError::Stone(StoneError::InvalidId(id)) => {
                tracing::debug!("Invalid stone id: {}", id);
                Self::invalid_id()
            }
            InternalError::Stone(StoneError::NotFound(id)) => {
                tracing::debug!("Stone not found: {}", id);
                Self::not_found()
            }
            InternalError::Stone(StoneError::MissingFields(fields)) => {
                tracing::debug!("Stone request missing fields: {:?}", fields);
                Self::missing_fields(fields)
            }
            InternalError::Stone(StoneError::UnknownChakra(chakra)) => {
                tracing::debug!("Stone request with unknown chakra: {}", chakra);
                Self::unknown_chakra(chakra)
            }
            InternalError::AdminGate(AdminGateError::MissingToken) => {
                Self::unauthorized("Admin token required")
            }
            InternalError::AdminGate(AdminGateError::ExpiredToken) => {
                Self::unauthorized("Admin token has expired")
            }
            InternalError::AdminGate(AdminGateError::InvalidToken(reason)) => {
                tracing::debug!("Invalid admin token: {}", reason);
                Self::unauthorized("Invalid admin token")
            }
            _ => {
                tracing::error!("Unexpected error in stone operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    pub fn response(&self) -> &ErrorResponse {
        match self {
            StoneApiError::BadRequest(json)
            | StoneApiError::Unauthorized(json)
            | StoneApiError::NotFound(json)
            | StoneApiError::InternalError(json)
            | StoneApiError::ServiceUnavailable(json) => &json.0,
        }
    }
}

impl From<InternalError> for StoneApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl From<StoneError> for StoneApiError {
    fn from(err: StoneError) -> Self {
        Self::from_internal_error(InternalError::Stone(err))
    }
}

impl fmt::Display for StoneApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
