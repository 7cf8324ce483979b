use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for the admin gate
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Admin password; a missing or empty value is rejected with 400
    pub password: Option<String>,
}

/// Response model for the admin gate
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Whether the password matched
    pub success: bool,

    /// Human-readable reason on failure
    #[oai(skip_serializing_if_is_none)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Admin session token (JWT) on success
    #[oai(skip_serializing_if_is_none)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Token lifetime in seconds
    #[oai(skip_serializing_if_is_none)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl LoginResponse {
    pub fn granted(token: String, expires_in: i64) -> Self {
        Self {
            success: true,
            message: None,
            token: Some(token),
            expires_in: Some(expires_in),
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            token: None,
            expires_in: None,
        }
    }
}
