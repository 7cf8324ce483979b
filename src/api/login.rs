use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers::{create_request_context, extract_bearer_token};
use crate::errors::LoginError;
use crate::services::AdminGate;
use crate::types::dto::login::{LoginRequest, LoginResponse};

/// Admin gate endpoint
pub struct LoginApi {
    admin_gate: Arc<AdminGate>,
}

impl LoginApi {
    pub fn new(admin_gate: Arc<AdminGate>) -> Self {
        Self { admin_gate }
    }
}

#[derive(Tags)]
enum LoginTags {
    /// Admin mode
    Admin,
}

#[OpenApi]
impl LoginApi {
    /// Check the admin password
    ///
    /// On success returns an admin session token for the write endpoints,
    /// valid for 30 minutes.
    #[oai(path = "/login", method = "post", tag = "LoginTags::Admin")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, LoginError> {
        let ctx = create_request_context(req);

        let issued = self.admin_gate.login(body.0.password.as_deref()).map_err(|err| {
            tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Admin login refused: {}", err);
            LoginError::from_internal_error(err)
        })?;

        Ok(Json(LoginResponse::granted(issued.token, issued.expires_in)))
    }

    /// Renew an admin session token
    ///
    /// Takes the current token as `Authorization: Bearer` and returns a new
    /// one valid for another 30 minutes. Expired or invalid tokens get 401.
    #[oai(path = "/login/refresh", method = "post", tag = "LoginTags::Admin")]
    async fn refresh(&self, req: &Request) -> Result<Json<LoginResponse>, LoginError> {
        let ctx = create_request_context(req);
        let token = extract_bearer_token(req);

        let issued = self.admin_gate.refresh(token.as_deref()).map_err(|err| {
            tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Admin token renewal refused: {}", err);
            LoginError::from_internal_error(err)
        })?;

        Ok(Json(LoginResponse::granted(issued.token, issued.expires_in)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(password: Option<&str>) -> LoginApi {
        let gate = AdminGate::from_parts(password.map(str::to_string), None, true).unwrap();
        LoginApi::new(Arc::new(gate))
    }

    fn body(password: Option<&str>) -> Json<LoginRequest> {
        Json(LoginRequest {
            password: password.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let req = Request::builder().finish();

        let resp = api(Some("open-sesame")).login(&req, body(Some("open-sesame"))).await.unwrap();

        assert!(resp.0.success);
        assert!(resp.0.token.is_some());
        assert_eq!(resp.0.expires_in, Some(1800));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let req = Request::builder().finish();

        let err = api(Some("open-sesame")).login(&req, body(Some("wrong"))).await.unwrap_err();

        assert!(matches!(err, LoginError::Unauthorized(_)));
        assert!(!err.response().success);
    }

    #[tokio::test]
    async fn test_login_missing_password_is_bad_request() {
        let req = Request::builder().finish();

        let err = api(Some("open-sesame")).login(&req, body(None)).await.unwrap_err();

        assert!(matches!(err, LoginError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_login_without_configured_password_is_internal_error() {
        let req = Request::builder().finish();

        let err = api(None).login(&req, body(Some("anything"))).await.unwrap_err();

        assert!(matches!(err, LoginError::InternalError(_)));
        assert_eq!(err.response().message.as_deref(), Some("Server configuration error"));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_token() {
        let api = api(Some("open-sesame"));
        let login = api
            .login(&Request::builder().finish(), body(Some("open-sesame")))
            .await
            .unwrap();
        let req = Request::builder()
            .header("Authorization", format!("Bearer {}", login.0.token.clone().unwrap()))
            .finish();

        let renewed = api.refresh(&req).await.unwrap();

        assert!(renewed.0.success);
        assert_eq!(renewed.0.expires_in, Some(1800));
        assert_ne!(renewed.0.token, login.0.token);
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_unauthorized() {
        let err = api(Some("open-sesame")).refresh(&Request::builder().finish()).await.unwrap_err();

        assert!(matches!(err, LoginError::Unauthorized(_)));
        assert_eq!(err.response().message.as_deref(), Some("Admin session expired"));
    }
}
