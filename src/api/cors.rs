use poem::http::{header, HeaderValue, Method, StatusCode};
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response};

use crate::errors::{LoginError, StoneApiError};
use crate::types::dto::common::ErrorResponse;
use crate::types::dto::login::LoginResponse;

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// CORS and response-shape middleware
///
/// * `OPTIONS` on any path answers 204 with the CORS headers.
/// * Every response carries `Access-Control-Allow-Origin`.
/// * Error responses produced by routing itself (404, 405) are rewritten
///   into the JSON error body used by the endpoints.
/// * Request bodies poem-openapi cannot parse (400) or that are not sent as
///   JSON (415) become the endpoints' 400 invalid-body error.
pub struct Cors {
    allowed_origin: HeaderValue,
}

impl Cors {
    pub fn new(allowed_origin: &str) -> Self {
        let allowed_origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| {
            tracing::warn!("CORS_ALLOWED_ORIGIN '{}' is not a valid header value, using '*'", allowed_origin);
            HeaderValue::from_static("*")
        });
        Self { allowed_origin }
    }
}

impl<E: Endpoint> Middleware<E> for Cors {
    type Output = CorsEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        CorsEndpoint {
            inner: ep,
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}

pub struct CorsEndpoint<E> {
    inner: E,
    allowed_origin: HeaderValue,
}

impl<E> CorsEndpoint<E> {
    fn preflight_response(&self) -> Response {
        let mut resp = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS)
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400")
            .finish();
        self.add_origin(&mut resp);
        resp
    }

    fn add_origin(&self, resp: &mut Response) {
        let headers = resp.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allowed_origin.clone());
        if self.allowed_origin.as_bytes() != b"*" {
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}

/// Replace a non-JSON error body with the matching JSON shape
fn ensure_json_error(resp: Response, login_route: bool) -> Response {
    let status = resp.status();
    let is_json = resp
        .content_type()
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if !(status.is_client_error() || status.is_server_error()) || is_json {
        return resp;
    }

    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        tracing::debug!(status = status.as_u16(), "Rejected unparseable request body");
        let mut rewritten = if login_route {
            Json(LoginError::bad_request().response().clone()).into_response()
        } else {
            Json(StoneApiError::invalid_body().response().clone()).into_response()
        };
        rewritten.set_status(StatusCode::BAD_REQUEST);
        return rewritten;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    let mut rewritten = if login_route {
        Json(LoginResponse::denied(message)).into_response()
    } else {
        let error = match status {
            StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
            StatusCode::NOT_FOUND => "not_found",
            s if s.is_client_error() => "bad_request",
            _ => "internal_error",
        };
        Json(ErrorResponse::new(error, message, status.as_u16())).into_response()
    };
    rewritten.set_status(status);
    rewritten
}

impl<E: Endpoint> Endpoint for CorsEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        if req.method() == Method::OPTIONS {
            return Ok(self.preflight_response());
        }

        let path = req.uri().path();
        let login_route = path.ends_with("/login") || path.ends_with("/login/refresh");
        let resp = self.inner.get_response(req).await;

        let mut resp = ensure_json_error(resp, login_route);
        self.add_origin(&mut resp);
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::{handler, test::TestClient, EndpointExt, Route};

    #[handler]
    fn ok() -> &'static str {
        "ok"
    }

    #[handler]
    fn reject_body() -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    #[handler]
    fn reject_media_type() -> StatusCode {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    }

    #[tokio::test]
    async fn test_options_returns_preflight() {
        let app = Route::new().at("/ping", poem::get(ok)).with(Cors::new("*"));
        let cli = TestClient::new(app);

        let resp = cli.options("/anything").send().await;

        resp.assert_status(StatusCode::NO_CONTENT);
        resp.assert_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
        resp.assert_header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS);
        resp.assert_header(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS);
    }

    #[tokio::test]
    async fn test_configured_origin_adds_vary() {
        let app = Route::new().at("/ping", poem::get(ok)).with(Cors::new("https://stones.example"));
        let cli = TestClient::new(app);

        let resp = cli.get("/ping").send().await;

        resp.assert_status_is_ok();
        resp.assert_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "https://stones.example");
        resp.assert_header(header::VARY, "Origin");
    }

    #[tokio::test]
    async fn test_method_not_allowed_becomes_json() {
        let app = Route::new().at("/ping", poem::get(ok)).with(Cors::new("*"));
        let cli = TestClient::new(app);

        let resp = cli.patch("/ping").send().await;

        resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        resp.assert_content_type("application/json; charset=utf-8");
        let json = resp.json().await;
        json.value().object().get("status_code").assert_i64(405);
        json.value().object().get("error").assert_string("method_not_allowed");
    }

    #[tokio::test]
    async fn test_unparseable_body_becomes_invalid_body_error() {
        let app = Route::new().at("/stones", poem::post(reject_body)).with(Cors::new("*"));
        let cli = TestClient::new(app);

        let resp = cli.post("/stones").send().await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        let json = resp.json().await;
        json.value().object().get("error").assert_string("invalid_body");
        json.value().object().get("status_code").assert_i64(400);
    }

    #[tokio::test]
    async fn test_unsupported_media_type_becomes_bad_request() {
        let app = Route::new()
            .at("/stones", poem::post(reject_media_type))
            .at("/api/login/refresh", poem::post(reject_media_type))
            .with(Cors::new("*"));
        let cli = TestClient::new(app);

        let resp = cli.post("/stones").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.json().await.value().object().get("error").assert_string("invalid_body");

        let resp = cli.post("/api/login/refresh").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.json().await.value().object().get("success").assert_bool(false);
    }
}
