// API layer - HTTP endpoints
pub mod cors;
pub mod health;
pub mod helpers;
pub mod login;
pub mod stones;


use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

pub use cors::{Cors, CorsEndpoint};
pub use health::HealthApi;
pub use login::LoginApi;
pub use stones::StonesApi;

use crate::app_data::AppData;

pub type StonesService = OpenApiService<(HealthApi, StonesApi, LoginApi), ()>;

/// Prefix the endpoints are served under
pub const API_PREFIX: &str = "/api";

/// Legacy serverless-function prefix kept for the existing front end
pub const LEGACY_PREFIX: &str = "/.netlify/functions";

/// Build the OpenAPI service for one mount point
pub fn create_api_service(app_data: &AppData, server_url: &str) -> StonesService {
    let apis = (
        HealthApi::new(app_data.connections.clone()),
        StonesApi::new(app_data.repository.clone(), app_data.admin_gate.clone()),
        LoginApi::new(app_data.admin_gate.clone()),
    );

    OpenApiService::new(apis, "Chakra Stones API", env!("CARGO_PKG_VERSION")).server(server_url)
}

/// Compose every route: the API under both prefixes and Swagger UI under
/// `/swagger`, wrapped in the CORS middleware
pub fn build_routes(app_data: &AppData) -> CorsEndpoint<Route> {
    let api_service = create_api_service(app_data, API_PREFIX);
    let ui = api_service.swagger_ui();
    let legacy_service = create_api_service(app_data, LEGACY_PREFIX);

    Route::new()
        .nest(API_PREFIX, api_service)
        .nest(LEGACY_PREFIX, legacy_service)
        .nest("/swagger", ui)
        .with(Cors::new(&app_data.cors_allowed_origin))
}
