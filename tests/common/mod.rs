// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chakra_stones::api::{build_routes, CorsEndpoint};
use chakra_stones::app_data::AppData;
use chakra_stones::config::DatabaseConnections;
use chakra_stones::services::AdminGate;
use chakra_stones::stores::{MemoryStoneStore, StoneStore};
use migration::{Migrator, MigratorTrait};
use poem::test::TestClient;
use poem::Route;
use sea_orm::{Database, DatabaseConnection};

pub const ADMIN_PASSWORD: &str = "open-sesame";

pub type TestApp = TestClient<CorsEndpoint<Route>>;

/// Creates an in-memory SQLite database with the stones schema applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

fn admin_gate(require_token: bool) -> Arc<AdminGate> {
    Arc::new(
        AdminGate::from_parts(Some(ADMIN_PASSWORD.to_string()), None, require_token)
            .expect("Failed to build admin gate"),
    )
}

/// App data backed by the in-memory store
pub fn memory_app_data(require_token: bool) -> AppData {
    AppData::from_parts(None, Arc::new(MemoryStoneStore::new()), admin_gate(require_token), "*")
}

/// App data backed by SQLite; the connection is returned for raw inserts
pub async fn sqlite_app_data() -> (AppData, DatabaseConnection) {
    let db = setup_test_db().await;
    let connections = Arc::new(DatabaseConnections::from_connection(db.clone()));
    let app_data = AppData::from_parts(
        Some(connections.clone()),
        Arc::new(StoneStore::new(connections)),
        admin_gate(true),
        "*",
    );
    (app_data, db)
}

pub fn test_client(app_data: &AppData) -> TestApp {
    TestClient::new(build_routes(app_data))
}

/// Log in through the API and return the issued token
pub async fn admin_token(cli: &TestApp) -> String {
    let resp = cli
        .post("/api/login")
        .body_json(&serde_json::json!({ "password": ADMIN_PASSWORD }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let json = resp.json().await;
    json.value().object().get("token").string().to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
