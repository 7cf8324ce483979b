mod common;

use std::sync::Arc;

use chakra_stones::app_data::AppData;
use chakra_stones::services::AdminGate;
use chakra_stones::stores::MemoryStoneStore;
use common::{memory_app_data, test_client, ADMIN_PASSWORD};
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_correct_password_issues_token() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli
        .post("/api/login")
        .body_json(&json!({ "password": ADMIN_PASSWORD }))
        .send()
        .await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("success").assert_bool(true);
    body.get("expiresIn").assert_i64(1800);
    assert!(!body.get("token").string().is_empty());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli
        .post("/api/login")
        .body_json(&json!({ "password": "wrong" }))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.json().await.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn test_missing_password_is_bad_request() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli.post("/api/login").body_json(&json!({})).send().await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.json().await.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli
        .post("/api/login")
        .content_type("application/json")
        .body("password=secret")
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.json().await.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn test_unconfigured_password_fails_closed() {
    let gate = Arc::new(AdminGate::from_parts(None, None, true).unwrap());
    let app_data = AppData::from_parts(None, Arc::new(MemoryStoneStore::new()), gate, "*");
    let cli = test_client(&app_data);

    let resp = cli
        .post("/api/login")
        .body_json(&json!({ "password": "anything" }))
        .send()
        .await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    resp.json().await.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn test_get_on_login_is_method_not_allowed() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli.get("/api/login").send().await;

    resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    resp.json().await.value().object().get("success").assert_bool(false);
}

#[tokio::test]
async fn test_token_from_login_authorizes_writes() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);
    let token = common::admin_token(&cli).await;

    let resp = cli
        .post("/api/stones")
        .header("Authorization", common::bearer(&token))
        .body_json(&json!({"name": "Amethyst", "virtues": "calm", "chakraId": "svg-crown"}))
        .send()
        .await;

    resp.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_refresh_renews_token_for_writes() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);
    let token = common::admin_token(&cli).await;

    let resp = cli
        .post("/api/login/refresh")
        .header("Authorization", common::bearer(&token))
        .send()
        .await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("expiresIn").assert_i64(1800);
    let renewed = json.value().object().get("token").string().to_string();
    assert_ne!(renewed, token);

    cli.post("/api/stones")
        .header("Authorization", common::bearer(&renewed))
        .body_json(&json!({"name": "Amethyst", "virtues": "calm", "chakraId": "svg-crown"}))
        .send()
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_refresh_with_bad_token_is_unauthorized() {
    let app_data = memory_app_data(true);
    let cli = test_client(&app_data);

    let resp = cli
        .post("/api/login/refresh")
        .header("Authorization", common::bearer("not-a-token"))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.json().await.value().object().get("success").assert_bool(false);
}
