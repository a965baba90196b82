//! End-to-end tests of the HTTP adapter.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use clap::Parser;
use inmem_core::{BackendConfig, Database, InMemoryBackend};
use inmem_server::{build_backend, create_app, ServerConfig};
use rstest::rstest;
use serde_json::{json, Value};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn hero_seed() -> Database {
    serde_json::from_value(json!({
        "heroes": [
            {"id": 1, "name": "Windstorm"},
            {"id": 2, "name": "Bombasto"},
            {"id": 3, "name": "Magneta"}
        ],
        "nobodies": []
    }))
    .expect("seed")
}

fn server_with(config: BackendConfig) -> TestServer {
    let backend = InMemoryBackend::builder(hero_seed()).config(config).build();
    TestServer::new(create_app(Arc::new(backend))).expect("Failed to create test server")
}

fn server() -> TestServer {
    server_with(BackendConfig::default().with_delay(0))
}

async fn fixture_server() -> TestServer {
    let config = ServerConfig::try_parse_from([
        "inmem-server",
        "--seed",
        &format!("{FIXTURES}/seed/*"),
        "--config",
        &format!("{FIXTURES}/backend.jsonc"),
        "--overrides",
        &format!("{FIXTURES}/overrides.yaml"),
    ])
    .expect("config");
    let backend = build_backend(&config).await.expect("backend");
    TestServer::new(create_app(Arc::new(backend))).expect("Failed to create test server")
}

#[tokio::test]
async fn test_get_collection() {
    let response = server().get("/app/heroes").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
}

#[rstest]
#[case("/app/heroes?id=1", 1)]
#[case("/app/heroes/?id=1", 1)]
#[case("/app/heroes?name=a", 2)]
#[case("/app/heroes?name=Windstorm&id=2", 0)]
#[tokio::test]
async fn test_query_filters(#[case] path: &str, #[case] expected: usize) {
    let body: Value = server().get(path).await.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(expected));
}

#[tokio::test]
async fn test_post_then_get() {
    let server = server();

    let response = server
        .post("/app/heroes")
        .json(&json!({"name": "Celeritas"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("location"), "/app/heroes/4");
    let body: Value = response.json();
    assert_eq!(body["data"], json!({"id": 4, "name": "Celeritas"}));

    let body: Value = server.get("/app/heroes/4").await.json();
    assert_eq!(body["data"]["name"], "Celeritas");
}

#[tokio::test]
async fn test_put_and_delete() {
    let server = server();

    server
        .put("/app/heroes/2")
        .json(&json!({"name": "Bombastic"}))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/app/heroes/1")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body: Value = server.get("/app/heroes").await.json();
    assert_eq!(
        body["data"],
        json!([{"id": 2, "name": "Bombastic"}, {"id": 3, "name": "Magneta"}])
    );
}

#[rstest]
#[case(Method::GET, "/app/unknown")]
#[case(Method::GET, "/app/heroes/99")]
#[case(Method::GET, "/app")]
#[case(Method::PUT, "/app/heroes")]
#[tokio::test]
async fn test_not_found(#[case] method: Method, #[case] path: &str) {
    let response = server().method(method, path).await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let response = server().method(Method::PATCH, "/app/heroes/1").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[rstest]
#[case("{oops")]
#[case("\"just a string\"")]
#[tokio::test]
async fn test_bad_body_is_400(#[case] body: &str) {
    let response = server().post("/app/heroes").text(body).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_without_data_encapsulation() {
    let server = server_with(BackendConfig {
        delay: 0,
        data_encapsulation: false,
        ..Default::default()
    });

    let body: Value = server.get("/app/heroes/1").await.json();
    assert_eq!(body, json!({"id": 1, "name": "Windstorm"}));
}

#[tokio::test]
async fn test_commands() {
    let server = server();
    server
        .post("/app/nobodies")
        .json(&json!({"id": 42, "name": "Noman"}))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/commands/resetDb")
        .json(&json!({"clear": true}))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let body: Value = server.get("/app/heroes").await.json();
    assert_eq!(body["data"], json!([]));

    let response = server
        .post("/commands/config")
        .json(&json!({"delete_404": true}))
        .await;
    response.assert_status_ok();
    let config: Value = server.get("/commands/config").await.json();
    assert_eq!(config["delete_404"], json!(true));
    assert_eq!(config["delay"], json!(0));
}

#[tokio::test]
async fn test_fixture_backend() {
    let server = fixture_server().await;

    let body: Value = server.get("/api/villains").await.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    server
        .post("/api/villains")
        .json(&json!({"name": "Nameless"}))
        .await
        .assert_status_not_found();

    let response = server
        .post("/api/heroes")
        .json(&json!({"name": "Maxinius"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], json!(1001));

    // post_409 from backend.jsonc
    server
        .post("/api/heroes")
        .json(&json!({"id": 1, "name": "Copycat"}))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .post("/commands/resetDb")
        .json(&json!({"clear": true}))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let heroes: Value = server.get("/api/heroes").await.json();
    let villains: Value = server.get("/api/villains").await.json();
    assert_eq!(heroes["data"], json!([]));
    assert_eq!(villains["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_missing_seed_files() {
    let config =
        ServerConfig::try_parse_from(["inmem-server", "--seed", &format!("{FIXTURES}/none/*")])
            .expect("config");
    assert!(build_backend(&config).await.is_err());
}
