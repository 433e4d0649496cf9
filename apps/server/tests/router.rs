use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use pmgr::domain::config::GameSeed;
use pmgr_server::{API_PREFIX, Server};
use serde_json::Value;
use tower::ServiceExt;

async fn server(dir: &tempfile::TempDir) -> Server {
    let mut cfg = pmgr::domain::config::ApiConfig::default();
    cfg.catalog.games =
        vec![GameSeed { name: "Counter-Strike: Source".into(), basename: "cstrike".into(), icon: None }];
    Server::builder()
        .config(cfg)
        .media_dir(dir.path().join("media"))
        .build()
        .await
        .expect("server")
}

async fn get(server: &Server, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
    let response = server.router().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, body.to_vec())
}

#[tokio::test]
async fn health_is_served_at_the_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = server(&dir).await;

    let (status, body) = get(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn catalog_is_mounted_under_the_api_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = server(&dir).await;
    assert!(server.state().slice_names().any(|name| name == "Catalog"));

    let (status, body) = get(&server, &format!("{API_PREFIX}/games")).await;
    assert_eq!(status, StatusCode::OK);
    let games: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(games[0]["slug"], "cstrike");

    let (status, _) = get(&server, "/games").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_reference_is_published() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = server(&dir).await;

    let (status, body) = get(&server, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).to_lowercase().contains("html"));
}
