#![cfg(feature = "server")]

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use common::{archive, plugin_zip, plugins};
use pmgr_kernel::server::ApiState;
use pmgr_kernel::server::extract::FORUM_USER_HEADER;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

async fn app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::config();
    let media = common::media(&dir).await;
    let catalog = pmgr_catalog::init(&config, media.clone()).expect("catalog");
    let state = ApiState::builder()
        .config(config)
        .media(media)
        .register_slice(catalog)
        .build()
        .expect("state");
    let (router, _) = pmgr_catalog::api::router().split_for_parts();
    (router.with_state(state), dir)
}

fn request(method: Method, uri: &str, user: Option<u64>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(FORUM_USER_HEADER, user.to_string());
    }
    builder.body(body).expect("request")
}

fn json_request(method: Method, uri: &str, user: Option<u64>, body: &Value) -> Request<Body> {
    let mut request = request(method, uri, user, Body::from(body.to_string()));
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, "application/json".parse().expect("content type"));
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn register(app: &Router, forum_id: u64, username: &str) {
    let body = json!({ "forumId": forum_id, "username": username });
    let (status, _) = send(app, json_request(Method::POST, "/users", None, &body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_gungame(app: &Router) {
    let uri = "/plugins?name=GunGame&version=1.0&synopsis=Level%20up";
    let (status, body) =
        send_json(app, request(Method::POST, uri, Some(1), Body::from(plugin_zip("gungame")))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn plugin_lifecycle_over_http() {
    let (app, _dir) = app().await;
    register(&app, 1, "satoshi").await;
    create_gungame(&app).await;

    let (status, body) = send_json(&app, request(Method::GET, "/plugins/gungame", None, Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basename"], "gungame");
    assert_eq!(body["currentVersion"], "1.0");
    assert_eq!(body["synopsis"], "Level up");
    assert_eq!(body["releases"][0]["fileName"], "gungame-v1.0.zip");

    let (status, body) = send_json(&app, request(Method::GET, "/plugins", None, Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["slug"], "gungame");

    let (status, bytes) = send(
        &app,
        request(Method::GET, "/plugins/gungame/releases/gungame-v1.0.zip", None, Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, plugin_zip("gungame"));

    let (status, _) = send(&app, request(Method::GET, "/packages/gungame", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn uploads_need_a_known_user() {
    let (app, _dir) = app().await;
    let (status, _) =
        send(&app, request(Method::POST, "/plugins?name=G&version=1.0", None, Body::empty())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(
        &app,
        request(Method::POST, "/plugins?name=G&version=1.0", Some(7), Body::from(plugin_zip("gungame"))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forum user 7 is not registered.");
}

#[tokio::test]
async fn rejections_carry_code_and_field() {
    let (app, _dir) = app().await;
    register(&app, 1, "satoshi").await;
    let zip = archive(&[(plugins!("gungame/core.py"), "")]);

    let (status, body) =
        send_json(&app, request(Method::POST, "/plugins?name=G&version=1.0", Some(1), Body::from(zip))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "not-found");
    assert_eq!(body["field"], "zip_file");

    create_gungame(&app).await;
    let (status, body) = send_json(
        &app,
        request(Method::POST, "/plugins?name=G&version=2.0", Some(1), Body::from(plugin_zip("gungame"))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Plugin \"gungame\" already registered.");
}

#[tokio::test]
async fn sub_plugins_nest_below_their_plugin() {
    let (app, _dir) = app().await;
    register(&app, 1, "satoshi").await;
    create_gungame(&app).await;

    let path = json!({ "path": "modes", "allowPackageUsingBasename": true });
    let (status, body) =
        send_json(&app, json_request(Method::POST, "/plugins/gungame/paths", Some(1), &path)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["allowModule"], false);

    let zip = archive(&[(plugins!("gungame/modes/deathmatch/deathmatch.py"), "")]);
    let (status, body) = send_json(
        &app,
        request(Method::POST, "/plugins/gungame/sub-plugins?name=DM&version=1.0", Some(1), Body::from(zip)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["kind"], "sub-plugin");
    assert_eq!(body["plugin"], "gungame");

    let (status, body) = send_json(
        &app,
        request(Method::GET, "/plugins/gungame/sub-plugins/deathmatch", None, Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basename"], "deathmatch");

    let (status, _) = send(
        &app,
        request(Method::GET, "/plugins/warcraft/sub-plugins", None, Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inspection_is_a_dry_run() {
    let (app, _dir) = app().await;
    let (status, body) = send_json(
        &app,
        request(Method::POST, "/archives/inspect/plugin", None, Body::from(plugin_zip("gungame"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basename"], "gungame");
    assert_eq!(body["isModule"], false);

    let (status, _) = send(&app, request(Method::GET, "/plugins/gungame", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(Method::POST, "/archives/inspect/theme", None, Body::from(plugin_zip("gungame"))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metadata_routes() {
    let (app, _dir) = app().await;
    let (status, body) = send_json(&app, request(Method::GET, "/games", None, Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) =
        send_json(&app, request(Method::GET, "/requirements/pypi", None, Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, request(Method::GET, "/requirements/npm", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, request(Method::GET, "/users/1", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
}
