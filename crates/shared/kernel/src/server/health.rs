use axum::http::header;
use axum::{Json, response::IntoResponse};
use pmgr_derive::{api_handler, api_model};
use pmgr_domain::constants::api_tags;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model(response)]
pub(super) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Seconds since the first health probe.
    uptime: u64,
}

static STARTED: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is up", body = HealthResponse)),
    tag = api_tags::SYSTEM,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: STARTED.elapsed().as_secs(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

/// Starts the uptime clock; called once when the router is assembled.
pub(super) fn mark_started() {
    LazyLock::force(&STARTED);
}
