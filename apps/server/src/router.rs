use axum::Router;
use axum::extract::DefaultBodyLimit;
use pmgr::kernel::server::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// Prefix of the versioned REST API.
pub const API_PREFIX: &str = "/api/v1";

/// Bodies this far over the archive limit still reach the inspector's size check.
const BODY_SLACK: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(info(title = "Project Manager", description = "Plugins, packages and sub-plugins"))]
struct ApiDoc;

/// Builds the application: system routes, the versioned API and the Scalar UI at `/api`.
#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let body_limit = state.config.archive.max_upload_bytes.saturating_add(BODY_SLACK);

    let (routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(pmgr::server::router::system_router())
        .nest(API_PREFIX, pmgr::server::api_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    Router::new().merge(routes).merge(Scalar::with_url("/api", api_doc))
}
