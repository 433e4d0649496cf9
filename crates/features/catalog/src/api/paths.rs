//! Sub-plugin install paths of a plugin.

use super::ProjectRef;
use super::dto::{PathRequest, PathView};
use crate::Catalog;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use pmgr_derive::api_handler;
use pmgr_kernel::domain::constants::api_tags;
use pmgr_kernel::server::{ActingUser, ApiResult};

#[api_handler(
    get,
    path = "/{slug}/paths",
    params(("slug" = String, Path, description = "Plugin slug")),
    responses((status = OK, body = [PathView])),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn list_paths(catalog: Catalog, plugin: ProjectRef) -> ApiResult<Json<Vec<PathView>>> {
    let paths = catalog.paths(&plugin.key.slug)?;
    Ok(Json(paths.iter().map(Into::into).collect()))
}

#[api_handler(
    post,
    path = "/{slug}/paths",
    params(("slug" = String, Path, description = "Plugin slug")),
    request_body = PathRequest,
    responses(
        (status = CREATED, body = PathView),
        (status = BAD_REQUEST, description = "Malformed or duplicate path"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_path(
    catalog: Catalog,
    plugin: ProjectRef,
    ActingUser(actor): ActingUser,
    Json(request): Json<PathRequest>,
) -> ApiResult<impl IntoResponse> {
    let added = catalog.add_path(&plugin.key.slug, &request.into(), actor)?;
    Ok((StatusCode::CREATED, Json(PathView::from(&added))))
}

#[api_handler(
    patch,
    path = "/{slug}/paths/{id}",
    params(("slug" = String, Path, description = "Plugin slug"), ("id" = String, Path)),
    request_body = PathRequest,
    responses((status = OK, body = PathView)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn update_path(
    catalog: Catalog,
    plugin: ProjectRef,
    ActingUser(actor): ActingUser,
    Json(request): Json<PathRequest>,
) -> ApiResult<Json<PathView>> {
    let updated =
        catalog.update_path(&plugin.key.slug, plugin.param("id")?, &request.into(), actor)?;
    Ok(Json(PathView::from(&updated)))
}

#[api_handler(
    delete,
    path = "/{slug}/paths/{id}",
    params(("slug" = String, Path, description = "Plugin slug"), ("id" = String, Path)),
    responses((status = NO_CONTENT, description = "Path removed")),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn remove_path(
    catalog: Catalog,
    plugin: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<StatusCode> {
    catalog.remove_path(&plugin.key.slug, plugin.param("id")?, actor)?;
    Ok(StatusCode::NO_CONTENT)
}
