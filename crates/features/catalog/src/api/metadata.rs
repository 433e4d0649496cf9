//! Games, tags and requirement records.

use super::dto::{GameView, RequirementView, TagView};
use crate::Catalog;
use axum::Json;
use axum::extract::Path;
use pmgr_derive::api_handler;
use pmgr_kernel::domain::constants::api_tags;
use pmgr_kernel::domain::requirements::RequirementGroup;
use pmgr_kernel::server::{ActingUser, ApiError, ApiResult};

#[api_handler(
    get,
    path = "/games",
    responses((status = OK, body = [GameView])),
    tag = api_tags::METADATA,
)]
pub(super) async fn list_games(catalog: Catalog) -> Json<Vec<GameView>> {
    Json(catalog.games().into_iter().map(Into::into).collect())
}

#[api_handler(
    get,
    path = "/tags",
    responses((status = OK, body = [TagView])),
    tag = api_tags::METADATA,
)]
pub(super) async fn list_tags(catalog: Catalog) -> Json<Vec<TagView>> {
    Json(catalog.tags().into_iter().map(Into::into).collect())
}

#[api_handler(
    post,
    path = "/tags/{name}/blacklist",
    params(("name" = String, Path)),
    responses(
        (status = OK, description = "Tag blacklisted and unlinked everywhere", body = TagView),
        (status = FORBIDDEN, description = "Caller is not a registered user"),
    ),
    tag = api_tags::METADATA,
)]
pub(super) async fn blacklist_tag(
    catalog: Catalog,
    ActingUser(actor): ActingUser,
    Path(name): Path<String>,
) -> ApiResult<Json<TagView>> {
    Ok(Json(catalog.blacklist_tag(&name, actor)?.into()))
}

#[api_handler(
    get,
    path = "/requirements/{group}",
    params(("group" = String, Path, description = "custom, download, pypi or vcs")),
    responses(
        (status = OK, body = [RequirementView]),
        (status = NOT_FOUND, description = "Unknown group"),
    ),
    tag = api_tags::METADATA,
)]
pub(super) async fn list_requirements(
    catalog: Catalog,
    Path(group): Path<String>,
) -> ApiResult<Json<Vec<RequirementView>>> {
    let group = RequirementGroup::parse(&group)
        .ok_or_else(|| ApiError::not_found(format!("No requirement group \"{group}\".")))?;
    Ok(Json(catalog.requirements(group).into_iter().map(Into::into).collect()))
}
