use super::dto::{
    CreateProjectParams, ImageView, ProjectDetail, ProjectPage, ReleaseParams,
    UpdateProjectRequest,
};
use super::{ProjectRef, ProjectScope};
use crate::{Catalog, ListQuery};
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::Json;
use pmgr_derive::api_handler;
use pmgr_kernel::domain::constants::api_tags;
use pmgr_kernel::server::{ActingUser, ApiResult};
use tracing::debug;

fn detail(catalog: &Catalog, project: &crate::Project) -> ProjectDetail {
    ProjectDetail::new(project, &catalog.settings().forum_url)
}

#[api_handler(
    get,
    path = "/",
    params(ListQuery),
    responses(
        (status = OK, description = "One page of projects", body = ProjectPage),
        (status = NOT_FOUND, description = "Page out of range"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn list_projects(
    catalog: Catalog,
    scope: ProjectScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProjectPage>> {
    let page = catalog.list(scope.kind, scope.plugin.as_deref(), &query)?;
    Ok(Json(page.into()))
}

#[api_handler(
    post,
    path = "/",
    params(CreateProjectParams),
    request_body(content = Vec<u8>, content_type = "application/zip"),
    responses(
        (status = CREATED, description = "Project registered", body = ProjectDetail),
        (status = BAD_REQUEST, description = "Archive or metadata rejected"),
        (status = CONFLICT, description = "Basename already registered"),
        (status = PAYLOAD_TOO_LARGE, description = "Archive exceeds the upload limit"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn create_project(
    catalog: Catalog,
    scope: ProjectScope,
    ActingUser(owner): ActingUser,
    Query(params): Query<CreateProjectParams>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let project = catalog
        .create_project(scope.kind, scope.plugin.as_deref(), params.into(), body.into(), owner)
        .await?;
    Ok((StatusCode::CREATED, Json(detail(&catalog, &project))))
}

#[api_handler(
    get,
    path = "/{slug}",
    params(("slug" = String, Path)),
    responses(
        (status = OK, body = ProjectDetail),
        (status = NOT_FOUND, description = "Unknown project"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn project_detail(
    catalog: Catalog,
    project: ProjectRef,
) -> ApiResult<Json<ProjectDetail>> {
    let project = catalog.project(&project.key)?;
    Ok(Json(detail(&catalog, &project)))
}

#[api_handler(
    patch,
    path = "/{slug}",
    params(("slug" = String, Path)),
    request_body = UpdateProjectRequest,
    responses(
        (status = OK, body = ProjectDetail),
        (status = FORBIDDEN, description = "Caller may not edit the project"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn update_project(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = catalog.update_project(&project.key, request.into(), actor)?;
    Ok(Json(detail(&catalog, &project)))
}

#[api_handler(
    post,
    path = "/{slug}/releases",
    params(("slug" = String, Path), ReleaseParams),
    request_body(content = Vec<u8>, content_type = "application/zip"),
    responses(
        (status = CREATED, description = "Release added", body = ProjectDetail),
        (status = BAD_REQUEST, description = "Archive or version rejected"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_release(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
    Query(params): Query<ReleaseParams>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    catalog.add_release(&project.key, params.into(), body.into(), actor).await?;
    let project = catalog.project(&project.key)?;
    Ok((StatusCode::CREATED, Json(detail(&catalog, &project))))
}

#[api_handler(
    get,
    path = "/{slug}/releases/{file}",
    params(("slug" = String, Path), ("file" = String, Path, description = "`{slug}-v{version}.zip`")),
    responses(
        (status = OK, description = "Release archive", content_type = "application/zip", body = Vec<u8>),
        (status = NOT_FOUND, description = "Unknown release"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn download_release(
    catalog: Catalog,
    project: ProjectRef,
) -> ApiResult<impl IntoResponse> {
    let file = project.param("file")?;
    let (release, bytes) = catalog.download(&project.key, file).await?;
    debug!(project = %project.key, version = %release.version, "Serving release");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file}\"")),
        ],
        bytes,
    ))
}

#[api_handler(
    post,
    path = "/{slug}/contributors/{user}",
    params(("slug" = String, Path), ("user" = String, Path, description = "Forum username")),
    responses(
        (status = OK, body = ProjectDetail),
        (status = FORBIDDEN, description = "Only the owner manages contributors"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_contributor(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.add_contributor(&project.key, project.param("user")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    delete,
    path = "/{slug}/contributors/{user}",
    params(("slug" = String, Path), ("user" = String, Path, description = "Forum username")),
    responses((status = OK, body = ProjectDetail)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn remove_contributor(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.remove_contributor(&project.key, project.param("user")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    post,
    path = "/{slug}/tags/{tag}",
    params(("slug" = String, Path), ("tag" = String, Path)),
    responses((status = OK, body = ProjectDetail)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_tag(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.add_tag(&project.key, project.param("tag")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    delete,
    path = "/{slug}/tags/{tag}",
    params(("slug" = String, Path), ("tag" = String, Path)),
    responses((status = OK, body = ProjectDetail)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn remove_tag(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.remove_tag(&project.key, project.param("tag")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    post,
    path = "/{slug}/games/{game}",
    params(("slug" = String, Path), ("game" = String, Path, description = "Game slug or basename")),
    responses((status = OK, body = ProjectDetail)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_game(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.add_game(&project.key, project.param("game")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    delete,
    path = "/{slug}/games/{game}",
    params(("slug" = String, Path), ("game" = String, Path)),
    responses((status = OK, body = ProjectDetail)),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn remove_game(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.remove_game(&project.key, project.param("game")?, actor)?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    post,
    path = "/{slug}/logo",
    params(("slug" = String, Path)),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = OK, body = ProjectDetail),
        (status = BAD_REQUEST, description = "Not an image or too large"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn set_logo(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
    body: Bytes,
) -> ApiResult<Json<ProjectDetail>> {
    let updated = catalog.set_logo(&project.key, body.into(), actor).await?;
    Ok(Json(detail(&catalog, &updated)))
}

#[api_handler(
    post,
    path = "/{slug}/images",
    params(("slug" = String, Path)),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = CREATED, body = ImageView),
        (status = BAD_REQUEST, description = "Not an image, too large, or image limit reached"),
    ),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn add_image(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let image = catalog.add_image(&project.key, body.into(), actor).await?;
    Ok((StatusCode::CREATED, Json(ImageView::from(&image))))
}

#[api_handler(
    delete,
    path = "/{slug}/images/{id}",
    params(("slug" = String, Path), ("id" = String, Path)),
    responses((status = NO_CONTENT, description = "Image removed")),
    tag = api_tags::PROJECTS,
)]
pub(super) async fn remove_image(
    catalog: Catalog,
    project: ProjectRef,
    ActingUser(actor): ActingUser,
) -> ApiResult<StatusCode> {
    catalog.remove_image(&project.key, project.param("id")?, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
