use super::dto::{RegisterUserRequest, UserDetail, UserView};
use crate::Catalog;
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use pmgr_derive::api_handler;
use pmgr_kernel::domain::constants::api_tags;
use pmgr_kernel::server::ApiResult;

#[api_handler(
    get,
    path = "/users",
    responses((status = OK, body = [UserView])),
    tag = api_tags::PEOPLE,
)]
pub(super) async fn list_users(catalog: Catalog) -> Json<Vec<UserView>> {
    Json(catalog.users().into_iter().map(Into::into).collect())
}

#[api_handler(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = CREATED, body = UserView),
        (status = CONFLICT, description = "Forum id or username already registered"),
    ),
    tag = api_tags::PEOPLE,
)]
pub(super) async fn register_user(
    catalog: Catalog,
    Json(request): Json<RegisterUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = catalog.register_user(request.forum_id, &request.username)?;
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

#[api_handler(
    get,
    path = "/users/{forum_id}",
    params(("forum_id" = u64, Path)),
    responses(
        (status = OK, body = UserDetail),
        (status = NOT_FOUND, description = "Unknown user"),
    ),
    tag = api_tags::PEOPLE,
)]
pub(super) async fn user_detail(
    catalog: Catalog,
    Path(forum_id): Path<u64>,
) -> ApiResult<Json<UserDetail>> {
    let user = catalog.user(forum_id)?;
    let projects = catalog.user_projects(forum_id)?;
    Ok(Json(UserDetail::new(user, &projects)))
}
