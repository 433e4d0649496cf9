use super::dto::InspectParams;
use crate::Catalog;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use pmgr_archive::api::InspectionResponse;
use pmgr_derive::api_handler;
use pmgr_kernel::domain::constants::api_tags;
use pmgr_kernel::domain::project::ProjectKind;
use pmgr_kernel::server::{ApiError, ApiResult};

/// Runs the upload checks without registering anything.
#[api_handler(
    post,
    path = "/archives/inspect/{kind}",
    params(
        ("kind" = String, Path, description = "package, plugin or sub-plugin"),
        InspectParams,
    ),
    request_body(content = Vec<u8>, content_type = "application/zip"),
    responses(
        (status = OK, description = "Archive accepted", body = InspectionResponse),
        (status = BAD_REQUEST, description = "Archive rejected"),
        (status = PAYLOAD_TOO_LARGE, description = "Archive exceeds the upload limit"),
    ),
    tag = api_tags::ARCHIVES,
)]
pub(super) async fn inspect_archive(
    catalog: Catalog,
    Path(kind): Path<String>,
    Query(params): Query<InspectParams>,
    body: Bytes,
) -> ApiResult<Json<InspectionResponse>> {
    let kind =
        kind.parse::<ProjectKind>().map_err(|err| ApiError::not_found(err.to_string()))?;
    let inspected = catalog.inspect_archive(kind, params.plugin.as_deref(), body.into()).await?;
    Ok(Json(inspected.into()))
}
