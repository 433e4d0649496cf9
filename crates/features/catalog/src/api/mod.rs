//! REST endpoints of the catalog, mounted below `/api/v1`.
//!
//! Packages and plugins share one set of project handlers; the project kind comes from an
//! [`Extension`] layered on each nested router. Sub-plugin routes live below their parent
//! plugin and reuse the same handlers.

mod archives;
mod dto;
mod metadata;
mod paths;
mod people;
mod projects;

pub use dto::*;

use crate::{Catalog, CatalogError};
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::Extension;
use fxhash::FxHashMap;
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};
use pmgr_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Rejected { source, context } => Self::Validation { source, context },
            CatalogError::NotFound { message, context } => Self::NotFound { message, context },
            CatalogError::Conflict { field, message, context } => {
                Self::Conflict { field: Some(field), message, context }
            },
            CatalogError::Forbidden { message, context } => Self::Forbidden { message, context },
            CatalogError::Archive { source, .. } => source.into(),
            CatalogError::Storage { source, .. } => source.into(),
            CatalogError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}

impl FromRequestParts<ApiState> for Catalog {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        state.try_get_slice::<Self>().cloned().map_err(|err| ApiError::from(err.to_string()))
    }
}

type PathParams = FxHashMap<String, String>;

async fn path_params(parts: &mut Parts, state: &ApiState) -> Result<PathParams, ApiError> {
    Path::<PathParams>::from_request_parts(parts, state)
        .await
        .map(|Path(params)| params)
        .map_err(|rejection| ApiError::not_found(rejection.body_text()))
}

async fn kind(parts: &mut Parts, state: &ApiState) -> Result<ProjectKind, ApiError> {
    Extension::<ProjectKind>::from_request_parts(parts, state)
        .await
        .map(|Extension(kind)| kind)
        .map_err(|_| ApiError::from("Route is missing its project kind"))
}

fn take(params: &mut PathParams, name: &str) -> Result<String, ApiError> {
    params.remove(name).ok_or_else(|| ApiError::from(format!("Missing path parameter {name}")))
}

/// Kind and parent plugin of a collection route (`/plugins`, `/plugins/{slug}/sub-plugins`).
#[derive(Debug, Clone)]
pub(crate) struct ProjectScope {
    pub(crate) kind: ProjectKind,
    pub(crate) plugin: Option<String>,
}

impl FromRequestParts<ApiState> for ProjectScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let kind = kind(parts, state).await?;
        let plugin = match kind {
            ProjectKind::SubPlugin => Some(take(&mut path_params(parts, state).await?, "slug")?),
            ProjectKind::Package | ProjectKind::Plugin => None,
        };
        Ok(Self { kind, plugin })
    }
}

/// A single project addressed by the route, with the remaining path parameters.
#[derive(Debug, Clone)]
pub(crate) struct ProjectRef {
    pub(crate) key: ProjectKey,
    params: PathParams,
}

impl ProjectRef {
    pub(crate) fn param(&self, name: &str) -> Result<&str, ApiError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::from(format!("Missing path parameter {name}")))
    }
}

impl FromRequestParts<ApiState> for ProjectRef {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let kind = kind(parts, state).await?;
        let mut params = path_params(parts, state).await?;
        let key = match kind {
            ProjectKind::Package => ProjectKey::package(take(&mut params, "slug")?),
            ProjectKind::Plugin => ProjectKey::plugin(take(&mut params, "slug")?),
            ProjectKind::SubPlugin => {
                let plugin = take(&mut params, "slug")?;
                ProjectKey::sub_plugin(plugin, take(&mut params, "sub_plugin")?)
            },
        };
        Ok(Self { key, params })
    }
}

/// Routes shared by packages and plugins, relative to the collection.
fn project_routes() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(projects::list_projects, projects::create_project))
        .routes(routes!(projects::project_detail, projects::update_project))
        .routes(routes!(projects::add_release))
        .routes(routes!(projects::download_release))
        .routes(routes!(projects::add_contributor, projects::remove_contributor))
        .routes(routes!(projects::add_tag, projects::remove_tag))
        .routes(routes!(projects::add_game, projects::remove_game))
        .routes(routes!(projects::set_logo))
        .routes(routes!(projects::add_image))
        .routes(routes!(projects::remove_image))
}

/// The same handlers below `/plugins/{slug}/sub-plugins`.
fn sub_plugin_routes() -> OpenApiRouter<ApiState> {
    const BASE: &str = "/plugins/{slug}/sub-plugins";
    let route = |suffix: &str| format!("{BASE}{suffix}");

    OpenApiRouter::new()
        .route(&route(""), get(projects::list_projects).post(projects::create_project))
        .route(
            &route("/{sub_plugin}"),
            get(projects::project_detail).patch(projects::update_project),
        )
        .route(&route("/{sub_plugin}/releases"), post(projects::add_release))
        .route(&route("/{sub_plugin}/releases/{file}"), get(projects::download_release))
        .route(
            &route("/{sub_plugin}/contributors/{user}"),
            post(projects::add_contributor).delete(projects::remove_contributor),
        )
        .route(
            &route("/{sub_plugin}/tags/{tag}"),
            post(projects::add_tag).delete(projects::remove_tag),
        )
        .route(
            &route("/{sub_plugin}/games/{game}"),
            post(projects::add_game).delete(projects::remove_game),
        )
        .route(&route("/{sub_plugin}/logo"), post(projects::set_logo))
        .route(&route("/{sub_plugin}/images"), post(projects::add_image))
        .route(&route("/{sub_plugin}/images/{id}"), axum::routing::delete(projects::remove_image))
        .layer(Extension(ProjectKind::SubPlugin))
}

/// All catalog routes, relative to the API prefix.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .nest("/packages", project_routes().layer(Extension(ProjectKind::Package)))
        .nest(
            "/plugins",
            project_routes()
                .routes(routes!(paths::list_paths, paths::add_path))
                .routes(routes!(paths::update_path, paths::remove_path))
                .layer(Extension(ProjectKind::Plugin)),
        )
        .merge(sub_plugin_routes())
        .routes(routes!(people::list_users, people::register_user))
        .routes(routes!(people::user_detail))
        .routes(routes!(metadata::list_games))
        .routes(routes!(metadata::list_tags))
        .routes(routes!(metadata::blacklist_tag))
        .routes(routes!(metadata::list_requirements))
        .routes(routes!(archives::inspect_archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pmgr_kernel::validation::Violation;

    #[test]
    fn catalog_errors_keep_their_http_meaning() {
        let conflict: ApiError = CatalogError::conflict("zip_file", "taken").into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.problem().field, Some("zip_file"));

        let rejected: ApiError = CatalogError::from(Violation::invalid("tag", "nope")).into();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let forbidden: ApiError = CatalogError::forbidden("owner only").into();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let internal: ApiError = CatalogError::from("lock poisoned").into();
        assert_eq!(internal.problem().message, "Internal server error");
    }
}
