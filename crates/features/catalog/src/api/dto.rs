//! Request and response bodies of the catalog routes.

use crate::model::{
    ForumUser, Game, Project, ProjectImage, Release, RequirementLink, SubPluginPath, Tag,
};
use crate::people::UserProjects;
use crate::query::Page;
use crate::requirements::RequirementEntry;
use crate::{NewPath, NewProject, NewRelease, ProjectUpdate};
use chrono::{DateTime, Utc};
use pmgr_derive::api_model;
use pmgr_kernel::domain::layout::PathLayout;
use pmgr_kernel::domain::project::ProjectKey;

/// Query of `POST /{kind}`; the archive is the request body.
#[api_model(request, rename_all = "snake_case")]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct CreateProjectParams {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub configuration: String,
    pub topic: Option<u32>,
}

impl From<CreateProjectParams> for NewProject {
    fn from(params: CreateProjectParams) -> Self {
        Self {
            name: params.name,
            version: params.version,
            notes: params.notes,
            synopsis: params.synopsis,
            description: params.description,
            configuration: params.configuration,
            topic: params.topic,
        }
    }
}

/// Query of `POST /{kind}/{slug}/releases`; the archive is the request body.
#[api_model(request, rename_all = "snake_case")]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct ReleaseParams {
    pub version: String,
    #[serde(default)]
    pub notes: String,
}

impl From<ReleaseParams> for NewRelease {
    fn from(params: ReleaseParams) -> Self {
        Self { version: params.version, notes: params.notes }
    }
}

#[api_model(request)]
#[derive(Default)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub synopsis: Option<String>,
    pub description: Option<String>,
    pub configuration: Option<String>,
    pub topic: Option<u32>,
}

impl From<UpdateProjectRequest> for ProjectUpdate {
    fn from(request: UpdateProjectRequest) -> Self {
        Self {
            name: request.name,
            synopsis: request.synopsis,
            description: request.description,
            configuration: request.configuration,
            topic: request.topic,
        }
    }
}

#[api_model(request)]
pub struct PathRequest {
    pub path: String,
    #[serde(default)]
    pub allow_module: bool,
    #[serde(default)]
    pub allow_package_using_basename: bool,
    #[serde(default)]
    pub allow_package_using_init: bool,
}

impl From<PathRequest> for NewPath {
    fn from(request: PathRequest) -> Self {
        Self {
            path: request.path,
            allow_module: request.allow_module,
            allow_package_using_basename: request.allow_package_using_basename,
            allow_package_using_init: request.allow_package_using_init,
        }
    }
}

#[api_model(request)]
pub struct RegisterUserRequest {
    pub forum_id: u64,
    pub username: String,
}

/// Query of `POST /archives/inspect/{kind}`.
#[api_model(request, rename_all = "snake_case")]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct InspectParams {
    /// Parent plugin slug, required for sub-plugins.
    pub plugin: Option<String>,
}

/// Row of a project listing.
#[api_model(response)]
pub struct ProjectSummary {
    pub kind: String,
    pub plugin: Option<String>,
    pub slug: String,
    pub name: String,
    pub basename: String,
    pub synopsis: String,
    pub current_version: Option<String>,
    pub total_downloads: u64,
    pub logo: Option<String>,
    pub tags: Vec<String>,
    pub supported_games: Vec<String>,
    pub updated: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            kind: project.kind().noun().to_owned(),
            plugin: project.key.plugin.clone(),
            slug: project.key.slug.clone(),
            name: project.name.clone(),
            basename: project.basename.clone(),
            synopsis: project.synopsis.clone(),
            current_version: project.current_version().map(str::to_owned),
            total_downloads: project.total_downloads(),
            logo: project.logo.clone(),
            tags: project.tags.clone(),
            supported_games: project.supported_games.clone(),
            updated: project.updated(),
        }
    }
}

#[api_model(response)]
pub struct ProjectPage {
    pub items: Vec<ProjectSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl From<Page<Project>> for ProjectPage {
    fn from(page: Page<Project>) -> Self {
        let page = page.map(|project| ProjectSummary::from(&project));
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

#[api_model(response)]
pub struct ReleaseView {
    pub version: String,
    pub notes: String,
    pub file_name: String,
    pub downloads: u64,
    pub created: DateTime<Utc>,
}

impl From<&Release> for ReleaseView {
    fn from(release: &Release) -> Self {
        Self {
            version: release.version.clone(),
            notes: release.notes.clone(),
            file_name: release.file_name().to_owned(),
            downloads: release.downloads,
            created: release.created,
        }
    }
}

#[api_model(response)]
pub struct ImageView {
    pub id: String,
    pub file: String,
    pub created: DateTime<Utc>,
}

impl From<&ProjectImage> for ImageView {
    fn from(image: &ProjectImage) -> Self {
        Self { id: image.id.clone(), file: image.file.clone(), created: image.created }
    }
}

#[api_model(response)]
pub struct PathView {
    pub id: String,
    pub path: String,
    pub allow_module: bool,
    pub allow_package_using_basename: bool,
    pub allow_package_using_init: bool,
    pub created: DateTime<Utc>,
}

impl From<&SubPluginPath> for PathView {
    fn from(path: &SubPluginPath) -> Self {
        Self {
            id: path.id.clone(),
            path: path.path.clone(),
            allow_module: path.layout.contains(PathLayout::MODULE),
            allow_package_using_basename: path.layout.contains(PathLayout::PACKAGE_USING_BASENAME),
            allow_package_using_init: path.layout.contains(PathLayout::PACKAGE_USING_INIT),
            created: path.created,
        }
    }
}

#[api_model(response)]
pub struct RequirementLinkView {
    pub key: String,
    pub version: Option<String>,
    pub optional: bool,
}

impl From<&RequirementLink> for RequirementLinkView {
    fn from(link: &RequirementLink) -> Self {
        Self { key: link.key.clone(), version: link.version.clone(), optional: link.optional }
    }
}

#[api_model(response)]
pub struct RequirementsView {
    pub packages: Vec<RequirementLinkView>,
    pub pypi: Vec<RequirementLinkView>,
    pub download: Vec<RequirementLinkView>,
    pub vcs: Vec<RequirementLinkView>,
}

/// Everything shown on a project page.
#[api_model(response)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub description: String,
    pub configuration: String,
    pub forum_url: Option<String>,
    pub owner: u64,
    pub contributors: Vec<u64>,
    pub requirements: RequirementsView,
    pub releases: Vec<ReleaseView>,
    pub images: Vec<ImageView>,
    pub paths: Vec<PathView>,
    pub created: DateTime<Utc>,
}

impl ProjectDetail {
    #[must_use]
    pub fn new(project: &Project, forum: &str) -> Self {
        let links = |links: &[RequirementLink]| -> Vec<RequirementLinkView> {
            links.iter().map(Into::into).collect()
        };
        Self {
            summary: project.into(),
            description: project.description.clone(),
            configuration: project.configuration.clone(),
            forum_url: project.forum_url(forum),
            owner: project.owner,
            contributors: project.contributors.clone(),
            requirements: RequirementsView {
                packages: links(&project.requirements.packages),
                pypi: links(&project.requirements.pypi),
                download: links(&project.requirements.download),
                vcs: links(&project.requirements.vcs),
            },
            releases: project.releases.iter().map(Into::into).collect(),
            images: project.images.iter().map(Into::into).collect(),
            paths: project.paths.iter().map(Into::into).collect(),
            created: project.created,
        }
    }
}

#[api_model(response)]
pub struct UserView {
    pub forum_id: u64,
    pub username: String,
    pub created: DateTime<Utc>,
}

impl From<ForumUser> for UserView {
    fn from(user: ForumUser) -> Self {
        Self { forum_id: user.forum_id, username: user.username, created: user.created }
    }
}

#[api_model(response)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserView,
    pub owned: Vec<ProjectSummary>,
    pub contributions: Vec<ProjectSummary>,
}

impl UserDetail {
    #[must_use]
    pub fn new(user: ForumUser, projects: &UserProjects) -> Self {
        Self {
            user: user.into(),
            owned: projects.owned.iter().map(Into::into).collect(),
            contributions: projects.contributions.iter().map(Into::into).collect(),
        }
    }
}

#[api_model(response)]
pub struct TagView {
    pub name: String,
    pub black_listed: bool,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self { name: tag.name, black_listed: tag.black_listed }
    }
}

#[api_model(response)]
pub struct GameView {
    pub name: String,
    pub basename: String,
    pub slug: String,
    pub icon: Option<String>,
}

impl From<Game> for GameView {
    fn from(game: Game) -> Self {
        Self { name: game.name, basename: game.basename, slug: game.slug, icon: game.icon }
    }
}

/// A project that declares a requirement.
#[api_model(response)]
pub struct DependentView {
    pub kind: String,
    pub plugin: Option<String>,
    pub slug: String,
}

impl From<ProjectKey> for DependentView {
    fn from(key: ProjectKey) -> Self {
        Self { kind: key.kind.noun().to_owned(), plugin: key.plugin, slug: key.slug }
    }
}

#[api_model(response)]
pub struct RequirementView {
    pub group: String,
    pub key: String,
    pub name: String,
    pub url: Option<String>,
    pub dependents: Vec<DependentView>,
}

impl From<RequirementEntry> for RequirementView {
    fn from(entry: RequirementEntry) -> Self {
        Self {
            group: entry.group.as_str().to_owned(),
            key: entry.key,
            name: entry.name,
            url: entry.url,
            dependents: entry.dependents.into_iter().map(Into::into).collect(),
        }
    }
}
