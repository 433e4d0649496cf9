//! Records kept by the catalog.

use chrono::{DateTime, Utc};
use pmgr_kernel::domain::layout::PathLayout;
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};

/// A forum account known to the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUser {
    pub forum_id: u64,
    pub username: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub black_listed: bool,
    pub creator: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub name: String,
    pub basename: String,
    pub slug: String,
    pub icon: Option<String>,
}

/// A directory inside a plugin that accepts sub-plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPluginPath {
    pub id: String,
    pub path: String,
    pub layout: PathLayout,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub notes: String,
    /// Media path of the stored zip.
    pub file: String,
    pub downloads: u64,
    pub created: DateTime<Utc>,
}

impl Release {
    /// `gungame-v1.0.zip`
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file.rsplit('/').next().unwrap_or(&self.file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectImage {
    pub id: String,
    pub file: String,
    pub created: DateTime<Utc>,
}

/// A requirement record of the site, shared by every project that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyPiProject {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VcsType {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsType {
    /// Detects the system from `git+https://...`, `hg+...`, `svn://...` style urls.
    #[must_use]
    pub fn detect(url: &str) -> Option<Self> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme)?;
        let system = scheme.split_once('+').map_or(scheme, |(system, _)| system);
        system.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionControlRequirement {
    pub url: String,
    pub vcs_type: VcsType,
}

/// A project's link to a requirement record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementLink {
    /// Package slug, `PyPI` slug, or url for downloads and repositories.
    pub key: String,
    pub version: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequirements {
    pub packages: Vec<RequirementLink>,
    pub pypi: Vec<RequirementLink>,
    pub download: Vec<RequirementLink>,
    pub vcs: Vec<RequirementLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub key: ProjectKey,
    pub name: String,
    pub basename: String,
    pub synopsis: String,
    pub description: String,
    pub configuration: String,
    pub logo: Option<String>,
    pub owner: u64,
    pub contributors: Vec<u64>,
    pub tags: Vec<String>,
    /// Game slugs.
    pub supported_games: Vec<String>,
    pub topic: Option<u32>,
    pub requirements: ProjectRequirements,
    /// Oldest first.
    pub releases: Vec<Release>,
    pub images: Vec<ProjectImage>,
    /// Sub-plugin directories; plugins only.
    pub paths: Vec<SubPluginPath>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Project {
    #[must_use]
    pub const fn kind(&self) -> ProjectKind {
        self.key.kind
    }

    #[must_use]
    pub fn current_release(&self) -> Option<&Release> {
        self.releases.iter().max_by_key(|release| release.created)
    }

    #[must_use]
    pub fn current_version(&self) -> Option<&str> {
        self.current_release().map(|release| release.version.as_str())
    }

    /// When the last release was published, or when the project was created.
    #[must_use]
    pub fn updated(&self) -> DateTime<Utc> {
        self.current_release().map_or(self.created, |release| release.created)
    }

    #[must_use]
    pub fn total_downloads(&self) -> u64 {
        self.releases.iter().map(|release| release.downloads).sum()
    }

    #[must_use]
    pub fn forum_url(&self, forum: &str) -> Option<String> {
        self.topic.map(|topic| format!("{forum}viewtopic.php?t={topic}"))
    }

    #[must_use]
    pub fn is_owner(&self, user: u64) -> bool {
        self.owner == user
    }

    /// Owners and contributors may edit.
    #[must_use]
    pub fn can_edit(&self, user: u64) -> bool {
        self.is_owner(user) || self.contributors.contains(&user)
    }

    #[must_use]
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|release| release.version == version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcs_type_from_scheme() {
        assert_eq!(VcsType::detect("git+https://github.com/a/b.git"), Some(VcsType::Git));
        assert_eq!(VcsType::detect("hg+http://example.org/repo"), Some(VcsType::Hg));
        assert_eq!(VcsType::detect("svn://example.org/trunk"), Some(VcsType::Svn));
        assert_eq!(VcsType::detect("https://example.org/file.zip"), None);
        assert_eq!(VcsType::detect("no scheme"), None);
        assert_eq!(VcsType::Bzr.to_string(), "bzr");
    }

    #[test]
    fn release_file_name() {
        let release = Release {
            version: "1.0".into(),
            notes: String::new(),
            file: "releases/plugins/gungame/gungame-v1.0.zip".into(),
            downloads: 0,
            created: Utc::now(),
        };
        assert_eq!(release.file_name(), "gungame-v1.0.zip");
    }
}
