use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of uploadable projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    Package,
    Plugin,
    SubPlugin,
}

impl ProjectKind {
    pub const ALL: [Self; 3] = [Self::Package, Self::Plugin, Self::SubPlugin];

    /// Type name used in registration messages (`SubPlugin "dm" already registered.`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Plugin => "Plugin",
            Self::SubPlugin => "SubPlugin",
        }
    }

    /// Sentence-initial name (`Sub-plugin basename cannot be ...`).
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Plugin => "Plugin",
            Self::SubPlugin => "Sub-plugin",
        }
    }

    /// Lower-case name used inside messages and as the route parameter.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Plugin => "plugin",
            Self::SubPlugin => "sub-plugin",
        }
    }

    /// Directory and route segment (`releases/plugins/...`).
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Package => "packages",
            Self::Plugin => "plugins",
            Self::SubPlugin => "sub-plugins",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Returned when a string names no [`ProjectKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProjectKind(pub String);

impl fmt::Display for UnknownProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown project kind \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownProjectKind {}

impl FromStr for ProjectKind {
    type Err = UnknownProjectKind;

    /// Accepts the singular and the plural form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.noun() == s || kind.plural() == s)
            .ok_or_else(|| UnknownProjectKind(s.to_owned()))
    }
}

/// Addresses one project: sub-plugins are scoped to their parent plugin's slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectKey {
    pub kind: ProjectKind,
    pub plugin: Option<String>,
    pub slug: String,
}

impl ProjectKey {
    #[must_use]
    pub fn package(slug: impl Into<String>) -> Self {
        Self { kind: ProjectKind::Package, plugin: None, slug: slug.into() }
    }

    #[must_use]
    pub fn plugin(slug: impl Into<String>) -> Self {
        Self { kind: ProjectKind::Plugin, plugin: None, slug: slug.into() }
    }

    #[must_use]
    pub fn sub_plugin(plugin: impl Into<String>, slug: impl Into<String>) -> Self {
        Self { kind: ProjectKind::SubPlugin, plugin: Some(plugin.into()), slug: slug.into() }
    }

    /// Media sub-directory for this project (`plugins/gungame`, `sub-plugins/gungame/dm`).
    #[must_use]
    pub fn media_dir(&self) -> String {
        match &self.plugin {
            Some(plugin) => format!("{}/{plugin}/{}", self.kind.plural(), self.slug),
            None => format!("{}/{}", self.kind.plural(), self.slug),
        }
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.plugin {
            Some(plugin) => write!(f, "{} {plugin}/{}", self.kind, self.slug),
            None => write!(f, "{} {}", self.kind, self.slug),
        }
    }
}
