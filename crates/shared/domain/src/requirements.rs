//! Requirements a release declares in its `requirements.json`.

use serde::{Deserialize, Serialize};

/// Top-level groups of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementGroup {
    Custom,
    Download,
    Pypi,
    Vcs,
}

impl RequirementGroup {
    pub const ALL: [Self; 4] = [Self::Custom, Self::Download, Self::Pypi, Self::Vcs];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Download => "download",
            Self::Pypi => "pypi",
            Self::Vcs => "vcs",
        }
    }

    /// The key every entry of the group must carry.
    #[must_use]
    pub const fn required_field(self) -> &'static str {
        match self {
            Self::Custom => "basename",
            Self::Download | Self::Vcs => "url",
            Self::Pypi => "name",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == name)
    }
}

/// Another package hosted by this site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRequirement {
    pub basename: String,
    pub version: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyPiRequirement {
    pub name: String,
    pub version: Option<String>,
    pub optional: bool,
}

/// A file to fetch by hand (maps, models, binaries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequirement {
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsRequirement {
    pub url: String,
    pub version: Option<String>,
    pub optional: bool,
}

/// Parsed manifest; groups missing from the file are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsManifest {
    pub custom: Vec<CustomRequirement>,
    pub download: Vec<DownloadRequirement>,
    pub pypi: Vec<PyPiRequirement>,
    pub vcs: Vec<VcsRequirement>,
}

impl RequirementsManifest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
            && self.download.is_empty()
            && self.pypi.is_empty()
            && self.vcs.is_empty()
    }
}
