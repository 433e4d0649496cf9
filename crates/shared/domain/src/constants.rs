//! Install locations, naming rules and limits of uploaded projects.

/// Where plugins live inside an archive.
pub const PLUGIN_PATH: &str = "addons/source-python/plugins/";
/// Where custom packages live inside an archive.
pub const PACKAGE_PATH: &str = "addons/source-python/packages/custom/";

/// Python source extension used to discover candidates.
pub const SOURCE_EXTENSION: &str = ".py";
pub const REQUIREMENTS_FILE: &str = "requirements.json";

pub const FORBIDDEN_NAMES: &[&str] = &["create"];
pub const FORBIDDEN_PREFIX: &str = "sp_";

/// Data files a project may ship next to its code.
pub const READABLE_DATA_FILE_TYPES: &[&str] = &["json", "ini", "res", "txt", "vdf", "xml"];

/// Directories any project may ship files into, with the extensions accepted there.
pub const ALLOWED_FILE_TYPES: &[(&str, &[&str])] = &[
    ("cfg/source-python/", &["cfg", "ini", "md"]),
    ("log/source-python/", &["md", "txt"]),
    ("models/", &["ani", "mdl", "phy", "vmf", "vmx", "vtf", "vtx", "vvd"]),
    ("particles/", &["pcf", "txt"]),
    ("resource/source-python/events/", &["md", "res", "txt"]),
    ("resource/source-python/translations/", &["md", "ini"]),
    ("sound/source-python/", &["mp3", "ogg", "wav"]),
];

pub const NAME_MAX_LENGTH: usize = 64;
pub const BASENAME_MAX_LENGTH: usize = 32;
pub const SLUG_MAX_LENGTH: usize = 32;
pub const SYNOPSIS_MAX_LENGTH: usize = 128;
pub const DESCRIPTION_MAX_LENGTH: usize = 1024;
pub const CONFIGURATION_MAX_LENGTH: usize = 1024;
pub const RELEASE_NOTES_MAX_LENGTH: usize = 512;
pub const RELEASE_VERSION_MAX_LENGTH: usize = 8;
pub const USERNAME_MAX_LENGTH: usize = 30;
pub const TAG_MAX_LENGTH: usize = 16;
pub const SUB_PLUGIN_PATH_MAX_LENGTH: usize = 256;

pub const MAX_TAGS_PER_PROJECT: usize = 5;
pub const MAX_IMAGES_PER_PROJECT: usize = 10;
pub const LOGO_MAX_SIDE: u32 = 200;
pub const IMAGE_MAX_SIDE: u32 = 400;

/// Form fields that validation errors are reported against.
pub mod fields {
    pub const ZIP_FILE: &str = "zip_file";
    pub const VERSION: &str = "version";
    pub const NAME: &str = "name";
    pub const NOTES: &str = "notes";
    pub const LOGO: &str = "logo";
    pub const IMAGE: &str = "image";
    pub const PATH: &str = "path";
    pub const USERNAME: &str = "username";
    pub const TAG: &str = "tag";
    pub const GAME: &str = "game";
    pub const PLUGIN: &str = "plugin";
}

/// `OpenAPI` tags.
pub mod api_tags {
    pub const SYSTEM: &str = "System";
    pub const ARCHIVES: &str = "Archives";
    pub const PROJECTS: &str = "Projects";
    pub const PEOPLE: &str = "People";
    pub const METADATA: &str = "Metadata";
}
