use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `PMGR__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "PMGR";
const DEFAULT_FILE: &str = "pmgr";

#[pmgr_derive::pmgr_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a config file layered under `PMGR__*` environment variables.
///
/// The format follows the file extension (TOML, JSON, YAML). Without a path, `pmgr.*` in
/// the working directory is used when present; otherwise only the environment and the
/// defaults of `T` apply.
///
/// # Errors
///
/// Fails when an explicit file is missing, unparsable, or does not match `T`.
///
/// ```rust
/// use pmgr_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// let cfg: Settings = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// `env` replaces the process environment when given.
fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<config::Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_FILE), false),
        |path| (path.as_ref().to_path_buf(), true),
    );
    info!(path = %file.display(), required, "Loading configuration");

    Config::builder()
        .add_source(File::from(file.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context(format!("Reading {}", file.display()))?
        .try_deserialize::<T>()
        .context("Deserializing configuration")
}
