//! Field validators and the shared validation failure type.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Stable, machine-readable reason of a validation failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ViolationCode {
    NotFound,
    Multiple,
    Invalid,
}

/// A rejected input value, reported against a single form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Violation {
    pub code: ViolationCode,
    pub field: &'static str,
    pub message: Cow<'static, str>,
}

impl Violation {
    pub fn new(code: ViolationCode, field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self { code, field, message: message.into() }
    }

    pub fn invalid(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ViolationCode::Invalid, field, message)
    }

    pub fn not_found(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ViolationCode::NotFound, field, message)
    }

    pub fn multiple(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ViolationCode::Multiple, field, message)
    }

    #[must_use]
    pub fn code_str(&self) -> &'static str {
        self.code.into()
    }
}

static BASENAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-z][0-9a-z_]*[0-9a-z]$"));
static VERSION: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9][0-9a-z.]*[0-9a-z]$"));
static SUB_PLUGIN_PATH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[a-z][0-9a-z/_]*[0-9a-z]$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

/// Lower-case identifier of at least two characters: `gungame`, `easy_player`.
#[must_use]
pub fn is_valid_basename(value: &str) -> bool {
    BASENAME.is_match(value)
}

/// Starts with a digit and ends alphanumeric: `1.0`, `2.1b`.
#[must_use]
pub fn is_valid_version(value: &str) -> bool {
    VERSION.is_match(value)
}

/// Relative sub-plugin directory such as `modules/weapons`. Normalize first.
#[must_use]
pub fn is_valid_sub_plugin_path(value: &str) -> bool {
    SUB_PLUGIN_PATH.is_match(value) && !value.contains("//")
}

/// Turns backslashes into slashes and trims surrounding slashes and whitespace.
#[must_use]
pub fn normalize_sub_plugin_path(value: &str) -> String {
    value.trim().replace('\\', "/").trim_matches('/').to_owned()
}

/// Lower-case ASCII slug; `_` and whitespace become `-`, other symbols are dropped.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if (ch == '-' || ch == '_' || ch.is_whitespace()) && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_owned()
}

/// # Errors
///
/// [`ViolationCode::Invalid`] when `value` has more than `max` characters.
pub fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), Violation> {
    if value.chars().count() > max {
        return Err(Violation::invalid(field, format!("{field} must be at most {max} characters.")));
    }
    Ok(())
}

/// # Errors
///
/// [`ViolationCode::Invalid`] when `value` is blank.
pub fn check_required(field: &'static str, value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        return Err(Violation::invalid(field, format!("{field} is required.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_requires_full_match() {
        assert!(is_valid_basename("gungame"));
        assert!(is_valid_basename("easy_player2"));
        assert!(!is_valid_basename("g"));
        assert!(!is_valid_basename("2fast"));
        assert!(!is_valid_basename("trailing_"));
        assert!(!is_valid_basename("gungame/extra"));
        assert!(!is_valid_basename("GunGame"));
    }

    #[test]
    fn version_format() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("10"));
        assert!(is_valid_version("2.1b"));
        assert!(!is_valid_version("v1.0"));
        assert!(!is_valid_version("1.0."));
        assert!(!is_valid_version("1"));
    }

    #[test]
    fn sub_plugin_paths_are_normalized_then_checked() {
        let path = normalize_sub_plugin_path("\\modules\\weapons\\");
        assert_eq!(path, "modules/weapons");
        assert!(is_valid_sub_plugin_path(&path));
        assert!(!is_valid_sub_plugin_path("modules//weapons"));
        assert!(!is_valid_sub_plugin_path("/modules"));
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("easy_player"), "easy-player");
        assert_eq!(slugify("  Counter Strike: Source "), "counter-strike-source");
        assert_eq!(slugify("a__b--c"), "a-b-c");
    }

    #[test]
    fn length_message_names_the_field() {
        let err = check_length("version", "1.0.0.0.0", 8).unwrap_err();
        assert_eq!(err.code, ViolationCode::Invalid);
        assert_eq!(err.to_string(), "version must be at most 8 characters.");
        assert!(check_length("version", "1.0", 8).is_ok());
    }

    #[test]
    fn codes_render_kebab_case() {
        assert_eq!(ViolationCode::NotFound.to_string(), "not-found");
        assert_eq!(Violation::multiple("zip_file", "x").code_str(), "multiple");
    }
}
