use pmgr_kernel::domain::constants::fields;
use pmgr_kernel::domain::requirements::{
    CustomRequirement, DownloadRequirement, PyPiRequirement, RequirementGroup,
    RequirementsManifest, VcsRequirement,
};
use pmgr_kernel::validation::Violation;
use serde_json::{Map, Value};

type Entry = Map<String, Value>;

/// Parses a `requirements.json` manifest.
///
/// The document is an object of groups (`custom`, `download`, `pypi`, `vcs`), each a list
/// of objects. Every entry may carry `optional`; the group's key field is mandatory.
///
/// # Errors
///
/// `invalid` on `zip_file` describing the first problem found.
pub fn parse_manifest(bytes: &[u8]) -> Result<RequirementsManifest, Violation> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|_| invalid("Requirements json file cannot be decoded."))?;
    let Value::Object(groups) = document else {
        return Err(invalid("Invalid requirements json file."));
    };

    let mut manifest = RequirementsManifest::default();
    for (name, values) in &groups {
        let group = RequirementGroup::parse(name).ok_or_else(|| {
            invalid(format!("Invalid group name \"{name}\" found in requirements json file."))
        })?;
        let Value::Array(values) = values else {
            return Err(invalid(format!(
                "Invalid group values for \"{name}\" found in requirements json file."
            )));
        };

        for value in values {
            let Value::Object(entry) = value else {
                return Err(invalid(format!(
                    "Invalid object found in \"{name}\" listing in requirements json file."
                )));
            };
            let key = required(entry, group)?;
            let optional = entry.get("optional").and_then(Value::as_bool).unwrap_or(false);

            match group {
                RequirementGroup::Custom => manifest.custom.push(CustomRequirement {
                    basename: key,
                    version: text(entry, "version"),
                    optional,
                }),
                RequirementGroup::Download => manifest.download.push(DownloadRequirement {
                    url: key,
                    name: text(entry, "name"),
                    description: text(entry, "description"),
                    optional,
                }),
                RequirementGroup::Pypi => manifest.pypi.push(PyPiRequirement {
                    name: key,
                    version: text(entry, "version"),
                    optional,
                }),
                RequirementGroup::Vcs => manifest.vcs.push(VcsRequirement {
                    url: key,
                    version: text(entry, "version"),
                    optional,
                }),
            }
        }
    }

    Ok(manifest)
}

fn required(entry: &Entry, group: RequirementGroup) -> Result<String, Violation> {
    let field = group.required_field();
    text(entry, field).filter(|value| !value.is_empty()).ok_or_else(|| {
        invalid(format!(
            "No {field} found for object in \"{}\" listing in requirements json file.",
            group.as_str()
        ))
    })
}

fn text(entry: &Entry, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(|value| value.trim().to_owned())
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> Violation {
    Violation::invalid(fields::ZIP_FILE, message)
}
