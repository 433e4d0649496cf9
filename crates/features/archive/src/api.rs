//! HTTP surface of the archive inspector: error mapping and the dry-run response body.

use crate::error::ArchiveError;
use crate::inspector::InspectedArchive;
use pmgr_derive::api_model;
use pmgr_kernel::domain::requirements::RequirementsManifest;
use pmgr_kernel::server::ApiError;

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Rejected { source, context } => Self::Validation { source, context },
            ArchiveError::TooLarge { message, context } => Self::PayloadTooLarge { message, context },
            ArchiveError::Io { source, context } => {
                Self::Internal { message: source.to_string().into(), context }
            },
            ArchiveError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}

/// Result of a dry-run inspection.
#[api_model(response)]
pub struct InspectionResponse {
    pub kind: String,
    pub basename: String,
    pub is_module: bool,
    pub sub_path: Option<String>,
    pub files: Vec<String>,
    #[schema(value_type = Object)]
    pub requirements: RequirementsManifest,
}

impl From<InspectedArchive> for InspectionResponse {
    fn from(archive: InspectedArchive) -> Self {
        Self {
            kind: archive.kind.noun().to_owned(),
            basename: archive.basename,
            is_module: archive.is_module,
            sub_path: archive.sub_path,
            files: archive.files,
            requirements: archive.requirements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pmgr_kernel::validation::Violation;

    #[test]
    fn rejections_are_bad_requests() {
        let err: ApiError = ArchiveError::from(Violation::invalid("zip_file", "nope")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.problem().field, Some("zip_file"));
    }

    #[test]
    fn oversized_uploads_are_413() {
        let err: ApiError =
            ArchiveError::TooLarge { message: "too big".into(), context: None }.into();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
