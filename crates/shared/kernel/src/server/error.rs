use crate::validation::Violation;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pmgr_derive::api_model;
use pmgr_storage::StorageError;
use std::borrow::Cow;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by handlers. Feature errors convert into this type at the router edge.
#[pmgr_derive::pmgr_error]
pub enum ApiError {
    #[error("Validation failed{}: {source}", format_context(.context))]
    Validation {
        #[source]
        source: Violation,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict {
        field: Option<&'static str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unauthorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Forbidden{}: {message}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Payload too large{}: {message}", format_context(.context))]
    PayloadTooLarge { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal server error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub fn conflict(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { field: Some(field), message: message.into(), context: None }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The problem body sent to clients. Internal details never leave the server.
    #[must_use]
    pub fn problem(&self) -> ApiProblem {
        let status = self.status();
        let (code, field, message) = match self {
            Self::Validation { source, .. } => {
                (Some(source.code_str()), Some(source.field), source.message.to_string())
            },
            Self::Conflict { field, message, .. } => (None, *field, message.to_string()),
            Self::NotFound { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Forbidden { message, .. }
            | Self::PayloadTooLarge { message, .. } => (None, None, message.to_string()),
            Self::Internal { .. } => (None, None, "Internal server error".to_owned()),
        };

        ApiProblem {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            code,
            field,
            message,
        }
    }
}

/// JSON error body.
#[api_model(response)]
pub struct ApiProblem {
    pub status: u16,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            warn!(error = %self, kind = self.kind(), "Request rejected");
        }
        (status, Json(self.problem())).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { message, .. } => {
                Self::NotFound { message, context: Some("media".into()) }
            },
            StorageError::PathEscape { message, .. } => Self::Validation {
                source: Violation::invalid("path", format!("Invalid media path \"{message}\".")),
                context: None,
            },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationCode;

    #[test]
    fn validation_problem_carries_code_and_field() {
        let err = ApiError::from(Violation::multiple(
            "zip_file",
            "Multiple base directories found for plugin.",
        ));
        let problem = err.problem();

        assert_eq!(problem.status, 400);
        assert_eq!(problem.error, "Bad Request");
        assert_eq!(problem.code, Some("multiple"));
        assert_eq!(problem.field, Some("zip_file"));
        assert_eq!(problem.message, "Multiple base directories found for plugin.");
    }

    #[test]
    fn internal_details_are_hidden() {
        let problem = ApiError::from("catalog lock poisoned").problem();
        assert_eq!(problem.status, 500);
        assert_eq!(problem.message, "Internal server error");
    }

    #[test]
    fn storage_errors_map_to_http_semantics() {
        let missing = StorageError::NotFound { message: "logos/x.png".into(), context: None };
        assert_eq!(ApiError::from(missing).status(), StatusCode::NOT_FOUND);

        let escape = StorageError::PathEscape { message: "../x".into(), context: None };
        let ApiError::Validation { source, .. } = ApiError::from(escape) else {
            panic!("expected validation error");
        };
        assert_eq!(source.code, ViolationCode::Invalid);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = ApiError::conflict("basename", "Plugin \"gungame\" already registered.");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.problem().field, Some("basename"));
    }
}
