use super::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the forum id of the user performing the request.
pub const FORUM_USER_HEADER: &str = "x-forum-user";

/// Forum id of the caller. Rejects with 401 when the header is missing or not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub u64);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(FORUM_USER_HEADER).ok_or_else(|| ApiError::Unauthorized {
            message: format!("Missing {FORUM_USER_HEADER} header.").into(),
            context: None,
        })?;

        header
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized {
                message: format!("Invalid {FORUM_USER_HEADER} header.").into(),
                context: None,
            })
    }
}
