//! Axum building blocks shared by every feature router.

pub mod error;
pub mod extract;
mod health;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiErrorExt, ApiResult};
pub use extract::ActingUser;
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
