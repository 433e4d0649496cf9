//! Facade crate for the project manager features and shared modules.
//! Re-exports domain and kernel primitives and aggregates feature initialization.
//! Keeps no business logic of its own.
//!
//! ## Usage
//! - Add `pmgr` with the `server` feature.
//! - Call [`init`] to register feature slices and mount [`server::api_router`] under the
//!   API prefix.

pub use pmgr_domain as domain;
pub use pmgr_kernel as kernel;
pub use pmgr_storage as storage;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use pmgr_kernel::server::router::system_router;
    }

    use pmgr_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    /// Routes of every enabled feature, relative to the API prefix.
    #[must_use]
    pub fn api_router() -> OpenApiRouter<ApiState> {
        OpenApiRouter::new().merge(crate::features::catalog::api::router())
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use pmgr_archive as archive;
    pub use pmgr_catalog as catalog;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "archive",
        "catalog",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &domain::config::ApiConfig,
    media: &storage::MediaStore,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let slices = vec![features::catalog::init(config, media.clone())?];
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::features;

    #[test]
    fn reports_enabled_features() {
        assert!(features::is_enabled("catalog"));
        assert!(!features::is_enabled("licensing"));
    }
}
