#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the project manager crates: error enums, API models and
//! handlers, feature slices, and the runtime entry point.
//!
//! The examples in this crate are `ignore`d because proc-macro crates cannot use their own
//! macros in doctests; the consuming crates exercise them in their tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the tuned Tokio runtime.
///
/// Turns an `async fn main() -> Result<..>` into a synchronous `main` that builds a runtime
/// from a `RuntimeConfig` preset and blocks on the body.
///
/// # Arguments
///
/// * `high_performance` / `memory_efficient` / `default` - preset to start from.
/// * `threads = N` - overrides the worker thread count of the preset.
///
/// # Examples
///
/// ```rust,ignore
/// #[pmgr_runtime::main(high_performance, threads = 8)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for request/response models of the REST API.
///
/// * Adds `Debug`, `Serialize` and `Deserialize` when missing (`request` keeps only
///   `Deserialize`, `response` keeps only `Serialize`).
/// * Adds `utoipa::ToSchema` when the consuming crate enables its `server` feature.
/// * Applies `rename_all = "camelCase"` unless overridden with `rename_all = "..."`.
/// * Structs that accept input deny unknown fields unless `deny_unknown_fields = false`.
///
/// # Example
///
/// ```rust,ignore
/// #[api_model(request)]
/// pub struct CreateTag {
///     pub name: String,
/// }
///
/// #[api_model(rename_all = "lowercase")]
/// pub enum Ordering {
///     Asc,
///     Desc,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro that documents an Axum handler with `utoipa::path`.
///
/// The arguments are forwarded verbatim (`get`, `path = "..."`, `params(...)`,
/// `responses(...)`, `tag = "..."`) and only take effect with the `server` feature.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when not already derived.
/// * `kind()` returning the variant name in `snake_case`.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant that wraps a source.
/// * `From<SourceError>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for use in `#[error(...)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * `context` must be `Option<Cow<'static, str>>`; variants with a source must have one.
/// * `Internal` must declare `message` and `context`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[pmgr_derive::pmgr_error]
/// pub enum StorageError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<Vec<u8>, StorageError> {
///     std::fs::read(path).context("Reading archive")
/// }
/// ```
#[proc_macro_attribute]
pub fn pmgr_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as a cheap `Arc`
/// handle that derefs to it and implements the kernel's `FeatureSlice`.
///
/// # Example
/// ```rust,ignore
/// #[pmgr_derive::pmgr_slice]
/// pub struct Catalog {
///     store: CatalogStore,
/// }
///
/// let slice = Catalog::new(CatalogInner { store });
/// ```
#[proc_macro_attribute]
pub fn pmgr_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
