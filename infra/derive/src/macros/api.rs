use super::derived_trait_names;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, ItemFn, Lit, LitStr, Meta, Token};

/// Which serde directions the model participates in.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Request,
    Response,
}

struct ApiModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
    direction: Direction,
}

#[derive(Default)]
struct SerdeAttrs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

/// Expands the `#[api_model]` attribute macro for structs and enums.
pub fn expand_api_model(args: TokenStream, input: DeriveInput) -> TokenStream {
    match api_model(args, &input) {
        Ok(attrs) => quote! {
            #attrs
            #input
        },
        Err(err) => err.to_compile_error(),
    }
}

fn api_model(args: TokenStream, input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    if matches!(input.data, Data::Union(_)) {
        return Err(syn::Error::new_spanned(&input.ident, "api_model does not support unions"));
    }

    let args = parse_args(args)?;
    let serde = serde_attrs(&input.attrs)?;
    let derives = derived_trait_names(&input.attrs);

    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if args.direction != Direction::Request && !derives.contains("Serialize") {
        missing.push(quote! { ::serde::Serialize });
    }
    if args.direction != Direction::Response && !derives.contains("Deserialize") {
        missing.push(quote! { ::serde::Deserialize });
    }
    let derive = (!missing.is_empty()).then(|| quote! { #[derive(#(#missing),*)] });

    let schema = (!derives.contains("ToSchema"))
        .then(|| quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] });

    let rename = rename_attr(args.rename_all.clone(), serde.rename_all.as_ref())?;
    let deny = deny_attr(&args, &serde, input)?;

    Ok(quote! {
        #derive
        #schema
        #rename
        #deny
    })
}

/// Expands the `#[api_handler]` attribute macro.
///
/// Forwards the arguments to `utoipa::path` when the `server` feature is enabled.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = &input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_args(args: TokenStream) -> Result<ApiModelArgs, syn::Error> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;

    let mut parsed =
        ApiModelArgs { rename_all: None, deny_unknown_fields: None, direction: Direction::Both };
    let mut direction_set = false;

    for meta in metas {
        match meta {
            Meta::Path(path) if path.is_ident("request") || path.is_ident("response") => {
                if direction_set {
                    return Err(syn::Error::new_spanned(
                        path,
                        "request and response are mutually exclusive",
                    ));
                }
                direction_set = true;
                parsed.direction =
                    if path.is_ident("request") { Direction::Request } else { Direction::Response };
            },
            Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                let Some(Lit::Str(value)) = literal(&nv.value) else {
                    return Err(syn::Error::new_spanned(&nv.value, "rename_all must be a string"));
                };
                if parsed.rename_all.replace(value.clone()).is_some() {
                    return Err(syn::Error::new_spanned(&nv.path, "Duplicate argument"));
                }
            },
            Meta::NameValue(nv) if nv.path.is_ident("deny_unknown_fields") => {
                let Some(Lit::Bool(value)) = literal(&nv.value) else {
                    return Err(syn::Error::new_spanned(
                        &nv.value,
                        "deny_unknown_fields must be a boolean",
                    ));
                };
                if parsed.deny_unknown_fields.replace(value.value).is_some() {
                    return Err(syn::Error::new_spanned(&nv.path, "Duplicate argument"));
                }
            },
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "Unsupported argument; expected request, response, rename_all or deny_unknown_fields",
                ));
            },
        }
    }

    Ok(parsed)
}

fn literal(expr: &syn::Expr) -> Option<&Lit> {
    match expr {
        syn::Expr::Lit(expr_lit) => Some(&expr_lit.lit),
        _ => None,
    }
}

fn serde_attrs(attrs: &[Attribute]) -> Result<SerdeAttrs, syn::Error> {
    let mut found = SerdeAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                found.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                found.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(found)
}

fn rename_attr(
    requested: Option<LitStr>,
    existing: Option<&LitStr>,
) -> Result<Option<TokenStream>, syn::Error> {
    let value =
        requested.unwrap_or_else(|| LitStr::new("camelCase", proc_macro2::Span::call_site()));

    match existing {
        Some(existing) if existing.value() != value.value() => Err(syn::Error::new_spanned(
            existing,
            "Conflicting serde rename_all; remove it or set api_model(rename_all = \"...\") to match",
        )),
        Some(_) => Ok(None),
        None => Ok(Some(quote! { #[serde(rename_all = #value)] })),
    }
}

/// Structs deny unknown fields by default; enums and response-only models never do.
fn deny_attr(
    args: &ApiModelArgs,
    serde: &SerdeAttrs,
    input: &DeriveInput,
) -> Result<Option<TokenStream>, syn::Error> {
    let applicable = matches!(input.data, Data::Struct(_)) && args.direction != Direction::Response;
    let wanted = args.deny_unknown_fields.unwrap_or(applicable);

    if serde.deny_unknown_fields {
        if args.deny_unknown_fields == Some(false) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        }
        return Ok(None);
    }

    Ok((wanted && applicable).then(|| quote! { #[serde(deny_unknown_fields)] }))
}
