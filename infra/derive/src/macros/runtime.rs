use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Error, Expr, ItemFn, Meta, ReturnType, Token, Type};

/// Expands the `#[pmgr_runtime::main]` attribute macro.
///
/// Accepted arguments: an optional profile (`high_performance`, `memory_efficient`,
/// `default`) followed by an optional `threads = <expr>` override.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "The #[pmgr_runtime::main] attribute can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "The #[pmgr_runtime::main] attribute requires a Result return type",
        )
        .to_compile_error();
    }

    let config = match runtime_config(args) {
        Ok(config) => config,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = &input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #config;
            let rt = ::pmgr_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn runtime_config(args: TokenStream) -> Result<TokenStream, Error> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;

    let mut profile = None;
    let mut threads: Option<Expr> = None;

    for meta in metas {
        match meta {
            Meta::Path(path) if profile.is_none() => {
                let Some(ident) = path.get_ident() else {
                    return Err(Error::new_spanned(path, "Expected a runtime profile name"));
                };
                profile = Some(match ident.to_string().as_str() {
                    "high_performance" => quote! { high_performance() },
                    "memory_efficient" => quote! { memory_efficient() },
                    "default" => quote! { default() },
                    _ => {
                        return Err(Error::new_spanned(
                            ident,
                            "Unknown runtime profile. Use: high_performance, memory_efficient, or default",
                        ));
                    },
                });
            },
            Meta::NameValue(nv) if nv.path.is_ident("threads") && threads.is_none() => {
                threads = Some(nv.value);
            },
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Unexpected argument; expected a profile and/or `threads = N`",
                ));
            },
        }
    }

    let profile = profile.unwrap_or_else(|| quote! { default() });
    let threads = threads.map(|expr| quote! { .with_worker_threads(#expr) });

    Ok(quote! { ::pmgr_runtime::RuntimeConfig::#profile #threads })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
