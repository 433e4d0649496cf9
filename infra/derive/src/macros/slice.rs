use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

/// Splits the annotated struct into `<Name>Inner` (the data) and `<Name>` (a cheap `Arc`
/// handle) and registers the handle as a kernel feature slice.
pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let ItemStruct { attrs, vis, ident, generics, fields, .. } = &input;
    if !generics.params.is_empty() {
        return syn::Error::new_spanned(generics, "pmgr_slice does not support generic slices")
            .to_compile_error();
    }

    let inner = format_ident!("{ident}Inner");
    let semi = matches!(fields, syn::Fields::Unnamed(_) | syn::Fields::Unit).then(|| quote! { ; });

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #ident {
            inner: std::sync::Arc<#inner>,
        }

        impl #ident {
            #[must_use]
            pub fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #ident {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::pmgr_kernel::domain::registry::FeatureSlice for #ident {
            fn name(&self) -> &'static str {
                stringify!(#ident)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}
