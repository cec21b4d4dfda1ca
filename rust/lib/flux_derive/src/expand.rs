use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{ItemStruct, LitStr, Token};

use crate::path;

/// Re-emit `item` with the `required` derives it lacks, plus the path items.
pub fn expand(attr: TokenStream, item: ItemStruct, required: &[&str]) -> syn::Result<TokenStream> {
    let lit: LitStr = syn::parse2(attr)?;
    let template = path::parse(&lit.value(), lit.span())?;

    let present = declared_derives(&item)?;
    let missing: Vec<_> = required
        .iter()
        .filter(|d| !present.iter().any(|p| p == *d))
        .map(|d| format_ident!("{}", d))
        .collect();
    let derive = if missing.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#missing),*)] }
    };

    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let raw = &template.raw;

    let param_items = match &template.param {
        None => quote! {},
        Some(param) => {
            let pattern = &template.pattern;
            let placeholder = format!("{{{param}}}");
            quote! {
                /// Subscription pattern matching every instance of this path.
                pub const PATTERN: &'static str = #pattern;

                /// Concrete path for one parameter value.
                pub fn path_for(value: &str) -> ::std::string::String {
                    Self::PATH.replacen(#placeholder, value, 1)
                }
            }
        }
    };

    Ok(quote! {
        #derive
        #item

        impl #impl_generics #name #ty_generics #where_clause {
            pub const PATH: &'static str = #raw;
            #param_items
        }
    })
}

/// Idents named in the struct's own `#[derive(..)]` attributes.
fn declared_derives(item: &ItemStruct) -> syn::Result<Vec<String>> {
    let mut names = Vec::new();
    for attr in item.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let paths =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
        names.extend(
            paths
                .iter()
                .filter_map(|p| p.segments.last())
                .map(|s| s.ident.to_string()),
        );
    }
    Ok(names)
}
