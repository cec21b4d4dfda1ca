//! Attribute macros for state and request types.
//!
//! - `#[state("path")]` marks a struct stored at a state path
//! - `#[request("path")]` marks a struct emitted to a request path
//!
//! Both generate `pub const PATH: &'static str` and add the derives the
//! engine relies on. A path may carry one `{param}` segment
//! (`post/{slug}`); such types also get `PATTERN` (the path with `+` in
//! place of the parameter, for subscriptions) and `path_for(value)`.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod expand;
mod path;

/// Define a state type. Adds `Debug, Clone, PartialEq` when missing.
///
/// ```ignore
/// #[state("post/{slug}")]
/// #[derive(Default)]
/// pub struct PostDetailPage {
///     pub editing: bool,
/// }
///
/// store.set(&PostDetailPage::path_for("hello"), page);
/// flux.subscribe(PostDetailPage::PATTERN, |_, _| {});
/// ```
#[proc_macro_attribute]
pub fn state(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::ItemStruct);
    expand::expand(attr.into(), item, &["Debug", "Clone", "PartialEq"])
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Define a request type. Adds `Debug, Clone` when missing.
///
/// ```ignore
/// #[request("auth/login")]
/// pub struct LoginReq {
///     pub email: String,
///     pub password: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn request(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::ItemStruct);
    expand::expand(attr.into(), item, &["Debug", "Clone"])
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
