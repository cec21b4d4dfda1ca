//! Typed HTTP client for the blog REST API.
//!
//! Authentication is pluggable through [`TokenSource`]; every request asks
//! it for a bearer token. Resource APIs hang off one [`ApiClient`]:
//!
//! ```ignore
//! use quill_client::{ApiClient, NoAuth, PostsFilters};
//!
//! let api = ApiClient::new("http://127.0.0.1:8000/api", Arc::new(NoAuth));
//! let page = api.posts().list(&PostsFilters::default()).await?;
//! let next = page.next_page_param();
//! ```

pub mod auth;
pub mod error;
pub mod filters;
pub mod http;
pub mod pagination;
pub mod posts;
pub mod profiles;
pub mod tags;
pub mod token;
pub mod types;


pub use error::ApiError;
pub use filters::{CommentsFilters, PostsFilters, ProfilesFilters, TagsFilters};
pub use http::{ApiClient, QueryPairs};
pub use pagination::{page_count, page_param, Paginated};
pub use token::{NoAuth, TokenSource};
pub use types::*;
