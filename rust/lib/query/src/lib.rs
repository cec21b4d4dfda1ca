//! Quill query cache.
//!
//! Server data keyed by [`QueryKey`], with request de-duplication,
//! staleness, retry with exponential backoff, infinite (cursor-paged)
//! queries, and patch/invalidate hooks for mutations.
//!
//! ```ignore
//! let cache = QueryClient::default();
//! let key = QueryKey::new(["post", "hello"]);
//! let post = cache.fetch_query(&key, &cache.default_options(), || api.posts().get("hello")).await?;
//! cache.update_query_data(&key, |p: &mut Post| p.is_favourited = true);
//! ```

mod cache;
mod infinite;
mod key;
mod mutation;
mod options;

pub use cache::{QueryClient, QueryError, QueryEvent, QueryObserver, QuerySnapshot, QueryStatus};
pub use infinite::InfiniteData;
pub use key::QueryKey;
pub use mutation::MutationTracker;
pub use options::{backoff, QueryOptions, Retry, MAX_RETRY_DELAY};
