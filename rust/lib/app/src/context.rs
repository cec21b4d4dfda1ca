use std::sync::Arc;

use quill_client::{ApiClient, ApiError, TokenSource};
use quill_kv::{KVError, KVStore};
use quill_query::{MutationTracker, QueryClient, QueryOptions, Retry};

use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::notify::Notifier;
use crate::token_store::TokenStore;

/// Everything a handler needs besides the state store.
pub struct AppContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub cache: QueryClient,
    pub mutations: MutationTracker,
    pub tokens: Arc<TokenStore>,
    pub debounce: Debouncer,
    pub notifier: Notifier,
}

impl AppContext {
    /// Wire the context over a local storage backend.
    pub fn new(config: ClientConfig, kv: Arc<dyn KVStore>) -> Result<Self, KVError> {
        let tokens = Arc::new(TokenStore::open(kv)?);
        let source: Arc<dyn TokenSource> = tokens.clone();
        Ok(Self {
            api: ApiClient::new(config.api_url.clone(), source),
            cache: QueryClient::new(config.query_options()),
            mutations: MutationTracker::new(),
            debounce: Debouncer::new(config.search_debounce()),
            notifier: Notifier::new(config.toast_ttl()),
            tokens,
            config,
        })
    }

    /// Options for list queries.
    pub fn queries(&self) -> QueryOptions {
        self.cache.default_options()
    }

    /// Options for detail queries: a 404 is final.
    pub fn detail_queries(&self) -> QueryOptions {
        self.queries()
            .retry(Retry::when(self.config.retry, |e: &ApiError| !e.is_not_found()))
    }
}
