use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::router::{Payload, Router};
use crate::store::StateStore;
use crate::value::{StateValue, SubscriptionId};

/// The state engine: one [`StateStore`] plus one [`Router`].
///
/// A renderer only ever calls three things: `get` to read a page,
/// `emit` to send a user action, `subscribe` to learn what to redraw.
pub struct Flux {
    store: Arc<StateStore>,
    router: Router,
}

impl Flux {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            router: Router::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.store.get(path)
    }

    /// Typed read; `None` when missing or of another type.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.store.get_as(path)
    }

    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        self.store.scan(prefix)
    }

    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        self.store.snapshot()
    }

    /// Send a request and wait for its handlers. Returns how many ran.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) -> usize {
        self.emit_arc(path, Arc::new(payload)).await
    }

    pub async fn emit_arc(&self, path: &str, payload: Payload) -> usize {
        self.router
            .dispatch(path, payload, Arc::clone(&self.store))
            .await
    }

    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on(pattern, handler);
    }

    /// Register a handler for requests of type `R`.
    pub fn on_typed<R, F, Fut>(&self, pattern: &str, handler: F)
    where
        R: Any + Send + Sync,
        F: Fn(Arc<R>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on_typed(pattern, handler);
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.router.matches(path)
    }

    /// Watch state under `pattern`. The handler gets `None` for a removed path.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, Option<&StateValue>) + Send + Sync + 'static,
    {
        self.store.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.store.unsubscribe(pattern, id)
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

impl Default for Flux {
    fn default() -> Self {
        Self::new()
    }
}
