use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::store::StateStore;
use crate::trie::Trie;

/// Boxed `Send` future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

type ErasedHandler = Arc<dyn Fn(String, Payload, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Maps request paths (`auth/login`, `post/favourite`) to async handlers.
///
/// Several handlers may match one path through wildcards; they run one
/// after another in match order.
pub struct Router {
    handlers: Trie<ErasedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            handlers: Trie::new(),
        }
    }

    /// Register a handler taking the raw, type-erased payload.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let erased: ErasedHandler =
            Arc::new(move |path, payload, store| -> BoxFuture {
                Box::pin(handler(path, payload, store))
            });
        self.handlers.insert(pattern, erased);
    }

    /// Register a handler for payloads of type `R`.
    ///
    /// Payloads of any other type are logged and skipped.
    pub fn on_typed<R, F, Fut>(&self, pattern: &str, handler: F)
    where
        R: Any + Send + Sync,
        F: Fn(Arc<R>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler = Arc::new(handler);
        self.on(pattern, move |path, payload: Payload, store| {
            let handler = Arc::clone(&handler);
            async move {
                match payload.downcast::<R>() {
                    Ok(req) => handler(req, store).await,
                    Err(_) => tracing::warn!(
                        path = %path,
                        expected = std::any::type_name::<R>(),
                        "request payload has unexpected type"
                    ),
                }
            }
        });
    }

    /// Run every handler matching `path`. Returns how many ran.
    pub async fn dispatch(&self, path: &str, payload: Payload, store: Arc<StateStore>) -> usize {
        let handlers = self.handlers.match_topic(path);
        if handlers.is_empty() {
            tracing::debug!(path, "no handler for request");
            return 0;
        }
        tracing::debug!(path, handlers = handlers.len(), "dispatch");
        for handler in &handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
        handlers.len()
    }

    /// Whether a handler was registered under exactly `pattern`.
    pub fn has_handler(&self, pattern: &str) -> bool {
        self.handlers.has_pattern(pattern)
    }

    /// Whether any handler would run for `path`.
    pub fn matches(&self, path: &str) -> bool {
        !self.handlers.match_topic(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
