use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use quill_flux::{StateValue, SubscriptionId, Trie};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::key::QueryKey;
use crate::options::{backoff, QueryOptions};

/// Why a query returned no data.
#[derive(Debug, thiserror::Error)]
pub enum QueryError<E> {
    #[error("{0}")]
    Fetch(Arc<E>),

    #[error("query is disabled and has no cached data")]
    Disabled,
}

impl<E> Clone for QueryError<E> {
    fn clone(&self) -> Self {
        match self {
            QueryError::Fetch(e) => QueryError::Fetch(Arc::clone(e)),
            QueryError::Disabled => QueryError::Disabled,
        }
    }
}

impl<E> QueryError<E> {
    /// The fetch error, if one happened.
    pub fn source_error(&self) -> Option<&E> {
        match self {
            QueryError::Fetch(e) => Some(e),
            QueryError::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data and no error yet.
    Loading,
    Success,
    /// The latest fetch failed. Earlier data may still be cached.
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub has_data: bool,
    pub error: Option<String>,
    pub failure_count: u32,
    pub updated_at: Option<Instant>,
}

/// What happened to a key. Delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEvent {
    Fetching,
    Updated,
    Failed,
    Invalidated,
    Removed,
}

pub type QueryObserver = Arc<dyn Fn(&QueryKey, QueryEvent) + Send + Sync>;

/// Broadcast result of one fetch: stored data, or the error.
type Outcome = Result<StateValue, StateValue>;

struct InFlight {
    seq: u64,
    done: watch::Receiver<Option<Outcome>>,
}

#[derive(Default)]
struct Entry {
    data: Option<StateValue>,
    error: Option<String>,
    failure_count: u32,
    updated_at: Option<Instant>,
    invalidated: bool,
    /// Sequence number of the fetch or write whose data is stored.
    applied_seq: u64,
    /// Sequence number current when the entry was created.
    born_seq: u64,
    in_flight: Option<InFlight>,
}

impl Entry {
    fn is_stale(&self, opts: &QueryOptions, now: Instant) -> bool {
        match (&self.data, self.updated_at) {
            (Some(_), Some(at)) => self.invalidated || now.duration_since(at) >= opts.stale_time,
            _ => true,
        }
    }

    fn accepts(&self, seq: u64) -> bool {
        seq > self.applied_seq.max(self.born_seq)
    }

    fn status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Loading
        }
    }
}

#[derive(Clone)]
struct Observer {
    id: SubscriptionId,
    handler: QueryObserver,
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    observers: Trie<Observer>,
    seq: AtomicU64,
    next_observer: AtomicU64,
    defaults: QueryOptions,
}

/// Key-addressed cache of server data.
///
/// - concurrent fetches of one key share a single request
/// - a fetch only lands if nothing started later has landed already
/// - mutations patch entries with `update_query_data` or mark them stale
///   with `invalidate_queries`
///
/// Cloning shares the cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

/// How a finished fetch is folded into what is cached at that moment.
pub(crate) type Merge = Box<dyn FnOnce(Option<&StateValue>, StateValue) -> Option<StateValue> + Send>;

impl QueryClient {
    pub fn new(defaults: QueryOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                observers: Trie::new(),
                seq: AtomicU64::new(0),
                next_observer: AtomicU64::new(1),
                defaults,
            }),
        }
    }

    pub fn default_options(&self) -> QueryOptions {
        self.inner.defaults.clone()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_seq(&self) -> u64 {
        self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current_seq(&self) -> u64 {
        self.inner.seq.load(Ordering::SeqCst)
    }

    fn new_entry(&self) -> Entry {
        Entry {
            born_seq: self.current_seq(),
            ..Entry::default()
        }
    }

    fn notify(&self, key: &QueryKey, event: QueryEvent) {
        for observer in self.inner.observers.match_topic(&key.path()) {
            (observer.handler)(key, event);
        }
    }

    // ====================================================================
    // Fetching
    // ====================================================================

    /// Cached data when fresh, otherwise the result of a (shared) fetch.
    pub async fn fetch_query<T, E, F, Fut>(
        &self,
        key: &QueryKey,
        opts: &QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError<E>>
    where
        T: Any + Send + Sync,
        E: Any + Send + Sync + Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(fresh) = self.fresh_data::<T>(key, opts) {
            tracing::debug!(%key, "cache hit");
            return Ok(fresh);
        }
        self.run(key, opts, true, || fetcher(), keep_latest())
            .await
            .and_then(|v| expect_data(key, v))
    }

    /// Fetch even when fresh, without joining a fetch already in flight.
    /// The result only lands if no later fetch has landed first.
    pub async fn refetch_query<T, E, F, Fut>(
        &self,
        key: &QueryKey,
        opts: &QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError<E>>
    where
        T: Any + Send + Sync,
        E: Any + Send + Sync + Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run(key, opts, false, || fetcher(), keep_latest())
            .await
            .and_then(|v| expect_data(key, v))
    }

    /// Refetch on a background task when the entry is stale.
    pub fn spawn_refetch<T, E, F, Fut>(
        &self,
        key: QueryKey,
        opts: QueryOptions,
        fetcher: F,
    ) -> Option<JoinHandle<()>>
    where
        T: Any + Send + Sync,
        E: Any + Send + Sync + Display,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if !opts.enabled || !self.is_stale(&key, &opts) {
            return None;
        }
        let client = self.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = client.fetch_query(&key, &opts, fetcher).await {
                tracing::warn!(%key, error = %e, "background refetch failed");
            }
        }))
    }

    fn fresh_data<T: Any + Send + Sync>(&self, key: &QueryKey, opts: &QueryOptions) -> Option<Arc<T>> {
        let entries = self.entries();
        let entry = entries.get(key)?;
        if entry.is_stale(opts, Instant::now()) {
            return None;
        }
        entry.data.as_ref()?.downcast_arc::<T>()
    }

    /// Shared fetch engine.
    ///
    /// With `join`, waits on an in-flight fetch for the key instead of
    /// starting another. The attempt closure is retried per `opts.retry`.
    /// On success `merge` folds the fetched value into whatever is cached
    /// when the fetch completes; the folded value is stored and returned.
    pub(crate) async fn run<V, E, A, Fut>(
        &self,
        key: &QueryKey,
        opts: &QueryOptions,
        join: bool,
        mut attempt: A,
        merge: Merge,
    ) -> Result<StateValue, QueryError<E>>
    where
        V: Any + Send + Sync,
        E: Any + Send + Sync + Display,
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !opts.enabled {
            return self
                .entries()
                .get(key)
                .and_then(|e| e.data.clone())
                .ok_or(QueryError::Disabled);
        }

        let mut join = join;
        let (seq, tx) = loop {
            let done = {
                let mut entries = self.entries();
                let born = self.new_entry();
                let entry = entries.entry(key.clone()).or_insert(born);
                match &entry.in_flight {
                    Some(in_flight) if join => in_flight.done.clone(),
                    _ => {
                        let seq = self.next_seq();
                        let (tx, rx) = watch::channel(None);
                        entry.in_flight = Some(InFlight { seq, done: rx });
                        break (seq, tx);
                    }
                }
            };
            tracing::debug!(%key, "joining in-flight fetch");
            if let Some(result) = wait_for(done).await {
                return result;
            }
            // The other fetch went away without an answer; run our own.
            join = false;
        };
        self.notify(key, QueryEvent::Fetching);

        let mut failures = 0u32;
        let fetched = loop {
            match attempt().await {
                Ok(v) => break Ok(v),
                Err(e) => {
                    if opts.retry.should_retry(failures, &e) {
                        let delay = backoff(opts.retry_base_delay, failures);
                        tracing::warn!(%key, error = %e, attempt = failures + 1, ?delay, "fetch failed, retrying");
                        failures += 1;
                        tokio::time::sleep(delay).await;
                    } else {
                        failures += 1;
                        break Err(e);
                    }
                }
            }
        };

        let (outcome, event, result) = {
            let mut entries = self.entries();
            let entry = entries.get_mut(key);
            match (entry, fetched) {
                (Some(entry), fetched) => {
                    if entry.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
                        entry.in_flight = None;
                    }
                    let accepted = entry.accepts(seq);
                    match fetched {
                        Ok(value) => {
                            let fetched = StateValue::new(value);
                            let merged = if accepted {
                                merge(entry.data.as_ref(), fetched.clone())
                            } else {
                                None
                            };
                            match merged {
                                Some(stored) => {
                                    entry.data = Some(stored.clone());
                                    entry.error = None;
                                    entry.failure_count = 0;
                                    entry.updated_at = Some(Instant::now());
                                    entry.invalidated = false;
                                    entry.applied_seq = seq;
                                    (Ok(stored.clone()), Some(QueryEvent::Updated), Ok(stored))
                                }
                                None => {
                                    tracing::debug!(%key, seq, "superseded fetch result dropped");
                                    let current = entry.data.clone().unwrap_or(fetched);
                                    (Ok(current.clone()), None, Ok(current))
                                }
                            }
                        }
                        Err(e) => {
                            let e = Arc::new(e);
                            if accepted {
                                entry.error = Some(e.to_string());
                                entry.failure_count = failures;
                                entry.applied_seq = seq;
                            }
                            let event = accepted.then_some(QueryEvent::Failed);
                            (
                                Err(StateValue::from_arc(Arc::clone(&e))),
                                event,
                                Err(QueryError::Fetch(e)),
                            )
                        }
                    }
                }
                // Removed while fetching: answer the caller, keep nothing.
                (None, Ok(value)) => {
                    let v = StateValue::new(value);
                    (Ok(v.clone()), None, Ok(v))
                }
                (None, Err(e)) => {
                    let e = Arc::new(e);
                    (
                        Err(StateValue::from_arc(Arc::clone(&e))),
                        None,
                        Err(QueryError::Fetch(e)),
                    )
                }
            }
        };
        tx.send_replace(Some(outcome));
        if let Some(event) = event {
            self.notify(key, event);
        }
        result
    }

    // ====================================================================
    // Direct cache access
    // ====================================================================

    pub fn get_query_data<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries().get(key)?.data.as_ref()?.downcast_arc::<T>()
    }

    /// Store `value` as if it had just been fetched.
    pub fn set_query_data<T: Any + Send + Sync>(&self, key: &QueryKey, value: T) {
        let seq = self.next_seq();
        {
            let mut entries = self.entries();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry {
                    born_seq: seq - 1,
                    ..Entry::default()
                });
            entry.data = Some(StateValue::new(value));
            entry.error = None;
            entry.updated_at = Some(Instant::now());
            entry.invalidated = false;
            entry.applied_seq = seq;
        }
        self.notify(key, QueryEvent::Updated);
    }

    /// Patch the cached `T` in place. `None` (and no change) when nothing
    /// of that type is cached.
    pub fn update_query_data<T, F>(&self, key: &QueryKey, f: F) -> Option<Arc<T>>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut T),
    {
        let patched = {
            let mut entries = self.entries();
            let entry = entries.get_mut(key)?;
            let mut value = entry.data.as_ref()?.downcast_ref::<T>()?.clone();
            f(&mut value);
            let patched = Arc::new(value);
            entry.data = Some(StateValue::from_arc(Arc::clone(&patched)));
            entry.applied_seq = self.next_seq();
            patched
        };
        tracing::debug!(%key, "patched cached data");
        self.notify(key, QueryEvent::Updated);
        Some(patched)
    }

    /// Mark every entry under `prefix` stale. Returns the affected keys.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        let keys: Vec<QueryKey> = {
            let mut entries = self.entries();
            entries
                .iter_mut()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, e)| {
                    e.invalidated = true;
                    k.clone()
                })
                .collect()
        };
        for key in &keys {
            self.notify(key, QueryEvent::Invalidated);
        }
        tracing::debug!(%prefix, count = keys.len(), "invalidated");
        keys
    }

    /// Drop every entry under `prefix`. Fetches still in flight for those
    /// keys will not repopulate them.
    pub fn remove_queries(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        let keys: Vec<QueryKey> = {
            let mut entries = self.entries();
            let keys: Vec<QueryKey> = entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect();
            for key in &keys {
                entries.remove(key);
            }
            keys
        };
        for key in &keys {
            self.notify(key, QueryEvent::Removed);
        }
        keys
    }

    /// Drop everything.
    pub fn clear(&self) -> Vec<QueryKey> {
        self.remove_queries(&QueryKey::new(Vec::<String>::new()))
    }

    pub fn is_stale(&self, key: &QueryKey, opts: &QueryOptions) -> bool {
        self.entries()
            .get(key)
            .map_or(true, |e| e.is_stale(opts, Instant::now()))
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .is_some_and(|e| e.in_flight.is_some())
    }

    /// Status of `key` under the client's default options.
    pub fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        let entries = self.entries();
        let entry = entries.get(key)?;
        Some(QuerySnapshot {
            status: entry.status(),
            is_fetching: entry.in_flight.is_some(),
            is_stale: entry.is_stale(&self.inner.defaults, Instant::now()),
            has_data: entry.data.is_some(),
            error: entry.error.clone(),
            failure_count: entry.failure_count,
            updated_at: entry.updated_at,
        })
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    // ====================================================================
    // Observers
    // ====================================================================

    /// Watch keys whose path matches `pattern` (`+` / `#` wildcards).
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&QueryKey, QueryEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::from_raw(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        self.inner.observers.insert(
            pattern,
            Observer {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.inner.observers.remove(pattern, |o| o.id == id)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

/// Plain queries: the latest fetch replaces the cached value.
pub(crate) fn keep_latest() -> Merge {
    Box::new(|_: Option<&StateValue>, fetched: StateValue| Some(fetched))
}

async fn wait_for<E: Any + Send + Sync>(
    mut done: watch::Receiver<Option<Outcome>>,
) -> Option<Result<StateValue, QueryError<E>>> {
    let outcome = done.wait_for(|o| o.is_some()).await.ok()?.clone()?;
    match outcome {
        Ok(v) => Some(Ok(v)),
        Err(e) => e.downcast_arc::<E>().map(|e| Err(QueryError::Fetch(e))),
    }
}

fn expect_data<T: Any + Send + Sync, E>(key: &QueryKey, value: StateValue) -> Result<Arc<T>, QueryError<E>> {
    match value.downcast_arc::<T>() {
        Some(v) => Ok(v),
        None => {
            tracing::warn!(%key, expected = std::any::type_name::<T>(), "cached data has another type");
            Err(QueryError::Disabled)
        }
    }
}
