use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::trie::Trie;
use crate::value::{StateValue, SubscriptionId};

/// Callback invoked with the changed path and its new value, or `None`
/// once the path has been removed.
pub type ChangeHandler = Arc<dyn Fn(&str, Option<&StateValue>) + Send + Sync>;

/// Path-addressed client state.
///
/// Every piece of page and session state lives at one path
/// (`session/state`, `posts/list`, `post/{slug}/comments`). Writers replace
/// the whole value; readers get a cheap `Arc` handle. Subscribers are
/// matched through a [`Trie`] so a renderer can watch `post/#` or `#`.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    watchers: Trie<Watcher>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct Watcher {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            watchers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, StateValue>> {
        self.values.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, StateValue>> {
        self.values.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Store `value` at `path` and notify watchers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        self.write().insert(path.to_string(), value.clone());
        self.notify(path, Some(&value));
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.read().get(path).cloned()
    }

    /// Read the value at `path` as an owned `T`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Read-modify-write of a typed value.
    ///
    /// Starts from the current value (or `T::default()` when the path is
    /// empty or holds another type), applies `f`, stores the result and
    /// notifies watchers. Returns the stored value.
    pub fn update<T, F>(&self, path: &str, f: F) -> T
    where
        T: Any + Clone + Default + Send + Sync,
        F: FnOnce(&mut T),
    {
        let next = {
            let mut values = self.write();
            let mut current = values
                .get(path)
                .and_then(|v| v.cloned::<T>())
                .unwrap_or_default();
            f(&mut current);
            values.insert(path.to_string(), StateValue::new(current.clone()));
            current
        };
        if let Some(value) = self.get(path) {
            self.notify(path, Some(&value));
        }
        next
    }

    /// Like [`update`](Self::update) but only when a `T` is already stored.
    /// Returns `None` (and changes nothing) otherwise.
    pub fn modify<T, F>(&self, path: &str, f: F) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut T),
    {
        let (next, value) = {
            let mut values = self.write();
            let mut current = values.get(path)?.cloned::<T>()?;
            f(&mut current);
            let value = StateValue::new(current.clone());
            values.insert(path.to_string(), value.clone());
            (current, value)
        };
        self.notify(path, Some(&value));
        Some(next)
    }

    /// Drop the value at `path`. Watchers see `None` when something was there.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let old = self.write().remove(path);
        if old.is_some() {
            self.notify(path, None);
        }
        old
    }

    /// Drop `prefix` itself and everything below it. Returns the removed
    /// paths; each one is reported to its watchers as `None`.
    pub fn remove_prefix(&self, prefix: &str) -> Vec<String> {
        let removed: Vec<String> = {
            let mut values = self.write();
            let removed: Vec<String> = values
                .keys()
                .filter(|k| is_under(k, prefix))
                .cloned()
                .collect();
            for path in &removed {
                values.remove(path);
            }
            removed
        };
        for path in &removed {
            self.notify(path, None);
        }
        removed
    }

    /// Entries strictly below `prefix`, ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let start = format!("{prefix}/");
        self.read()
            .range(start.clone()..)
            .take_while(|(k, _)| k.starts_with(&start))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Watch paths matching `pattern` (`+` one level, `#` any depth).
    /// Handlers run synchronously after the value is stored.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, Option<&StateValue>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.watchers.insert(
            pattern,
            Watcher {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.watchers.remove(pattern, |w| w.id == id)
    }

    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn notify(&self, path: &str, value: Option<&StateValue>) {
        for watcher in self.watchers.match_topic(path) {
            (watcher.handler)(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
