use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Counts in-flight mutations by name so views can show a loading state.
///
/// Mutations are never retried and never cached.
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    pending: Arc<Mutex<HashMap<String, usize>>>,
}

/// Decrements the count on drop, so a cancelled mutation is released too.
struct Pending {
    tracker: MutationTracker,
    name: String,
}

impl Drop for Pending {
    fn drop(&mut self) {
        let mut pending = self.tracker.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(n) = pending.get_mut(&self.name) {
            *n -= 1;
            if *n == 0 {
                pending.remove(&self.name);
            }
        }
    }
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self, name: &str) -> Pending {
        *self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(name.to_string())
            .or_insert(0) += 1;
        Pending {
            tracker: self.clone(),
            name: name.to_string(),
        }
    }

    /// Run one mutation under `name`.
    pub async fn run<T, E, Fut>(&self, name: &str, mutation: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let _pending = self.begin(name);
        let result = mutation.await;
        if result.is_err() {
            tracing::debug!(mutation = name, "mutation failed");
        }
        result
    }

    pub fn is_loading(&self, name: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    /// Total in-flight mutations.
    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn loading_while_running() {
        let tracker = MutationTracker::new();
        let (tx, rx) = oneshot::channel::<()>();

        let t = tracker.clone();
        let task = tokio::spawn(async move {
            t.run("favourite", async {
                rx.await.ok();
                Ok::<_, String>(5)
            })
            .await
        });
        while !tracker.is_loading("favourite") {
            tokio::task::yield_now().await;
        }
        assert_eq!(tracker.in_flight(), 1);
        assert!(!tracker.is_loading("follow"));

        tx.send(()).unwrap();
        assert_eq!(task.await.unwrap(), Ok(5));
        assert!(!tracker.is_loading("favourite"));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn errors_pass_through_and_release() {
        let tracker = MutationTracker::new();
        let result = tracker
            .run("delete-post", async { Err::<(), _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(!tracker.is_loading("delete-post"));
    }

    #[tokio::test]
    async fn cancelled_mutation_is_released() {
        let tracker = MutationTracker::new();
        let t = tracker.clone();
        let task = tokio::spawn(async move {
            t.run("comment", std::future::pending::<Result<(), ()>>()).await
        });
        while !tracker.is_loading("comment") {
            tokio::task::yield_now().await;
        }
        task.abort();
        let _ = task.await;
        assert!(!tracker.is_loading("comment"));
    }
}
