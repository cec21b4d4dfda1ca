//! Transient notifications.
//!
//! Each toast lands in `app/toasts` and removes itself after the
//! configured time to live.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use quill_flux::StateStore;

use crate::state::{Toast, ToastKind, Toasts};

pub struct Notifier {
    next_id: AtomicU64,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ttl,
        }
    }

    pub fn success(&self, store: &Arc<StateStore>, message: impl Into<String>) -> u64 {
        self.push(store, ToastKind::Success, message.into())
    }

    pub fn error(&self, store: &Arc<StateStore>, message: impl Into<String>) -> u64 {
        self.push(store, ToastKind::Error, message.into())
    }

    fn push(&self, store: &Arc<StateStore>, kind: ToastKind, message: String) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match kind {
            ToastKind::Success => tracing::info!(id, %message, "toast"),
            ToastKind::Error => tracing::warn!(id, %message, "toast"),
        }
        store.update(Toasts::PATH, |t: &mut Toasts| {
            t.items.push(Toast { id, kind, message })
        });

        if self.ttl.is_zero() {
            return id;
        }
        // No runtime (plain sync caller): the toast stays until dismissed.
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            let store = Arc::clone(store);
            let ttl = self.ttl;
            rt.spawn(async move {
                tokio::time::sleep(ttl).await;
                dismiss(&store, id);
            });
        }
        id
    }
}

/// Remove one toast. `false` when it was already gone.
pub fn dismiss(store: &StateStore, id: u64) -> bool {
    let mut found = false;
    store.modify(Toasts::PATH, |t: &mut Toasts| {
        let before = t.items.len();
        t.items.retain(|toast| toast.id != id);
        found = t.items.len() < before;
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toasts(store: &StateStore) -> Toasts {
        store.get_as::<Toasts>(Toasts::PATH).unwrap_or_default()
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_after_ttl() {
        let store = Arc::new(StateStore::new());
        let notifier = Notifier::new(Duration::from_millis(3000));

        notifier.success(&store, "Post updated");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        notifier.error(&store, "Something went wrong...");
        assert_eq!(toasts(&store).messages(), vec!["Post updated", "Something went wrong..."]);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(toasts(&store).messages(), vec!["Something went wrong..."]);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(toasts(&store).items.is_empty());
    }

    #[tokio::test]
    async fn manual_dismiss() {
        let store = Arc::new(StateStore::new());
        let notifier = Notifier::new(Duration::ZERO);
        let id = notifier.success(&store, "Comment added");
        assert!(toasts(&store).contains(ToastKind::Success, "Comment added"));
        assert!(dismiss(&store, id));
        assert!(!dismiss(&store, id));
        assert!(toasts(&store).items.is_empty());
    }
}
