use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

#[derive(Default)]
struct Shared {
    token: Option<String>,
    subscribers: Vec<mpsc::UnboundedSender<Option<String>>>,
}

/// Holder of the current bearer token.
///
/// Clones share the same token. Every assignment that changes the value is
/// delivered, in order, to each receiver obtained from
/// [`AccessTokenStore::subscribe`].
#[derive(Clone, Default)]
pub struct AccessTokenStore {
    shared: Arc<Mutex<Shared>>,
}

impl AccessTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn is_set(&self) -> bool {
        self.lock().token.is_some()
    }

    /// Assigns the token. Returns `true` if the stored value changed.
    pub fn set(&self, token: Option<String>) -> bool {
        let mut shared = self.lock();
        if shared.token == token {
            return false;
        }
        let Shared {
            token: current,
            subscribers,
        } = &mut *shared;
        *current = token;
        subscribers.retain(|tx| tx.send(current.clone()).is_ok());
        true
    }

    pub fn clear(&self) -> bool {
        self.set(None)
    }

    /// Registers a receiver of token transitions.
    ///
    /// The first message is the value at subscription time. Closed receivers
    /// are dropped on the next change.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<String>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut shared = self.lock();
        let _ = tx.send(shared.token.clone());
        shared.subscribers.push(tx);
        rx
    }
}

impl fmt::Debug for AccessTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the token itself
        f.debug_struct("AccessTokenStore")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let store = AccessTokenStore::new();
        assert_eq!(store.get(), None);
        assert!(!store.is_set());
    }

    #[test]
    fn test_set_reports_changes_only() {
        let store = AccessTokenStore::new();
        assert!(store.set(Some("abc".into())));
        assert!(!store.set(Some("abc".into())));
        assert!(store.set(Some("def".into())));
        assert!(store.clear());
        assert!(!store.clear());
    }

    #[test]
    fn test_clones_share_token() {
        let store = AccessTokenStore::new();
        let other = store.clone();
        other.set(Some("shared".into()));
        assert_eq!(store.get().as_deref(), Some("shared"));
    }

    #[test]
    fn test_subscriber_starts_with_current_value() {
        let store = AccessTokenStore::new();
        store.set(Some("t".into()));
        let mut rx = store.subscribe();

        assert_eq!(rx.try_recv().unwrap().as_deref(), Some("t"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscribers_see_every_change_once() {
        let store = AccessTokenStore::new();
        let mut rx = store.subscribe();
        assert_eq!(rx.try_recv().unwrap(), None);

        store.set(Some("a".into()));
        store.set(Some("a".into()));
        store.clear();
        store.set(Some("b".into()));

        assert_eq!(rx.try_recv().unwrap().as_deref(), Some("a"));
        assert_eq!(rx.try_recv().unwrap(), None);
        assert_eq!(rx.try_recv().unwrap().as_deref(), Some("b"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let store = AccessTokenStore::new();
        drop(store.subscribe());
        let _live = store.subscribe();

        store.set(Some("t".into()));
        assert_eq!(store.lock().subscribers.len(), 1);
    }

    #[test]
    fn test_debug_hides_token() {
        let store = AccessTokenStore::new();
        store.set(Some("secret-token".into()));
        let printed = format!("{store:?}");
        assert!(!printed.contains("secret-token"));
    }
}
