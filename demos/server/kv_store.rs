use std::collections::HashMap;
use std::sync::Arc;

use justflash::SessionData;
use log::trace;
use tokio::sync::Mutex;

/// In-memory sessions keyed by session id, shared between request handlers.
///
/// Handlers `load` a copy at the start of a request, work on it through a
/// `FlashStore`, and `save` it back when done.
#[derive(Clone, Default)]
pub struct KVStore {
    inner: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl KVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored session for `id`, or an empty one.
    pub async fn load(&self, id: &str) -> SessionData {
        let store = self.inner.lock().await;
        let session = store.get(id).cloned().unwrap_or_default();
        trace!("session {} loaded ({} keys)", id, session.len());
        session
    }

    pub async fn save(&self, id: &str, session: SessionData) {
        let mut store = self.inner.lock().await;
        trace!("session {} saved ({} keys)", id, session.len());
        store.insert(id.to_string(), session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use justflash::{FlashConfig, FlashStore};
    use serde_json::json;

    #[tokio::test]
    async fn unknown_session_loads_empty() {
        let store = KVStore::new();
        assert!(store.load("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn flash_round_trip_across_requests() {
        let store = KVStore::new();

        // request 1: queue a message and persist the session
        let mut session = store.load("sid-1").await;
        let mut flash = FlashStore::new(&mut session);
        flash.add_message("x", "hi");
        assert!(!flash.has_message("x"));
        drop(flash);
        store.save("sid-1", session).await;

        // request 2: the message is promoted and the slot emptied
        let mut session = store.load("sid-1").await;
        let flash = FlashStore::new(&mut session);
        assert_eq!(flash.get_message("x"), Some(&vec![json!("hi")]));
        drop(flash);
        assert_eq!(session["flash"], json!({}));
        store.save("sid-1", session).await;

        // request 3: nothing left
        let mut session = store.load("sid-1").await;
        let flash = FlashStore::new(&mut session);
        assert!(flash.get_messages().is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = KVStore::new();
        let config = FlashConfig::new("notices");

        let mut alice = store.load("alice").await;
        config.open(&mut alice).add_message("info", "for alice");
        store.save("alice", alice).await;

        let mut bob = store.load("bob").await;
        assert!(config.open(&mut bob).get_messages().is_empty());
        store.save("bob", bob).await;

        let mut alice = store.load("alice").await;
        assert!(config.open(&mut alice).has_message("info"));
    }

    #[tokio::test]
    async fn clones_share_sessions() {
        let store = KVStore::new();
        let handle = store.clone();

        let mut session = store.load("sid").await;
        session.insert("user".into(), json!("scooby"));
        store.save("sid", session).await;

        assert_eq!(handle.load("sid").await["user"], json!("scooby"));
    }
}
