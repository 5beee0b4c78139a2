//! Per-browser view state.
//!
//! Each page session gets its own [`ViewStore`], keyed by an opaque id kept in
//! a cookie. Idle sessions expire; ids the server did not issue are replaced.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::store::ViewStore;

pub const SESSION_COOKIE: &str = "reelscout_session";
pub const SESSION_TTL_SECS: i64 = 30 * 60;
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
    store: Arc<ViewStore>,
    last_seen: i64,
}

#[derive(Debug)]
pub struct Sessions {
    entries: Mutex<HashMap<String, Entry>>,
    max_entries: usize,
}

impl Default for Sessions {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the session id to use and its store, minting a new session when
    /// `id` is absent, unknown or expired.
    pub async fn resolve(&self, id: Option<&str>) -> (String, Arc<ViewStore>) {
        self.resolve_at(id, Utc::now().timestamp()).await
    }

    pub(crate) async fn resolve_at(&self, id: Option<&str>, now: i64) -> (String, Arc<ViewStore>) {
        let mut guard = self.entries.lock().await;
        if let Some(id) = id {
            if let Some(entry) = guard.get_mut(id) {
                if now - entry.last_seen <= SESSION_TTL_SECS {
                    entry.last_seen = now;
                    return (id.to_string(), entry.store.clone());
                }
            }
        }

        guard.retain(|_, e| now - e.last_seen <= SESSION_TTL_SECS);
        if guard.len() >= self.max_entries {
            let oldest = guard
                .iter()
                .min_by_key(|(_, e)| e.last_seen)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                guard.remove(&key);
            }
        }

        let new_id = Uuid::new_v4().simple().to_string();
        let store = Arc::new(ViewStore::new());
        guard.insert(
            new_id.clone(),
            Entry {
                store: store.clone(),
                last_seen: now,
            },
        );
        debug!(sessions = guard.len(), "Started new page session");
        (new_id, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Outcome, Phase};

    impl Sessions {
        async fn len(&self) -> usize {
            self.entries.lock().await.len()
        }
    }

    #[tokio::test]
    async fn known_id_returns_same_store() {
        let sessions = Sessions::new();
        let (id, store) = sessions.resolve_at(None, 1_000).await;
        let (again, same) = sessions.resolve_at(Some(&id), 1_010).await;
        assert_eq!(id, again);
        assert!(Arc::ptr_eq(&store, &same));
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_gets_a_fresh_session() {
        let sessions = Sessions::new();
        let (id, _) = sessions.resolve_at(Some("made-up"), 1_000).await;
        assert_ne!(id, "made-up");
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let sessions = Sessions::new();
        let (_, a) = sessions.resolve_at(None, 1_000).await;
        let (_, b) = sessions.resolve_at(None, 1_000).await;
        let token = a.begin(true).await;
        assert_eq!(b.snapshot().await.phase(), Phase::Idle);
        // A token from another session never supersedes this one.
        let other = b.begin(true).await;
        assert!(a
            .commit(
                token,
                Outcome::NotFound {
                    query: "x".to_string()
                }
            )
            .await
            .is_ok());
        assert!(b.commit(other, Outcome::Failed).await.is_ok());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let sessions = Sessions::new();
        let (old, _) = sessions.resolve_at(None, 0).await;
        let later = SESSION_TTL_SECS + 1;
        let (replacement, _) = sessions.resolve_at(Some(&old), later).await;
        assert_ne!(old, replacement);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn full_table_evicts_least_recently_seen() {
        let sessions = Sessions::with_limit(2);
        let (a, _) = sessions.resolve_at(None, 100).await;
        let (b, _) = sessions.resolve_at(None, 200).await;
        // Touching `a` makes `b` the oldest.
        sessions.resolve_at(Some(&a), 300).await;
        let (c, _) = sessions.resolve_at(None, 400).await;
        assert_eq!(sessions.len().await, 2);

        let (still_a, _) = sessions.resolve_at(Some(&a), 410).await;
        assert_eq!(still_a, a);
        let (c_again, _) = sessions.resolve_at(Some(&c), 420).await;
        assert_eq!(c_again, c);
        let (not_b, _) = sessions.resolve_at(Some(&b), 430).await;
        assert_ne!(not_b, b);
    }
}
