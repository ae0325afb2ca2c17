//! In-memory session store.
//!
//! Sessions are never persisted. A session is idle when no request has read or
//! changed it within the TTL; idle ones are swept whenever a new session is
//! created. Handlers must not hold the lock across an LLM call: read what they
//! need, release, call, then reacquire to commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::Session;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates an empty session and returns a copy of it.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.inner.write().await;

        // A TTL reaching past the start of the calendar disables the sweep.
        if let Some(cutoff) = Utc::now().checked_sub_signed(self.ttl) {
            let before = sessions.len();
            sessions.retain(|_, s| s.last_active_at > cutoff);
            let swept = before - sessions.len();
            if swept > 0 {
                info!("Swept {swept} idle session(s)");
            }
        }

        sessions.insert(session.id, session.clone());
        session
    }

    /// Returns a copy of the session and marks it active.
    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.touch();
        Ok(session.clone())
    }

    /// Applies `f` to the session under the write lock and returns its result.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.touch();
        f(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::FieldKey;
    use crate::models::session::SessionStage;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = SessionStore::new(Duration::hours(24));
        let created = store.create().await;
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.stage, SessionStage::Empty);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::new(Duration::hours(24));
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_is_visible_to_later_reads() {
        let store = SessionStore::new(Duration::hours(24));
        let id = store.create().await.id;
        store
            .update(id, |s| {
                s.fields.set(FieldKey::Timeline, "Q3");
                s.mark_populated();
                Ok(())
            })
            .await
            .unwrap();

        let session = store.get(id).await.unwrap();
        assert_eq!(session.fields.timeline, "Q3");
        assert_eq!(session.stage, SessionStage::Populated);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new(Duration::hours(24));
        let a = store.create().await.id;
        let b = store.create().await.id;
        store
            .update(a, |s| {
                s.fields.set(FieldKey::Industry, "Banking");
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.get(b).await.unwrap().fields.industry, "");
    }

    #[tokio::test]
    async fn test_idle_sessions_are_swept_on_create() {
        let store = SessionStore::new(Duration::zero());
        let stale = store.create().await.id;
        store.create().await;
        assert!(store.get(stale).await.is_err());
        assert_eq!(store.count().await, 1);
    }

    fn backdate(session: &mut Session, hours: i64) {
        let then = Utc::now() - Duration::hours(hours);
        session.updated_at = then;
        session.last_active_at = then;
    }

    #[tokio::test]
    async fn test_reads_keep_session_alive() {
        let store = SessionStore::new(Duration::hours(1));
        let id = store.create().await.id;
        store
            .update(id, |s| {
                backdate(s, 2);
                Ok(())
            })
            .await
            .unwrap();

        // A download only reads the session; it must still count as activity.
        store.get(id).await.unwrap();
        store.create().await;
        assert!(store.get(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_untouched_session_expires() {
        let store = SessionStore::new(Duration::hours(1));
        let id = store.create().await.id;
        store
            .update(id, |s| {
                backdate(s, 2);
                Ok(())
            })
            .await
            .unwrap();

        store.create().await;
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_huge_ttl_does_not_panic_on_create() {
        let store = SessionStore::new(Duration::days(365 * 1_000_000));
        store.create().await;
        store.create().await;
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new(Duration::hours(24));
        let id = store.create().await.id;
        store.remove(id).await.unwrap();
        assert!(store.remove(id).await.is_err());
    }
}
