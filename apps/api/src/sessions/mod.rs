//! Session persistence. Sessions are keyed by an opaque token and are only
//! ever removed by an explicit delete.
//!
//! Writes against the same session are last-write-wins; there is no
//! cross-request locking.

pub mod handlers;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::models::session::{ChatExchange, Session, SessionSummary};
use crate::planning::models::HiringPlan;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts `session` unless its id already exists.
    async fn create(&self, session: &Session) -> Result<(), sqlx::Error>;

    async fn get(&self, session_id: &str) -> Result<Option<Session>, sqlx::Error>;

    /// Stores the plan and moves the session status to the plan's status.
    /// Returns `false` when the session does not exist.
    async fn update_plan(&self, session_id: &str, plan: &HiringPlan) -> Result<bool, sqlx::Error>;

    /// Returns `false` when the session does not exist.
    async fn append_chat(
        &self,
        session_id: &str,
        exchange: &ChatExchange,
    ) -> Result<bool, sqlx::Error>;

    /// Summaries, newest first.
    async fn list(&self) -> Result<Vec<SessionSummary>, sqlx::Error>;

    /// Returns `false` when the session does not exist.
    async fn delete(&self, session_id: &str) -> Result<bool, sqlx::Error>;
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the id of an existing session, creating it on first use.
///
/// An absent or blank `requested` id gets a fresh token. Storage errors are
/// logged and do not fail the caller; `session_created` is only recorded once
/// the session was stored.
pub async fn ensure_session(
    store: &dyn SessionStore,
    analytics: &dyn AnalyticsSink,
    requested: Option<&str>,
) -> String {
    let session_id = match requested.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => {
            match store.get(id).await {
                Ok(Some(_)) => return id.to_string(),
                Ok(None) => {}
                Err(e) => warn!("Session lookup failed for {id}: {e}"),
            }
            id.to_string()
        }
        None => new_session_id(),
    };

    match store.create(&Session::new(&session_id)).await {
        Ok(()) => analytics.record(AnalyticsEvent::session_created(&session_id)),
        Err(e) => warn!("Failed to persist session {session_id}: {e}"),
    }
    session_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::memory::MemoryAnalytics;
    use crate::analytics::EventKind;
    use crate::sessions::memory::MemorySessionStore;

    #[tokio::test]
    async fn test_ensure_session_creates_unknown_ids_once() {
        let store = MemorySessionStore::new();
        let analytics = MemoryAnalytics::new();

        let first = ensure_session(&store, &analytics, Some("client-token")).await;
        let second = ensure_session(&store, &analytics, Some("client-token")).await;

        assert_eq!(first, "client-token");
        assert_eq!(second, "client-token");
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(analytics.count(EventKind::SessionCreated), 1);
    }

    #[tokio::test]
    async fn test_ensure_session_generates_id_when_absent() {
        let store = MemorySessionStore::new();
        let analytics = MemoryAnalytics::new();

        let id = ensure_session(&store, &analytics, Some("  ")).await;

        assert!(Uuid::parse_str(&id).is_ok());
        assert!(store.get(&id).await.unwrap().is_some());
    }

    /// Store whose backend is unreachable.
    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn create(&self, _session: &Session) -> Result<(), sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn get(&self, _session_id: &str) -> Result<Option<Session>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn update_plan(&self, _session_id: &str, _plan: &HiringPlan) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn append_chat(
            &self,
            _session_id: &str,
            _exchange: &ChatExchange,
        ) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn list(&self) -> Result<Vec<SessionSummary>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn delete(&self, _session_id: &str) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    #[tokio::test]
    async fn test_ensure_session_skips_event_when_store_fails() {
        let analytics = MemoryAnalytics::new();

        let id = ensure_session(&UnavailableStore, &analytics, Some("client-token")).await;

        assert_eq!(id, "client-token");
        assert_eq!(analytics.count(EventKind::SessionCreated), 0);
    }
}
