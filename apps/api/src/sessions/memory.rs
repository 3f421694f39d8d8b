use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::session::{ChatExchange, Session, SessionSummary};
use crate::planning::models::HiringPlan;
use crate::sessions::SessionStore;

/// Process-local session store, used when no database URL is configured.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), sqlx::Error> {
        self.sessions
            .write()
            .await
            .entry(session.session_id.clone())
            .or_insert_with(|| session.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, sqlx::Error> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn update_plan(&self, session_id: &str, plan: &HiringPlan) -> Result<bool, sqlx::Error> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return Ok(false);
        };
        session.status = plan.status.into();
        session.hiring_plan = Some(plan.clone());
        session.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn append_chat(
        &self,
        session_id: &str,
        exchange: &ChatExchange,
    ) -> Result<bool, sqlx::Error> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return Ok(false);
        };
        session.messages.push(exchange.clone());
        session.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, sqlx::Error> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .values()
            .map(Session::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn delete(&self, session_id: &str) -> Result<bool, sqlx::Error> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }
}
