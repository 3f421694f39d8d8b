use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::session::{
    ChatExchange, Session, SessionRow, SessionStatus, SessionSummary, SessionSummaryRow,
};
use crate::planning::models::HiringPlan;
use crate::sessions::SessionStore;

/// Sessions in the `hiring_sessions` table; plan and messages are JSONB.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO hiring_sessions (session_id, created_at, updated_at, status, messages, hiring_plan)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(&session.session_id)
        .bind(session.created_at)
        .bind(session.updated_at)
        .bind(session.status.as_str())
        .bind(Json(&session.messages))
        .bind(session.hiring_plan.as_ref().map(Json))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT session_id, created_at, updated_at, status, messages, hiring_plan \
             FROM hiring_sessions WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Session::from))
    }

    async fn update_plan(&self, session_id: &str, plan: &HiringPlan) -> Result<bool, sqlx::Error> {
        let status = SessionStatus::from(plan.status);
        let result = sqlx::query(
            r#"
            UPDATE hiring_sessions
            SET hiring_plan = $2, status = $3, updated_at = NOW()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(Json(plan))
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_chat(
        &self,
        session_id: &str,
        exchange: &ChatExchange,
    ) -> Result<bool, sqlx::Error> {
        // Single-statement append; concurrent appends do not lose messages.
        let result = sqlx::query(
            r#"
            UPDATE hiring_sessions
            SET messages = messages || $2, updated_at = NOW()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(Json(vec![exchange]))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, sqlx::Error> {
        let rows: Vec<SessionSummaryRow> = sqlx::query_as(
            r#"
            SELECT session_id,
                   created_at,
                   updated_at,
                   status,
                   hiring_plan IS NOT NULL AS has_hiring_plan,
                   jsonb_array_length(messages) AS message_count
            FROM hiring_sessions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SessionSummary::from).collect())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hiring_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
