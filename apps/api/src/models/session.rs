use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::planning::models::{HiringPlan, PlanStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Fallback,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Fallback => "fallback",
        }
    }

    /// Unknown values read back from storage are treated as active.
    pub fn parse(value: &str) -> Self {
        match value {
            "completed" => SessionStatus::Completed,
            "fallback" => SessionStatus::Fallback,
            _ => SessionStatus::Active,
        }
    }
}

impl From<PlanStatus> for SessionStatus {
    fn from(status: PlanStatus) -> Self {
        match status {
            PlanStatus::Completed => SessionStatus::Completed,
            PlanStatus::Fallback => SessionStatus::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub ai_response: String,
}

impl ChatExchange {
    pub fn new(user_message: impl Into<String>, ai_response: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user_message: user_message.into(),
            ai_response: ai_response.into(),
        }
    }
}

/// A conversation and its (at most one) hiring plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub messages: Vec<ChatExchange>,
    pub hiring_plan: Option<HiringPlan>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: Utc::now(),
            updated_at: None,
            status: SessionStatus::Active,
            messages: Vec::new(),
            hiring_plan: None,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status,
            has_hiring_plan: self.hiring_plan.is_some(),
            message_count: self.messages.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub has_hiring_plan: bool,
    pub message_count: usize,
}

/// Row shape of `hiring_sessions`.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: String,
    pub messages: Json<Vec<ChatExchange>>,
    pub hiring_plan: Option<Json<HiringPlan>>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            session_id: row.session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status: SessionStatus::parse(&row.status),
            messages: row.messages.0,
            hiring_plan: row.hiring_plan.map(|plan| plan.0),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionSummaryRow {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: String,
    pub has_hiring_plan: bool,
    pub message_count: i32,
}

impl From<SessionSummaryRow> for SessionSummary {
    fn from(row: SessionSummaryRow) -> Self {
        SessionSummary {
            session_id: row.session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status: SessionStatus::parse(&row.status),
            has_hiring_plan: row.has_hiring_plan,
            message_count: usize::try_from(row.message_count).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_round_trip_through_storage_string() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Fallback,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), status);
        }
        assert_eq!(SessionStatus::parse("archived"), SessionStatus::Active);
    }

    #[test]
    fn test_status_follows_plan_status() {
        assert_eq!(
            SessionStatus::from(PlanStatus::Fallback),
            SessionStatus::Fallback
        );
        assert_eq!(
            SessionStatus::from(PlanStatus::Completed),
            SessionStatus::Completed
        );
    }

    #[test]
    fn test_new_session_summary() {
        let mut session = Session::new("abc");
        session.messages.push(ChatExchange::new("hi", "hello"));

        let summary = session.summary();

        assert_eq!(summary.session_id, "abc");
        assert_eq!(summary.status, SessionStatus::Active);
        assert!(!summary.has_hiring_plan);
        assert_eq!(summary.message_count, 1);
        assert_eq!(
            serde_json::to_value(&summary).unwrap()["status"],
            "active"
        );
    }
}
