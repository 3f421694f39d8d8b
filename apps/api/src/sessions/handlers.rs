use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::analytics::AnalyticsEvent;
use crate::errors::AppError;
use crate::models::session::{Session, SessionSummary};
use crate::sessions::new_session_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub status: &'static str,
}

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session_id = new_session_id();
    state.sessions.create(&Session::new(&session_id)).await?;
    state
        .analytics
        .record(AnalyticsEvent::session_created(&session_id));
    info!("Created session {session_id}");

    Ok(Json(CreateSessionResponse {
        session_id,
        status: "created",
    }))
}

/// GET /api/sessions
pub async fn handle_list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    Ok(Json(state.sessions.list().await?))
}

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session))
}

/// DELETE /api/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.delete(&session_id).await? {
        info!("Deleted session {session_id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}
