use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::analytics::AnalyticsEvent;
use crate::errors::AppError;
use crate::models::session::ChatExchange;
use crate::planning::models::{HiringPlan, PlanStatus};
use crate::planning::orchestrator::PlanMode;
use crate::sessions::ensure_session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub user_input: String,
    pub company_context: Option<String>,
    pub session_id: Option<String>,
    /// Overrides the service default from `PLAN_MODE`.
    pub mode: Option<PlanMode>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub session_id: String,
    pub status: PlanStatus,
    pub agents_used: Vec<String>,
    pub plan: HiringPlan,
}

/// POST /api/generate_hiring_plan
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, AppError> {
    if req.user_input.trim().is_empty() {
        return Err(AppError::Validation("user_input must not be empty".to_string()));
    }

    let session_id = ensure_session(
        state.sessions.as_ref(),
        state.analytics.as_ref(),
        req.session_id.as_deref(),
    )
    .await;
    let mode = req.mode.unwrap_or(state.config.plan_mode);

    let plan = state
        .orchestrator
        .generate_plan(
            &req.user_input,
            req.company_context.as_deref(),
            &session_id,
            mode,
        )
        .await;

    match state.sessions.update_plan(&session_id, &plan).await {
        Ok(true) => {}
        Ok(false) => warn!("Session {session_id} vanished before its plan was stored"),
        Err(e) => warn!("Failed to store plan for session {session_id}: {e}"),
    }

    Ok(Json(GeneratePlanResponse {
        session_id,
        status: plan.status,
        agents_used: plan.agents_used.clone(),
        plan,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let session = state
        .sessions
        .get(&req.session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", req.session_id)))?;

    let response = match state.orchestrator.chat(&req.message, &session).await {
        Ok(response) => response,
        Err(e) => {
            error!("Chat failed for session {}: {e}", req.session_id);
            state
                .analytics
                .record(AnalyticsEvent::error(Some(&req.session_id), &e.to_string()));
            return Err(AppError::Llm(e.to_string()));
        }
    };

    let exchange = ChatExchange::new(&req.message, &response);
    if let Err(e) = state.sessions.append_chat(&req.session_id, &exchange).await {
        warn!("Failed to store chat for session {}: {e}", req.session_id);
    }
    state.analytics.record(AnalyticsEvent::chat(&req.session_id));

    Ok(Json(ChatResponse {
        response,
        session_id: req.session_id,
    }))
}
