use axum::{extract::State, Json};

use crate::analytics::AnalyticsSummary;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let summary = state.analytics.summary().await?;
    Ok(Json(summary))
}
