use std::sync::Arc;

use crate::analytics::AnalyticsSink;
use crate::config::Config;
use crate::planning::orchestrator::HiringOrchestrator;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<HiringOrchestrator>,
    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub sessions: Arc<dyn SessionStore>,
    /// Redis-backed when `REDIS_URL` is set, in-memory otherwise.
    pub analytics: Arc<dyn AnalyticsSink>,
    pub config: Config,
}
