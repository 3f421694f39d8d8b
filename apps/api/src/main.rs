mod analytics;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod planning;
mod routes;
mod search;
mod sessions;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::memory::MemoryAnalytics;
use crate::analytics::redis_sink::RedisAnalytics;
use crate::analytics::AnalyticsSink;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::planning::orchestrator::HiringOrchestrator;
use crate::routes::build_router;
use crate::search::GoogleSearchClient;
use crate::sessions::memory::MemorySessionStore;
use crate::sessions::postgres::PgSessionStore;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HirePlan API v{}", env!("CARGO_PKG_VERSION"));

    // Session storage: PostgreSQL when configured
    let sessions: Arc<dyn SessionStore> = match &config.database_url {
        Some(url) => Arc::new(PgSessionStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set, sessions are kept in memory");
            Arc::new(MemorySessionStore::new())
        }
    };

    // Analytics: Redis when configured and reachable
    let analytics: Arc<dyn AnalyticsSink> = match &config.redis_url {
        Some(url) => match RedisAnalytics::connect(url).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                warn!("Redis unavailable ({e}), analytics are kept in memory");
                Arc::new(MemoryAnalytics::new())
            }
        },
        None => Arc::new(MemoryAnalytics::new()),
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let search = GoogleSearchClient::new(config.google_api_key.clone(), config.google_cse_id.clone())?;
    if !search.is_configured() {
        warn!("Google search credentials missing, market research runs without web results");
    }

    let orchestrator = HiringOrchestrator::new(Arc::new(llm), Arc::new(search), analytics.clone());
    info!("Default plan mode: {:?}", config.plan_mode);

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        sessions,
        analytics,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
