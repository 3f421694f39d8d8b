use anyhow::{anyhow, Context, Result};

use crate::planning::orchestrator::PlanMode;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sessions live in memory when unset.
    pub database_url: Option<String>,
    /// Analytics live in memory when unset.
    pub redis_url: Option<String>,
    pub anthropic_api_key: String,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub plan_mode: PlanMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            redis_url: optional_env("REDIS_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            google_api_key: optional_env("GOOGLE_API_KEY"),
            google_cse_id: optional_env("GOOGLE_CSE_ID"),
            plan_mode: parse_plan_mode(optional_env("PLAN_MODE").as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_plan_mode(value: Option<&str>) -> Result<PlanMode> {
    match value {
        None => Ok(PlanMode::default()),
        Some(raw) => raw.parse().map_err(|e: String| anyhow!("PLAN_MODE: {e}")),
    }
}
