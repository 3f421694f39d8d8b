pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics::handlers::handle_analytics;
use crate::planning::handlers::{handle_chat, handle_generate_plan};
use crate::sessions::handlers::{
    handle_create_session, handle_delete_session, handle_get_session, handle_list_sessions,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route(
            "/api/sessions",
            post(handle_create_session).get(handle_list_sessions),
        )
        .route(
            "/api/sessions/:id",
            get(handle_get_session).delete(handle_delete_session),
        )
        // Planning
        .route("/api/generate_hiring_plan", post(handle_generate_plan))
        .route("/api/chat", post(handle_chat))
        // Analytics
        .route("/api/analytics", get(handle_analytics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analytics::memory::MemoryAnalytics;
    use crate::config::Config;
    use crate::planning::orchestrator::{HiringOrchestrator, PlanMode};
    use crate::sessions::memory::MemorySessionStore;
    use crate::test_support::{RecordingSearch, ScriptedGenerator};

    fn test_config() -> Config {
        Config {
            database_url: None,
            redis_url: None,
            anthropic_api_key: "test-key".to_string(),
            google_api_key: None,
            google_cse_id: None,
            plan_mode: PlanMode::Fast,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    fn test_app() -> Router {
        let llm = Arc::new(ScriptedGenerator::new(|_, prompt| {
            format!("Answering: {}", prompt.lines().last().unwrap_or_default())
        }));
        let analytics = Arc::new(MemoryAnalytics::new());
        let orchestrator =
            HiringOrchestrator::new(llm, Arc::new(RecordingSearch::default()), analytics.clone());
        build_router(AppState {
            orchestrator: Arc::new(orchestrator),
            sessions: Arc::new(MemorySessionStore::new()),
            analytics,
            config: test_config(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "hireplan-api");
    }

    #[tokio::test]
    async fn test_empty_user_input_is_rejected() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/generate_hiring_plan",
            Some(json!({"user_input": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generation_creates_unknown_session_and_stores_plan() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/generate_hiring_plan",
            Some(json!({
                "user_input": "I need a founding engineer ASAP",
                "session_id": "unknown-session"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "unknown-session");
        assert_eq!(body["status"], "completed");
        assert_eq!(body["agents_used"], json!(["keyword_planner"]));

        let (status, session) = send(&app, "GET", "/api/sessions/unknown-session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "completed");
        assert_eq!(
            session["hiring_plan"]["user_request"],
            "I need a founding engineer ASAP"
        );
    }

    #[tokio::test]
    async fn test_request_mode_overrides_service_default() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/generate_hiring_plan",
            Some(json!({"user_input": "Hire a designer", "mode": "agents"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(
            body["agents_used"],
            json!([
                "clarification",
                "market_research",
                "job_description",
                "interview_process",
                "compensation",
                "checklist"
            ])
        );
        // the scripted generator answers in prose, so every slice is a fallback
        assert!(!body["plan"]["degraded_outputs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_on_unknown_session_is_not_found() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(json!({"message": "hello", "session_id": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_chat_appends_history_without_touching_plan() {
        let app = test_app();
        let (_, generated) = send(
            &app,
            "POST",
            "/api/generate_hiring_plan",
            Some(json!({"user_input": "Hire a designer"})),
        )
        .await;
        let session_id = generated["session_id"].as_str().unwrap().to_string();

        for message in ["What should I pay?", "What should I pay?"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/chat",
                Some(json!({"message": message, "session_id": session_id})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert!(body["response"].as_str().unwrap().starts_with("Answering:"));
        }

        let (_, session) = send(&app, "GET", &format!("/api/sessions/{session_id}"), None).await;
        assert_eq!(session["messages"].as_array().unwrap().len(), 2);
        assert_eq!(session["hiring_plan"], generated["plan"]);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = test_app();
        let (status, created) = send(&app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["status"], "created");
        let session_id = created["session_id"].as_str().unwrap().to_string();

        let (_, listed) = send(&app, "GET", "/api/sessions", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["has_hiring_plan"], false);

        let uri = format!("/api/sessions/{session_id}");
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analytics_counts_recorded_events() {
        let app = test_app();
        send(&app, "POST", "/api/sessions", None).await;
        send(
            &app,
            "POST",
            "/api/generate_hiring_plan",
            Some(json!({"user_input": "Hire a data scientist"})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/api/analytics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overview"]["total_sessions"], 2);
        assert_eq!(body["overview"]["total_plans_generated"], 1);
    }
}
