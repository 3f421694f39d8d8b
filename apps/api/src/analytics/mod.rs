//! Usage analytics: fire-and-forget event recording plus an aggregated summary.
//!
//! Recording never blocks or fails the request that produced the event. Each
//! event kind keeps at most `MAX_EVENTS_PER_KIND` of its most recent events.

pub mod handlers;
pub mod memory;
pub mod redis_sink;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::planning::models::PlanStatus;
use crate::planning::stage::truncate_chars;

pub const MAX_EVENTS_PER_KIND: usize = 1000;
const INPUT_EXCERPT_CHARS: usize = 200;
const ERROR_EXCERPT_CHARS: usize = 500;
const RECENT_ERROR_LIMIT: usize = 5;
const PEAK_HOUR_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionCreated,
    PlanStarted,
    PlanCompleted,
    Chat,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::SessionCreated,
        EventKind::PlanStarted,
        EventKind::PlanCompleted,
        EventKind::Chat,
        EventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionCreated => "session_created",
            EventKind::PlanStarted => "plan_started",
            EventKind::PlanCompleted => "plan_completed",
            EventKind::Chat => "chat",
            EventKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_status: Option<PlanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AnalyticsEvent {
    fn new(kind: EventKind, session_id: Option<&str>) -> Self {
        Self {
            kind,
            session_id: session_id.map(str::to_string),
            timestamp: Utc::now(),
            user_input: None,
            plan_status: None,
            error_message: None,
        }
    }

    pub fn session_created(session_id: &str) -> Self {
        Self::new(EventKind::SessionCreated, Some(session_id))
    }

    pub fn plan_started(session_id: &str, user_input: &str) -> Self {
        Self {
            user_input: Some(truncate_chars(user_input, INPUT_EXCERPT_CHARS)),
            ..Self::new(EventKind::PlanStarted, Some(session_id))
        }
    }

    pub fn plan_completed(session_id: &str, status: PlanStatus) -> Self {
        Self {
            plan_status: Some(status),
            ..Self::new(EventKind::PlanCompleted, Some(session_id))
        }
    }

    pub fn chat(session_id: &str) -> Self {
        Self::new(EventKind::Chat, Some(session_id))
    }

    pub fn error(session_id: Option<&str>, message: &str) -> Self {
        Self {
            error_message: Some(truncate_chars(message, ERROR_EXCERPT_CHARS)),
            ..Self::new(EventKind::Error, session_id)
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Records an event without waiting for storage. Failures are logged.
    fn record(&self, event: AnalyticsEvent);

    async fn summary(&self) -> anyhow::Result<AnalyticsSummary>;
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_sessions: usize,
    pub total_plans_generated: usize,
    pub total_chat_interactions: usize,
    pub total_errors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub sessions_24h: usize,
    pub sessions_7d: usize,
    pub sessions_30d: usize,
    pub plans_24h: usize,
    pub plans_7d: usize,
    pub plans_30d: usize,
    pub chats_24h: usize,
    pub chats_7d: usize,
    pub chats_30d: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorAnalysis {
    pub errors_24h: usize,
    pub errors_7d: usize,
    /// Up to five most recent errors from the last seven days, oldest first.
    pub recent_errors: Vec<AnalyticsEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePatterns {
    pub peak_hours: Vec<PeakHour>,
    pub avg_interactions_per_session: f64,
    pub active_sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub plan_generation_success_rate: f64,
    pub error_rate: f64,
    pub total_events_processed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub overview: Overview,
    pub recent_activity: RecentActivity,
    pub error_analysis: ErrorAnalysis,
    pub usage_patterns: UsagePatterns,
    pub performance_metrics: PerformanceMetrics,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Aggregates retained events as of `now`.
pub fn summarize(events: &[AnalyticsEvent], now: DateTime<Utc>) -> AnalyticsSummary {
    let mut sorted: Vec<&AnalyticsEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.timestamp);

    let of_kind = |kind: EventKind| -> Vec<&AnalyticsEvent> {
        sorted.iter().copied().filter(|e| e.kind == kind).collect()
    };
    let sessions = of_kind(EventKind::SessionCreated);
    let started = of_kind(EventKind::PlanStarted);
    let completed = of_kind(EventKind::PlanCompleted);
    let chats = of_kind(EventKind::Chat);
    let errors = of_kind(EventKind::Error);

    let since = |events: &[&AnalyticsEvent], window: Duration| -> usize {
        let threshold = now - window;
        events.iter().filter(|e| e.timestamp >= threshold).count()
    };
    let day = Duration::hours(24);
    let week = Duration::days(7);
    let month = Duration::days(30);

    let week_threshold = now - week;
    let errors_7d: Vec<&AnalyticsEvent> = errors
        .iter()
        .copied()
        .filter(|e| e.timestamp >= week_threshold)
        .collect();
    let recent_errors = errors_7d
        .iter()
        .skip(errors_7d.len().saturating_sub(RECENT_ERROR_LIMIT))
        .map(|e| (*e).clone())
        .collect();

    let mut hourly: HashMap<u32, usize> = HashMap::new();
    for event in &sessions {
        *hourly.entry(event.timestamp.hour()).or_default() += 1;
    }
    let mut peak_hours: Vec<PeakHour> = hourly
        .into_iter()
        .map(|(hour, sessions)| PeakHour { hour, sessions })
        .collect();
    peak_hours.sort_by(|a, b| b.sessions.cmp(&a.sessions).then(a.hour.cmp(&b.hour)));
    peak_hours.truncate(PEAK_HOUR_LIMIT);

    let chatting_sessions: HashSet<&str> = chats
        .iter()
        .filter_map(|e| e.session_id.as_deref())
        .collect();
    let active_sessions = chatting_sessions.len();
    let attributed_chats = chats.iter().filter(|e| e.session_id.is_some()).count();
    let avg_interactions_per_session = if active_sessions == 0 {
        0.0
    } else {
        round2(attributed_chats as f64 / active_sessions as f64)
    };

    let total_events = sessions.len() + started.len() + completed.len() + chats.len();

    AnalyticsSummary {
        overview: Overview {
            total_sessions: sessions.len(),
            total_plans_generated: completed.len(),
            total_chat_interactions: chats.len(),
            total_errors: errors.len(),
        },
        recent_activity: RecentActivity {
            sessions_24h: since(&sessions, day),
            sessions_7d: since(&sessions, week),
            sessions_30d: since(&sessions, month),
            plans_24h: since(&completed, day),
            plans_7d: since(&completed, week),
            plans_30d: since(&completed, month),
            chats_24h: since(&chats, day),
            chats_7d: since(&chats, week),
            chats_30d: since(&chats, month),
        },
        error_analysis: ErrorAnalysis {
            errors_24h: since(&errors, day),
            errors_7d: errors_7d.len(),
            recent_errors,
        },
        usage_patterns: UsagePatterns {
            peak_hours,
            avg_interactions_per_session,
            active_sessions,
        },
        performance_metrics: PerformanceMetrics {
            plan_generation_success_rate: percent(completed.len(), started.len()),
            error_rate: percent(errors.len(), total_events),
            total_events_processed: total_events,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_event_payloads_are_truncated() {
        let long_input = "x".repeat(1000);
        let started = AnalyticsEvent::plan_started("s", &long_input);
        assert_eq!(started.user_input.unwrap().len(), 200);

        let error = AnalyticsEvent::error(None, &long_input);
        assert_eq!(error.error_message.unwrap().len(), 500);
        assert!(error.session_id.is_none());
    }

    #[test]
    fn test_empty_summary_has_zero_rates() {
        let summary = summarize(&[], now());
        assert_eq!(summary.overview.total_sessions, 0);
        assert_eq!(summary.performance_metrics.plan_generation_success_rate, 0.0);
        assert_eq!(summary.performance_metrics.error_rate, 0.0);
        assert!(summary.usage_patterns.peak_hours.is_empty());
        assert_eq!(summary.usage_patterns.avg_interactions_per_session, 0.0);
    }

    #[test]
    fn test_summary_windows_and_rates() {
        let now = now();
        let events = vec![
            AnalyticsEvent::session_created("a").at(now - Duration::hours(1)),
            AnalyticsEvent::session_created("b").at(now - Duration::days(3)),
            AnalyticsEvent::session_created("c").at(now - Duration::days(20)),
            AnalyticsEvent::plan_started("a", "hire").at(now - Duration::hours(1)),
            AnalyticsEvent::plan_started("b", "hire").at(now - Duration::days(3)),
            AnalyticsEvent::plan_completed("a", PlanStatus::Completed).at(now - Duration::hours(1)),
            AnalyticsEvent::chat("a").at(now - Duration::minutes(30)),
            AnalyticsEvent::chat("a").at(now - Duration::minutes(20)),
            AnalyticsEvent::chat("b").at(now - Duration::days(2)),
            AnalyticsEvent::error(Some("b"), "boom").at(now - Duration::days(10)),
        ];

        let summary = summarize(&events, now);

        assert_eq!(summary.overview.total_sessions, 3);
        assert_eq!(summary.overview.total_plans_generated, 1);
        assert_eq!(summary.recent_activity.sessions_24h, 1);
        assert_eq!(summary.recent_activity.sessions_7d, 2);
        assert_eq!(summary.recent_activity.sessions_30d, 3);
        assert_eq!(summary.recent_activity.chats_24h, 2);
        assert_eq!(summary.error_analysis.errors_7d, 0);
        assert!(summary.error_analysis.recent_errors.is_empty());
        assert_eq!(summary.usage_patterns.active_sessions, 2);
        assert_eq!(summary.usage_patterns.avg_interactions_per_session, 1.5);
        assert_eq!(summary.performance_metrics.plan_generation_success_rate, 50.0);
        // 3 sessions + 3 plan events + 3 chats
        assert_eq!(summary.performance_metrics.total_events_processed, 9);
        assert_eq!(summary.performance_metrics.error_rate, 11.11);
    }

    #[test]
    fn test_recent_errors_keeps_last_five_within_a_week() {
        let now = now();
        let events: Vec<AnalyticsEvent> = (0..8)
            .map(|i| AnalyticsEvent::error(None, &format!("e{i}")).at(now - Duration::hours(8 - i)))
            .collect();

        let summary = summarize(&events, now);

        let messages: Vec<String> = summary
            .error_analysis
            .recent_errors
            .iter()
            .filter_map(|e| e.error_message.clone())
            .collect();
        assert_eq!(messages, vec!["e3", "e4", "e5", "e6", "e7"]);
        assert_eq!(summary.error_analysis.errors_24h, 8);
    }

    #[test]
    fn test_peak_hours_top_three() {
        let base = Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap();
        let hours = [9, 9, 9, 14, 14, 20, 3];
        let events: Vec<AnalyticsEvent> = hours
            .iter()
            .enumerate()
            .map(|(i, h)| {
                AnalyticsEvent::session_created(&format!("s{i}"))
                    .at(base + Duration::hours(*h))
            })
            .collect();

        let summary = summarize(&events, now());

        let peaks = summary.usage_patterns.peak_hours;
        assert_eq!(peaks.len(), 3);
        assert_eq!(peaks[0], PeakHour { hour: 9, sessions: 3 });
        assert_eq!(peaks[1], PeakHour { hour: 14, sessions: 2 });
        assert_eq!(peaks[2], PeakHour { hour: 3, sessions: 1 });
    }
}
