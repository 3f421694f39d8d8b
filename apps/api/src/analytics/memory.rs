use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::analytics::{
    summarize, AnalyticsEvent, AnalyticsSink, AnalyticsSummary, EventKind, MAX_EVENTS_PER_KIND,
};

/// Process-local analytics, used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryAnalytics {
    events: Mutex<HashMap<EventKind, VecDeque<AnalyticsEvent>>>,
}

impl MemoryAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EventKind, VecDeque<AnalyticsEvent>>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map_or(0, VecDeque::len)
    }

    pub fn events(&self, kind: EventKind) -> Vec<AnalyticsEvent> {
        self.lock()
            .get(&kind)
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AnalyticsSink for MemoryAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        let mut events = self.lock();
        let bucket = events.entry(event.kind).or_default();
        bucket.push_back(event);
        while bucket.len() > MAX_EVENTS_PER_KIND {
            bucket.pop_front();
        }
    }

    async fn summary(&self) -> anyhow::Result<AnalyticsSummary> {
        let all: Vec<AnalyticsEvent> = self
            .lock()
            .values()
            .flat_map(|events| events.iter().cloned())
            .collect();
        Ok(summarize(&all, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_is_bounded_per_kind() {
        let sink = MemoryAnalytics::new();
        for i in 0..(MAX_EVENTS_PER_KIND + 25) {
            sink.record(AnalyticsEvent::chat(&format!("s{i}")));
        }
        sink.record(AnalyticsEvent::session_created("s"));

        assert_eq!(sink.count(EventKind::Chat), MAX_EVENTS_PER_KIND);
        assert_eq!(sink.count(EventKind::SessionCreated), 1);
        let oldest = &sink.events(EventKind::Chat)[0];
        assert_eq!(oldest.session_id.as_deref(), Some("s25"));
    }

    #[tokio::test]
    async fn test_summary_over_recorded_events() {
        let sink = MemoryAnalytics::new();
        sink.record(AnalyticsEvent::session_created("a"));
        sink.record(AnalyticsEvent::chat("a"));

        let summary = sink.summary().await.unwrap();

        assert_eq!(summary.overview.total_sessions, 1);
        assert_eq!(summary.overview.total_chat_interactions, 1);
        assert_eq!(summary.recent_activity.chats_24h, 1);
    }
}
