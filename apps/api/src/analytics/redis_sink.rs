use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::analytics::{
    summarize, AnalyticsEvent, AnalyticsSink, AnalyticsSummary, EventKind, MAX_EVENTS_PER_KIND,
};

const KEY_PREFIX: &str = "hireplan:analytics";

/// Analytics in Redis: one sorted set per event kind, scored by timestamp
/// (milliseconds), trimmed to the newest `MAX_EVENTS_PER_KIND` members.
#[derive(Clone)]
pub struct RedisAnalytics {
    conn: MultiplexedConnection,
}

pub fn event_key(kind: EventKind) -> String {
    format!("{KEY_PREFIX}:{}", kind.as_str())
}

impl RedisAnalytics {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis analytics connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl AnalyticsSink for RedisAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        let mut conn = self.conn.clone();
        tokio::spawn(async move {
            let member = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Dropping analytics event {}: {e}", event.kind.as_str());
                    return;
                }
            };
            let key = event_key(event.kind);
            let score = event.timestamp.timestamp_millis() as f64;
            // Keep ranks [-MAX, -1]: the newest members.
            let keep_from = -(MAX_EVENTS_PER_KIND as isize) - 1;

            let result = redis::pipe()
                .zadd(&key, member, score)
                .ignore()
                .zremrangebyrank(&key, 0, keep_from)
                .ignore()
                .query_async::<_, ()>(&mut conn)
                .await;
            if let Err(e) = result {
                warn!("Failed to record analytics event in {key}: {e}");
            }
        });
    }

    async fn summary(&self) -> anyhow::Result<AnalyticsSummary> {
        let mut conn = self.conn.clone();
        let mut events = Vec::new();
        for kind in EventKind::ALL {
            let members: Vec<String> = conn.zrange(event_key(kind), 0, -1).await?;
            for member in members {
                match serde_json::from_str::<AnalyticsEvent>(&member) {
                    Ok(event) => events.push(event),
                    Err(e) => warn!("Skipping malformed analytics event: {e}"),
                }
            }
        }
        Ok(summarize(&events, Utc::now()))
    }
}
