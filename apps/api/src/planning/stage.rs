//! Shared stage-agent contract: prompt once per role, parse strictly, fall back
//! to a static value on parse failure, never retry.
//!
//! Transport failures (`LlmError`) are never caught here; they propagate to the
//! orchestrator's circuit breaker.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, STARTUP_HIRING_CONTEXT};
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::planning::models::{DegradedOutput, RoleMap, StageName};

/// Upper bound on in-flight generation calls within one stage.
pub const MAX_ROLE_CONCURRENCY: usize = 4;

/// Result of interpreting one generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Parsed(T),
    Fallback { value: T, reason: String },
}

impl<T> StageOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            StageOutcome::Parsed(value) | StageOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Parsed(value) | StageOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StageOutcome::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            StageOutcome::Parsed(_) => None,
            StageOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// A stage's output plus every slice that had to fall back.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport<T> {
    pub output: T,
    pub degraded: Vec<DegradedOutput>,
}

/// Strictly parses `raw` as `T`; any decode or schema error selects `fallback`.
pub fn parse_or_fallback<T: DeserializeOwned>(
    raw: &str,
    fallback: impl FnOnce() -> T,
) -> StageOutcome<T> {
    match serde_json::from_str::<T>(strip_json_fences(raw)) {
        Ok(value) => StageOutcome::Parsed(value),
        Err(e) => StageOutcome::Fallback {
            value: fallback(),
            reason: format!("unparseable response: {e}"),
        },
    }
}

/// One generation call interpreted as structured output.
pub async fn generate_structured<T: DeserializeOwned>(
    llm: &dyn TextGenerator,
    system: &str,
    prompt: &str,
    fallback: impl FnOnce() -> T,
) -> Result<StageOutcome<T>, LlmError> {
    let raw = llm.complete(system, prompt).await?;
    Ok(parse_or_fallback(&raw, fallback))
}

/// One generation call whose response is used as free text.
pub async fn generate_text(
    llm: &dyn TextGenerator,
    system: &str,
    prompt: &str,
) -> Result<String, LlmError> {
    Ok(llm.complete(system, prompt).await?.trim().to_string())
}

/// System directive for a call whose response is parsed as JSON.
pub fn json_system(directive: &str) -> String {
    format!("{directive}\n\n{STARTUP_HIRING_CONTEXT}\n\n{JSON_ONLY_SYSTEM}")
}

/// System directive for a call whose response is used as free text.
pub fn text_system(directive: &str) -> String {
    format!("{directive}\n\n{STARTUP_HIRING_CONTEXT}")
}

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so braces inside user text or
/// generated labels reach the model verbatim. Unknown placeholders and JSON
/// braces are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substitution {
            Some((value, close)) => {
                filled.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }
    filled.push_str(rest);
    filled
}

/// Pretty JSON of `value`, cut to at most `max_chars` characters.
pub fn excerpt<T: Serialize + ?Sized>(value: &T, max_chars: usize) -> String {
    let text = serde_json::to_string_pretty(value).unwrap_or_default();
    truncate_chars(&text, max_chars)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Per-role generation step shared by every role-keyed stage.
#[async_trait]
pub trait RoleAgent: Send + Sync {
    /// The upstream stage outputs this agent declares as inputs.
    type Upstream: Send + Sync;
    type Output: Send;

    fn stage(&self) -> StageName;

    async fn process_role(
        &self,
        role: &str,
        upstream: &Self::Upstream,
    ) -> Result<StageOutcome<Self::Output>, LlmError>;
}

/// Runs `process_role` for every role with bounded concurrency.
/// The returned map has exactly `roles` as keys, in the same order.
pub async fn process_roles<A: RoleAgent>(
    agent: &A,
    roles: &[String],
    upstream: &A::Upstream,
) -> Result<RoleMap<StageOutcome<A::Output>>, LlmError> {
    let outcomes: Vec<(String, StageOutcome<A::Output>)> = stream::iter(roles.iter().cloned())
        .map(|role| async move {
            let outcome = agent.process_role(&role, upstream).await?;
            Ok::<_, LlmError>((role, outcome))
        })
        .buffered(MAX_ROLE_CONCURRENCY)
        .try_collect()
        .await?;

    Ok(outcomes.into_iter().collect())
}

/// Unwraps role outcomes, recording each fallback in `degraded`.
pub fn settle_roles<T>(
    stage: StageName,
    outcomes: RoleMap<StageOutcome<T>>,
    degraded: &mut Vec<DegradedOutput>,
) -> RoleMap<T> {
    outcomes
        .into_iter()
        .map(|(role, outcome)| {
            if let Some(reason) = outcome.fallback_reason() {
                warn!("{stage} fell back for role '{role}': {reason}");
                degraded.push(DegradedOutput {
                    stage,
                    role: Some(role.clone()),
                    reason: reason.to_string(),
                });
            }
            (role, outcome.into_value())
        })
        .collect()
}

/// Unwraps a cross-role aggregate outcome, recording a fallback in `degraded`.
pub fn settle_aggregate<T>(
    stage: StageName,
    outcome: StageOutcome<T>,
    degraded: &mut Vec<DegradedOutput>,
) -> T {
    if let Some(reason) = outcome.fallback_reason() {
        warn!("{stage} aggregate fell back: {reason}");
        degraded.push(DegradedOutput {
            stage,
            role: None,
            reason: reason.to_string(),
        });
    }
    outcome.into_value()
}
