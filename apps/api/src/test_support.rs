//! Deterministic stand-ins for the external capabilities, shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::search::{SearchResponse, SearchResult, WebSearch};

type Script = dyn Fn(&str, &str) -> String + Send + Sync;

/// Answers every call through a closure of `(system, prompt)`.
pub struct ScriptedGenerator {
    script: Box<Script>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(script: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.script)(system, prompt))
    }
}

/// Always answers with prose that no stage can parse.
pub struct GarbageGenerator;

pub const GARBAGE_RESPONSE: &str = "I'm sorry, I can only answer in prose today.";

#[async_trait]
impl TextGenerator for GarbageGenerator {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Ok(GARBAGE_RESPONSE.to_string())
    }
}

/// Fails every call as a transport error.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "upstream unavailable".to_string(),
        })
    }
}

/// Returns one canned hit per query and remembers every query it saw.
#[derive(Default)]
pub struct RecordingSearch {
    queries: Mutex<Vec<String>>,
}

impl RecordingSearch {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for RecordingSearch {
    async fn search(&self, query: &str) -> SearchResponse {
        self.queries.lock().unwrap().push(query.to_string());
        SearchResponse {
            query: query.to_string(),
            results: vec![SearchResult {
                title: format!("Result for {query}"),
                link: "https://example.com".to_string(),
                snippet: "Salaries are rising".to_string(),
                display_link: "example.com".to_string(),
            }],
            total_results: Some("1".to_string()),
            error: None,
        }
    }
}
