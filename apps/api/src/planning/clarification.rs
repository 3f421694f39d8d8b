//! Clarification stage: extracts structured requirements from the raw request.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::keyword_plan::detect_roles;
use crate::planning::models::{ClarificationResult, ExtractedInfo, StageName};
use crate::planning::prompts::{CLARIFICATION_PROMPT_TEMPLATE, CLARIFICATION_SYSTEM};
use crate::planning::stage::{
    fill_template, generate_structured, json_system, settle_aggregate, StageReport,
};

pub struct ClarificationAgent {
    llm: Arc<dyn TextGenerator>,
}

impl ClarificationAgent {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn process(
        &self,
        user_input: &str,
        company_context: Option<&str>,
    ) -> Result<StageReport<ClarificationResult>, LlmError> {
        let context_line = match company_context {
            Some(ctx) if !ctx.trim().is_empty() => format!("Company Context: {ctx}"),
            _ => "No company context provided.".to_string(),
        };
        let prompt = fill_template(
            CLARIFICATION_PROMPT_TEMPLATE,
            &[
                ("user_input", user_input),
                ("company_context", context_line.as_str()),
            ],
        );

        let outcome = generate_structured(
            self.llm.as_ref(),
            &json_system(CLARIFICATION_SYSTEM),
            &prompt,
            || fallback_clarification(user_input),
        )
        .await?;

        let mut degraded = Vec::new();
        let mut output = settle_aggregate(StageName::Clarification, outcome, &mut degraded);

        let roles = normalize_roles(std::mem::take(&mut output.extracted_info.roles));
        output.extracted_info.roles = if roles.is_empty() {
            detect_roles(user_input)
        } else {
            roles
        };
        info!("Clarified roles: {:?}", output.extracted_info.roles);

        Ok(StageReport { output, degraded })
    }
}

/// Trims, drops empties and removes case-insensitive duplicates, keeping the
/// first spelling seen.
pub fn normalize_roles(roles: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    roles
        .into_iter()
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .filter(|role| seen.insert(role.to_lowercase()))
        .collect()
}

pub fn fallback_clarification(user_input: &str) -> ClarificationResult {
    ClarificationResult {
        extracted_info: ExtractedInfo {
            roles: detect_roles(user_input),
            skills: vec!["Technical skills".to_string(), "Problem solving".to_string()],
            timeline: "Not specified".to_string(),
            budget: "Not specified".to_string(),
            company_stage: "Startup".to_string(),
            team_size: "Small team".to_string(),
            work_mode: "Not specified".to_string(),
        },
        clarifying_questions: [
            "What is your budget range for these positions?",
            "What is your ideal timeline for hiring?",
            "What specific technical skills are most important?",
            "Do you prefer remote, hybrid, or onsite work?",
            "What is your company's current team size?",
        ]
        .iter()
        .map(|q| q.to_string())
        .collect(),
        assumptions: [
            "Assuming startup environment with fast-paced growth",
            "Assuming technical roles require strong problem-solving skills",
            "Assuming flexibility in role definitions due to startup nature",
        ]
        .iter()
        .map(|a| a.to_string())
        .collect(),
    }
}
