//! Job description stage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::models::{
    ClarificationResult, JobDescription, JobDescriptionSet, MarketResearch, StageName,
};
use crate::planning::prompts::{
    JOB_DESCRIPTION_PROMPT_TEMPLATE, JOB_DESCRIPTION_SYSTEM, POSTING_TIPS_PROMPT_TEMPLATE,
    POSTING_TIPS_SYSTEM,
};
use crate::planning::stage::{
    excerpt, fill_template, generate_structured, generate_text, json_system, process_roles,
    settle_roles, text_system, RoleAgent, StageOutcome, StageReport,
};

const POSTING_TIPS_EXCERPT_CHARS: usize = 1500;

/// Declared inputs of the job description stage.
pub struct JobDescriptionInputs {
    pub clarifications: ClarificationResult,
    pub market_research: MarketResearch,
}

pub struct JobDescriptionAgent {
    llm: Arc<dyn TextGenerator>,
}

impl JobDescriptionAgent {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn process(
        &self,
        inputs: &JobDescriptionInputs,
    ) -> Result<StageReport<JobDescriptionSet>, LlmError> {
        let roles = &inputs.clarifications.extracted_info.roles;
        let outcomes = process_roles(self, roles, inputs).await?;

        let mut degraded = Vec::new();
        let job_descriptions = settle_roles(self.stage(), outcomes, &mut degraded);

        let posting_tips = generate_text(
            self.llm.as_ref(),
            &text_system(POSTING_TIPS_SYSTEM),
            &POSTING_TIPS_PROMPT_TEMPLATE.replace(
                "{job_descriptions}",
                &excerpt(&job_descriptions, POSTING_TIPS_EXCERPT_CHARS),
            ),
        )
        .await?;

        Ok(StageReport {
            output: JobDescriptionSet {
                job_descriptions,
                posting_tips,
            },
            degraded,
        })
    }
}

#[async_trait]
impl RoleAgent for JobDescriptionAgent {
    type Upstream = JobDescriptionInputs;
    type Output = JobDescription;

    fn stage(&self) -> StageName {
        StageName::JobDescription
    }

    async fn process_role(
        &self,
        role: &str,
        inputs: &JobDescriptionInputs,
    ) -> Result<StageOutcome<JobDescription>, LlmError> {
        let info = &inputs.clarifications.extracted_info;
        let market = inputs.market_research.market_data.get(role);

        let skills = info.skills.join(", ");
        let key_skills = market.map(|m| m.key_skills.join(", ")).unwrap_or_default();
        let salary_ranges = market
            .map(|m| excerpt(&m.salary_ranges, usize::MAX))
            .unwrap_or_else(|| "Unknown".to_string());

        let prompt = fill_template(
            JOB_DESCRIPTION_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("company_stage", info.company_stage.as_str()),
                ("team_size", info.team_size.as_str()),
                ("work_mode", info.work_mode.as_str()),
                ("skills", skills.as_str()),
                ("timeline", info.timeline.as_str()),
                ("budget", info.budget.as_str()),
                ("key_skills", key_skills.as_str()),
                ("salary_ranges", salary_ranges.as_str()),
                (
                    "market_demand",
                    market.map(|m| m.market_demand.as_str()).unwrap_or("Moderate"),
                ),
            ],
        );

        generate_structured(
            self.llm.as_ref(),
            &json_system(JOB_DESCRIPTION_SYSTEM),
            &prompt,
            || fallback_job_description(role),
        )
        .await
    }
}

pub fn fallback_job_description(role: &str) -> JobDescription {
    let lower = role.to_lowercase();
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    JobDescription {
        title: format!("{role} - Join Our Growing Startup"),
        summary: format!(
            "We're looking for a talented {role} to join our innovative startup team and help build the future."
        ),
        responsibilities: vec![
            format!("Lead {lower} initiatives and projects"),
            "Collaborate with cross-functional teams".to_string(),
            "Drive innovation and technical excellence".to_string(),
            "Mentor junior team members".to_string(),
            "Contribute to product strategy and roadmap".to_string(),
        ],
        required_qualifications: vec![
            format!("3+ years of experience in {lower} role"),
            "Strong technical and problem-solving skills".to_string(),
            "Excellent communication and teamwork abilities".to_string(),
            "Startup mindset and adaptability".to_string(),
            "Bachelor's degree or equivalent experience".to_string(),
        ],
        preferred_qualifications: owned(&[
            "Experience in fast-paced startup environment",
            "Leadership and mentoring experience",
            "Open source contributions",
            "Advanced degree in relevant field",
        ]),
        what_we_offer: owned(&[
            "Competitive salary and equity package",
            "Flexible work arrangements",
            "Professional development opportunities",
            "Health and wellness benefits",
            "Collaborative and innovative culture",
        ]),
        application_process: "Send your resume and cover letter explaining why you're excited about this opportunity.".to_string(),
    }
}
