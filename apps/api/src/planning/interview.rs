//! Interview process stage. Roles come from the job description keys.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::models::{
    InterviewProcess, InterviewProcessSet, InterviewStage, JobDescriptionSet, StageName,
};
use crate::planning::prompts::{
    INTERVIEW_GUIDELINES_PROMPT, INTERVIEW_GUIDELINES_SYSTEM, INTERVIEW_PROMPT_TEMPLATE,
    INTERVIEW_SYSTEM,
};
use crate::planning::stage::{
    fill_template, generate_structured, generate_text, json_system, process_roles, settle_roles,
    text_system, RoleAgent, StageOutcome, StageReport,
};

pub struct InterviewProcessAgent {
    llm: Arc<dyn TextGenerator>,
}

impl InterviewProcessAgent {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn process(
        &self,
        job_descriptions: &JobDescriptionSet,
    ) -> Result<StageReport<InterviewProcessSet>, LlmError> {
        let roles = job_descriptions.job_descriptions.role_names();
        let outcomes = process_roles(self, &roles, job_descriptions).await?;

        let mut degraded = Vec::new();
        let interview_processes = settle_roles(self.stage(), outcomes, &mut degraded);

        let general_guidelines = generate_text(
            self.llm.as_ref(),
            &text_system(INTERVIEW_GUIDELINES_SYSTEM),
            INTERVIEW_GUIDELINES_PROMPT,
        )
        .await?;

        Ok(StageReport {
            output: InterviewProcessSet {
                interview_processes,
                general_guidelines,
            },
            degraded,
        })
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl RoleAgent for InterviewProcessAgent {
    type Upstream = JobDescriptionSet;
    type Output = InterviewProcess;

    fn stage(&self) -> StageName {
        StageName::InterviewProcess
    }

    async fn process_role(
        &self,
        role: &str,
        job_descriptions: &JobDescriptionSet,
    ) -> Result<StageOutcome<InterviewProcess>, LlmError> {
        let jd = job_descriptions.job_descriptions.get(role);

        let required_qualifications = jd
            .map(|jd| bullet_list(&jd.required_qualifications))
            .unwrap_or_default();
        let responsibilities = jd
            .map(|jd| bullet_list(&jd.responsibilities))
            .unwrap_or_default();

        let prompt = fill_template(
            INTERVIEW_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("title", jd.map(|jd| jd.title.as_str()).unwrap_or(role)),
                ("required_qualifications", required_qualifications.as_str()),
                ("responsibilities", responsibilities.as_str()),
            ],
        );

        generate_structured(
            self.llm.as_ref(),
            &json_system(INTERVIEW_SYSTEM),
            &prompt,
            fallback_interview_process,
        )
        .await
    }
}

fn interview_stage(name: &str, duration: &str, format: &str, focus: &str) -> InterviewStage {
    InterviewStage {
        name: name.to_string(),
        duration: duration.to_string(),
        format: format.to_string(),
        focus: focus.to_string(),
    }
}

fn questions(items: &[&str]) -> Vec<String> {
    items.iter().map(|q| q.to_string()).collect()
}

pub fn fallback_interview_process() -> InterviewProcess {
    InterviewProcess {
        stages: vec![
            interview_stage(
                "Initial Screening",
                "30 minutes",
                "Phone/Video call",
                "Basic qualifications and cultural fit",
            ),
            interview_stage(
                "Technical Assessment",
                "60-90 minutes",
                "Technical interview/coding challenge",
                "Technical skills and problem-solving",
            ),
            interview_stage(
                "Team Interview",
                "45 minutes",
                "Video call with team members",
                "Collaboration and communication skills",
            ),
            interview_stage(
                "Final Interview",
                "30 minutes",
                "Interview with leadership",
                "Vision alignment and final assessment",
            ),
        ],
        timeline: "2-3 weeks from application to decision".to_string(),
        evaluation_criteria: questions(&[
            "Technical competency",
            "Cultural fit",
            "Communication skills",
            "Growth potential",
            "Startup mindset",
        ]),
        sample_questions: [
            (
                "screening",
                questions(&[
                    "Tell us about your experience with the technologies in this role",
                    "Why are you interested in joining a startup?",
                    "What are your career goals?",
                ]),
            ),
            (
                "technical",
                questions(&[
                    "Walk us through your approach to a recent technical problem",
                    "How would you handle a production incident under time pressure?",
                    "Explain a challenging project you worked on",
                ]),
            ),
            (
                "cultural",
                questions(&[
                    "How do you handle ambiguity and changing priorities?",
                    "Describe a time you had to learn something quickly",
                    "What motivates you in your work?",
                ]),
            ),
        ]
        .into_iter()
        .map(|(category, qs)| (category.to_string(), qs))
        .collect(),
        decision_process: "Collaborative decision with input from all interviewers".to_string(),
        logistics: "Coordinated through HR with clear communication to candidates".to_string(),
    }
}
