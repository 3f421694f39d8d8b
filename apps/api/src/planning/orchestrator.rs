//! Hiring plan orchestrator.
//!
//! The agent pipeline is an explicit state machine:
//!
//!   Clarification → MarketResearch → JobDescription → InterviewProcess
//!     → Compensation → Checklist → Finalize → Done
//!
//! Each step reads only the upstream outputs its stage declares and writes its
//! own output back into `PipelineState`. Any step error trips the circuit
//! breaker: the in-flight state is discarded and the keyword plan is returned
//! with status `fallback`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::session::{ChatExchange, Session};
use crate::planning::checklist::{ChecklistBuilderAgent, ChecklistInputs};
use crate::planning::clarification::ClarificationAgent;
use crate::planning::compensation::{CompensationAgent, CompensationInputs};
use crate::planning::interview::InterviewProcessAgent;
use crate::planning::job_description::{JobDescriptionAgent, JobDescriptionInputs};
use crate::planning::keyword_plan::build_plan;
use crate::planning::market_research::MarketResearchAgent;
use crate::planning::models::{
    ChecklistSet, ClarificationResult, CompensationSet, DegradedOutput, HiringPlan,
    InterviewProcessSet, JobDescriptionSet, MarketResearch, PlanStatus, RoleKeyMismatch,
    StageName,
};
use crate::planning::prompts::CHAT_SYSTEM_TEMPLATE;
use crate::planning::stage::{excerpt, fill_template, generate_text, StageReport};
use crate::search::WebSearch;

/// Marker placed in `agents_used` for circuit-breaker plans.
pub const FALLBACK_MARKER: &str = "fallback";

const CHAT_PLAN_EXCERPT_CHARS: usize = 4000;
const CHAT_HISTORY_EXCHANGES: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Plan mode
// ────────────────────────────────────────────────────────────────────────────

/// Which construction path builds a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Keyword plan only, no generation calls.
    #[default]
    Fast,
    /// Full agent pipeline behind the circuit breaker.
    Agents,
}

impl FromStr for PlanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(PlanMode::Fast),
            "agents" => Ok(PlanMode::Agents),
            other => Err(format!("unknown plan mode '{other}' (expected 'fast' or 'agents')")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} generation failed: {source}")]
    Generation {
        stage: StageName,
        #[source]
        source: LlmError,
    },

    #[error("{stage} started before {missing} produced its output")]
    MissingUpstream { stage: StageName, missing: StageName },

    #[error("role keys of {} {:?} do not match job descriptions {:?}", .0.section, .0.found, .0.expected)]
    InconsistentRoles(RoleKeyMismatch),
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Clarification,
    MarketResearch,
    JobDescription,
    InterviewProcess,
    Compensation,
    Checklist,
    Finalize,
    Done,
}

impl PipelineStep {
    /// The single total-order transition function.
    pub fn next(self) -> Self {
        match self {
            PipelineStep::Clarification => PipelineStep::MarketResearch,
            PipelineStep::MarketResearch => PipelineStep::JobDescription,
            PipelineStep::JobDescription => PipelineStep::InterviewProcess,
            PipelineStep::InterviewProcess => PipelineStep::Compensation,
            PipelineStep::Compensation => PipelineStep::Checklist,
            PipelineStep::Checklist => PipelineStep::Finalize,
            PipelineStep::Finalize | PipelineStep::Done => PipelineStep::Done,
        }
    }

    pub fn stage(self) -> Option<StageName> {
        match self {
            PipelineStep::Clarification => Some(StageName::Clarification),
            PipelineStep::MarketResearch => Some(StageName::MarketResearch),
            PipelineStep::JobDescription => Some(StageName::JobDescription),
            PipelineStep::InterviewProcess => Some(StageName::InterviewProcess),
            PipelineStep::Compensation => Some(StageName::Compensation),
            PipelineStep::Checklist => Some(StageName::Checklist),
            PipelineStep::Finalize | PipelineStep::Done => None,
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage() {
            Some(stage) => f.write_str(stage.as_str()),
            None if *self == PipelineStep::Finalize => f.write_str("finalize"),
            None => f.write_str("done"),
        }
    }
}

/// Shared record threaded through one pipeline run. Owned by that run only.
#[derive(Debug)]
pub struct PipelineState {
    pub user_input: String,
    pub company_context: Option<String>,
    pub session_id: String,
    pub current_step: PipelineStep,
    pub agents_used: Vec<String>,
    pub degraded: Vec<DegradedOutput>,
    pub clarifications: Option<ClarificationResult>,
    pub market_research: Option<MarketResearch>,
    pub job_descriptions: Option<JobDescriptionSet>,
    pub interview_process: Option<InterviewProcessSet>,
    pub compensation_packages: Option<CompensationSet>,
    pub hiring_checklist: Option<ChecklistSet>,
    pub plan: Option<HiringPlan>,
}

fn require<T>(value: &Option<T>, stage: StageName, missing: StageName) -> Result<&T, PipelineError> {
    value
        .as_ref()
        .ok_or(PipelineError::MissingUpstream { stage, missing })
}

impl PipelineState {
    pub fn new(user_input: &str, company_context: Option<&str>, session_id: &str) -> Self {
        Self {
            user_input: user_input.to_string(),
            company_context: company_context.map(str::to_string),
            session_id: session_id.to_string(),
            current_step: PipelineStep::Clarification,
            agents_used: Vec::new(),
            degraded: Vec::new(),
            clarifications: None,
            market_research: None,
            job_descriptions: None,
            interview_process: None,
            compensation_packages: None,
            hiring_checklist: None,
            plan: None,
        }
    }

    /// Books a finished stage and moves to the next step.
    fn complete_stage<T>(&mut self, stage: StageName, report: StageReport<T>) -> T {
        info!(
            "Stage {stage} finished for session {} ({} degraded)",
            self.session_id,
            report.degraded.len()
        );
        self.agents_used.push(stage.as_str().to_string());
        self.degraded.extend(report.degraded);
        self.current_step = self.current_step.next();
        report.output
    }

    /// Assembles the plan and enforces role-key consistency.
    pub fn finalize(&mut self) -> Result<(), PipelineError> {
        let missing = |stage| PipelineError::MissingUpstream {
            stage: StageName::Checklist,
            missing: stage,
        };
        let plan = HiringPlan {
            session_id: self.session_id.clone(),
            user_request: self.user_input.clone(),
            company_context: self.company_context.clone(),
            status: PlanStatus::Completed,
            agents_used: self.agents_used.clone(),
            created_at: Utc::now(),
            error: None,
            clarifications: self
                .clarifications
                .take()
                .ok_or_else(|| missing(StageName::Clarification))?,
            market_research: self
                .market_research
                .take()
                .ok_or_else(|| missing(StageName::MarketResearch))?,
            job_descriptions: self
                .job_descriptions
                .take()
                .ok_or_else(|| missing(StageName::JobDescription))?,
            interview_process: self
                .interview_process
                .take()
                .ok_or_else(|| missing(StageName::InterviewProcess))?,
            compensation_packages: self
                .compensation_packages
                .take()
                .ok_or_else(|| missing(StageName::Compensation))?,
            hiring_checklist: self
                .hiring_checklist
                .take()
                .ok_or_else(|| missing(StageName::Checklist))?,
            degraded_outputs: std::mem::take(&mut self.degraded),
        };

        plan.check_role_consistency()
            .map_err(PipelineError::InconsistentRoles)?;

        self.plan = Some(plan);
        self.current_step = self.current_step.next();
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct HiringOrchestrator {
    llm: Arc<dyn TextGenerator>,
    analytics: Arc<dyn AnalyticsSink>,
    clarification: ClarificationAgent,
    market_research: MarketResearchAgent,
    job_description: JobDescriptionAgent,
    interview_process: InterviewProcessAgent,
    compensation: CompensationAgent,
    checklist: ChecklistBuilderAgent,
}

impl HiringOrchestrator {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        search: Arc<dyn WebSearch>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            clarification: ClarificationAgent::new(llm.clone()),
            market_research: MarketResearchAgent::new(llm.clone(), search),
            job_description: JobDescriptionAgent::new(llm.clone()),
            interview_process: InterviewProcessAgent::new(llm.clone()),
            compensation: CompensationAgent::new(llm.clone()),
            checklist: ChecklistBuilderAgent::new(llm.clone()),
            llm,
            analytics,
        }
    }

    /// Builds a plan along the chosen path. Always returns a complete plan.
    pub async fn generate_plan(
        &self,
        user_input: &str,
        company_context: Option<&str>,
        session_id: &str,
        mode: PlanMode,
    ) -> HiringPlan {
        self.analytics
            .record(AnalyticsEvent::plan_started(session_id, user_input));

        let plan = match mode {
            PlanMode::Fast => build_plan(user_input, company_context, session_id),
            PlanMode::Agents => self.run(user_input, company_context, session_id).await,
        };

        info!(
            "Plan for session {session_id} built via {:?}: status={:?}, roles={:?}",
            mode,
            plan.status,
            plan.roles()
        );
        self.analytics
            .record(AnalyticsEvent::plan_completed(session_id, plan.status));
        plan
    }

    /// Runs the agent pipeline; on any step error returns the keyword plan
    /// tagged `fallback` with the triggering error attached.
    pub async fn run(
        &self,
        user_input: &str,
        company_context: Option<&str>,
        session_id: &str,
    ) -> HiringPlan {
        let mut state = PipelineState::new(user_input, company_context, session_id);

        match self.drive(&mut state).await {
            Ok(plan) => plan,
            Err(e) => {
                error!(
                    "Pipeline failed at {} for session {session_id}: {e}",
                    state.current_step
                );
                self.analytics
                    .record(AnalyticsEvent::error(Some(session_id), &e.to_string()));
                fallback_plan(user_input, company_context, session_id, &e)
            }
        }
    }

    async fn drive(&self, state: &mut PipelineState) -> Result<HiringPlan, PipelineError> {
        while state.current_step != PipelineStep::Done {
            self.advance(state).await?;
        }
        state.plan.take().ok_or(PipelineError::MissingUpstream {
            stage: StageName::Checklist,
            missing: StageName::Checklist,
        })
    }

    /// Executes the current step and moves the state to the next one.
    pub async fn advance(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let step = state.current_step;
        let Some(stage) = step.stage() else {
            if step == PipelineStep::Finalize {
                state.finalize()?;
            }
            return Ok(());
        };
        let generation = |source| PipelineError::Generation { stage, source };

        match step {
            PipelineStep::Clarification => {
                let report = self
                    .clarification
                    .process(&state.user_input, state.company_context.as_deref())
                    .await
                    .map_err(generation)?;
                state.clarifications = Some(state.complete_stage(stage, report));
            }
            PipelineStep::MarketResearch => {
                let clarifications =
                    require(&state.clarifications, stage, StageName::Clarification)?;
                let report = self
                    .market_research
                    .process(clarifications)
                    .await
                    .map_err(generation)?;
                state.market_research = Some(state.complete_stage(stage, report));
            }
            PipelineStep::JobDescription => {
                let inputs = JobDescriptionInputs {
                    clarifications: require(&state.clarifications, stage, StageName::Clarification)?
                        .clone(),
                    market_research: require(&state.market_research, stage, StageName::MarketResearch)?
                        .clone(),
                };
                let report = self
                    .job_description
                    .process(&inputs)
                    .await
                    .map_err(generation)?;
                state.job_descriptions = Some(state.complete_stage(stage, report));
            }
            PipelineStep::InterviewProcess => {
                let job_descriptions =
                    require(&state.job_descriptions, stage, StageName::JobDescription)?;
                let report = self
                    .interview_process
                    .process(job_descriptions)
                    .await
                    .map_err(generation)?;
                state.interview_process = Some(state.complete_stage(stage, report));
            }
            PipelineStep::Compensation => {
                let inputs = CompensationInputs {
                    market_research: require(&state.market_research, stage, StageName::MarketResearch)?
                        .clone(),
                    clarifications: require(&state.clarifications, stage, StageName::Clarification)?
                        .clone(),
                };
                let report = self
                    .compensation
                    .process(&inputs)
                    .await
                    .map_err(generation)?;
                state.compensation_packages = Some(state.complete_stage(stage, report));
            }
            PipelineStep::Checklist => {
                let inputs = ChecklistInputs {
                    job_descriptions: require(&state.job_descriptions, stage, StageName::JobDescription)?
                        .clone(),
                    interview_process: require(&state.interview_process, stage, StageName::InterviewProcess)?
                        .clone(),
                    compensation_packages: require(&state.compensation_packages, stage, StageName::Compensation)?
                        .clone(),
                };
                let report = self
                    .checklist
                    .process(&inputs)
                    .await
                    .map_err(generation)?;
                state.hiring_checklist = Some(state.complete_stage(stage, report));
            }
            PipelineStep::Finalize | PipelineStep::Done => {}
        }
        Ok(())
    }

    /// Answers one chat message in the context of the session's plan and
    /// recent exchanges. Never touches the session.
    pub async fn chat(&self, message: &str, session: &Session) -> Result<String, LlmError> {
        let plan = match &session.hiring_plan {
            Some(plan) => excerpt(plan, CHAT_PLAN_EXCERPT_CHARS),
            None => "No hiring plan has been generated yet.".to_string(),
        };
        let history = recent_exchanges(&session.messages);
        let system = fill_template(
            CHAT_SYSTEM_TEMPLATE,
            &[
                ("hiring_plan", plan.as_str()),
                ("recent_messages", history.as_str()),
            ],
        );

        generate_text(self.llm.as_ref(), &system, message).await
    }
}

fn recent_exchanges(messages: &[ChatExchange]) -> String {
    if messages.is_empty() {
        return "(none)".to_string();
    }
    messages[messages.len().saturating_sub(CHAT_HISTORY_EXCHANGES)..]
        .iter()
        .map(|m| format!("User: {}\nAssistant: {}", m.user_message, m.ai_response))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Keyword plan tagged as a circuit-breaker result.
pub fn fallback_plan(
    user_input: &str,
    company_context: Option<&str>,
    session_id: &str,
    cause: &PipelineError,
) -> HiringPlan {
    HiringPlan {
        status: PlanStatus::Fallback,
        agents_used: vec![FALLBACK_MARKER.to_string()],
        error: Some(cause.to_string()),
        ..build_plan(user_input, company_context, session_id)
    }
}
