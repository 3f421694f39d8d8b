//! Checklist stage: a six-phase checklist per role, a master checklist across
//! roles and a free-text timeline overview.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::models::{
    ChecklistPhase, ChecklistSet, ChecklistTask, CompensationSet, InterviewProcessSet,
    JobDescriptionSet, MasterChecklist, RoleChecklist, StageName,
};
use crate::planning::prompts::{
    CHECKLIST_PROMPT_TEMPLATE, CHECKLIST_SYSTEM, MASTER_CHECKLIST_PROMPT_TEMPLATE,
    MASTER_CHECKLIST_SYSTEM, TIMELINE_PROMPT_TEMPLATE, TIMELINE_SYSTEM,
};
use crate::planning::stage::{
    excerpt, fill_template, generate_structured, generate_text, json_system, process_roles,
    settle_aggregate, settle_roles, text_system, RoleAgent, StageOutcome, StageReport,
};

const ROLE_EXCERPT_CHARS: usize = 800;
const MASTER_EXCERPT_CHARS: usize = 1500;
const TIMELINE_EXCERPT_CHARS: usize = 1000;

/// Declared inputs of the checklist stage.
pub struct ChecklistInputs {
    pub job_descriptions: JobDescriptionSet,
    pub interview_process: InterviewProcessSet,
    pub compensation_packages: CompensationSet,
}

pub struct ChecklistBuilderAgent {
    llm: Arc<dyn TextGenerator>,
}

impl ChecklistBuilderAgent {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn process(
        &self,
        inputs: &ChecklistInputs,
    ) -> Result<StageReport<ChecklistSet>, LlmError> {
        let roles = inputs.job_descriptions.job_descriptions.role_names();
        let outcomes = process_roles(self, &roles, inputs).await?;

        let mut degraded = Vec::new();
        let role_checklists = settle_roles(self.stage(), outcomes, &mut degraded);

        let master_outcome = generate_structured(
            self.llm.as_ref(),
            &json_system(MASTER_CHECKLIST_SYSTEM),
            &MASTER_CHECKLIST_PROMPT_TEMPLATE.replace(
                "{role_checklists}",
                &excerpt(&role_checklists, MASTER_EXCERPT_CHARS),
            ),
            fallback_master_checklist,
        )
        .await?;
        let master_checklist = settle_aggregate(self.stage(), master_outcome, &mut degraded);

        let timeline_overview = generate_text(
            self.llm.as_ref(),
            &text_system(TIMELINE_SYSTEM),
            &TIMELINE_PROMPT_TEMPLATE.replace(
                "{role_checklists}",
                &excerpt(&role_checklists, TIMELINE_EXCERPT_CHARS),
            ),
        )
        .await?;

        Ok(StageReport {
            output: ChecklistSet {
                role_checklists,
                master_checklist,
                timeline_overview,
            },
            degraded,
        })
    }
}

#[async_trait]
impl RoleAgent for ChecklistBuilderAgent {
    type Upstream = ChecklistInputs;
    type Output = RoleChecklist;

    fn stage(&self) -> StageName {
        StageName::Checklist
    }

    async fn process_role(
        &self,
        role: &str,
        inputs: &ChecklistInputs,
    ) -> Result<StageOutcome<RoleChecklist>, LlmError> {
        let job_description = excerpt(
            &inputs.job_descriptions.job_descriptions.get(role),
            ROLE_EXCERPT_CHARS,
        );
        let interview_process = excerpt(
            &inputs.interview_process.interview_processes.get(role),
            ROLE_EXCERPT_CHARS,
        );
        let compensation = excerpt(
            &inputs.compensation_packages.compensation_packages.get(role),
            ROLE_EXCERPT_CHARS,
        );

        let prompt = fill_template(
            CHECKLIST_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("job_description", job_description.as_str()),
                ("interview_process", interview_process.as_str()),
                ("compensation", compensation.as_str()),
            ],
        );

        generate_structured(
            self.llm.as_ref(),
            &json_system(CHECKLIST_SYSTEM),
            &prompt,
            fallback_role_checklist,
        )
        .await
    }
}

fn phase(tasks: &[(&str, &str, &str)]) -> ChecklistPhase {
    ChecklistPhase {
        tasks: tasks
            .iter()
            .map(|(task, deadline, responsible)| ChecklistTask {
                task: task.to_string(),
                deadline: deadline.to_string(),
                responsible: responsible.to_string(),
            })
            .collect(),
    }
}

pub fn fallback_role_checklist() -> RoleChecklist {
    RoleChecklist {
        pre_posting: phase(&[
            ("Finalize job description", "Day 1", "HR"),
            ("Set up interview panel", "Day 2", "Hiring Manager"),
            ("Prepare interview materials", "Day 3", "HR"),
        ]),
        job_posting: phase(&[
            ("Post on job boards", "Day 4", "HR"),
            ("Share on social media", "Day 4", "Marketing"),
            ("Reach out to network", "Day 5", "Team"),
        ]),
        screening: phase(&[
            ("Review applications", "Ongoing", "HR"),
            ("Conduct phone screens", "Week 2-3", "HR"),
            ("Technical assessments", "Week 2-3", "Technical Team"),
        ]),
        interviews: phase(&[
            ("Schedule interviews", "Week 3-4", "HR"),
            ("Conduct interviews", "Week 3-4", "Interview Panel"),
            ("Collect feedback", "Week 4", "HR"),
        ]),
        decision_offer: phase(&[
            ("Make hiring decision", "Week 4", "Hiring Manager"),
            ("Prepare offer letter", "Week 4", "HR"),
            ("Extend offer", "Week 4", "Hiring Manager"),
        ]),
        onboarding: phase(&[
            ("Prepare onboarding materials", "Before start date", "HR"),
            ("Set up workspace", "Before start date", "IT"),
            ("Schedule first week meetings", "Before start date", "Manager"),
        ]),
    }
}

pub fn fallback_master_checklist() -> MasterChecklist {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    MasterChecklist {
        setup_phase: owned(&[
            "Define hiring goals and priorities",
            "Allocate budget and resources",
            "Set up hiring infrastructure",
            "Train interview team",
        ]),
        execution_phase: owned(&[
            "Launch job postings simultaneously",
            "Coordinate screening processes",
            "Manage interview schedules",
            "Track candidate pipeline",
        ]),
        coordination_tasks: owned(&[
            "Weekly hiring team meetings",
            "Candidate experience monitoring",
            "Budget tracking and reporting",
            "Process optimization",
        ]),
        milestones: owned(&[
            "Week 1: All job postings live",
            "Week 2: First round of interviews",
            "Week 4: Initial offers extended",
            "Week 6: New hires onboarded",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::compensation::{fallback_budget_analysis, fallback_compensation_package};
    use crate::planning::interview::fallback_interview_process;
    use crate::planning::job_description::fallback_job_description;
    use crate::test_support::{FailingGenerator, GarbageGenerator, ScriptedGenerator};

    fn inputs(roles: &[&str]) -> ChecklistInputs {
        ChecklistInputs {
            job_descriptions: JobDescriptionSet {
                job_descriptions: roles
                    .iter()
                    .map(|r| (r.to_string(), fallback_job_description(r)))
                    .collect(),
                posting_tips: String::new(),
            },
            interview_process: InterviewProcessSet {
                interview_processes: roles
                    .iter()
                    .map(|r| (r.to_string(), fallback_interview_process()))
                    .collect(),
                general_guidelines: String::new(),
            },
            compensation_packages: CompensationSet {
                compensation_packages: roles
                    .iter()
                    .map(|r| (r.to_string(), fallback_compensation_package(None)))
                    .collect(),
                budget_analysis: fallback_budget_analysis(),
                negotiation_guidelines: String::new(),
            },
        }
    }

    fn checklist_json() -> String {
        let phase = r#"{"tasks": [{"task": "Do it", "deadline": "Day 1", "responsible_party": "CEO"}]}"#;
        format!(
            r#"{{"pre_posting": {phase}, "job_posting": {phase}, "screening": {phase},
                "interviews": {phase}, "decision_offer": {phase}, "onboarding": {phase}}}"#
        )
    }

    #[tokio::test]
    async fn test_role_checklists_follow_job_description_keys() {
        let llm = ScriptedGenerator::new(|system, prompt| {
            if system.starts_with(MASTER_CHECKLIST_SYSTEM) {
                r#"{"setup_phase": ["a"], "execution_phase": ["b"], "coordination_tasks": ["c"], "milestones": ["d"]}"#.to_string()
            } else if system.starts_with(TIMELINE_SYSTEM) {
                "Six weeks.".to_string()
            } else {
                assert!(prompt.contains("Job Description:"));
                checklist_json()
            }
        });
        let agent = ChecklistBuilderAgent::new(Arc::new(llm));

        let report = agent.process(&inputs(&["Designer", "Intern"])).await.unwrap();

        let output = report.output;
        assert_eq!(output.role_checklists.role_names(), vec!["Designer", "Intern"]);
        let designer = output.role_checklists.get("Designer").unwrap();
        assert_eq!(designer.onboarding.tasks[0].responsible, "CEO");
        assert_eq!(output.master_checklist.milestones, vec!["d"]);
        assert_eq!(output.timeline_overview, "Six weeks.");
        assert!(report.degraded.is_empty());
    }

    #[tokio::test]
    async fn test_role_prompts_are_bounded_excerpts() {
        let llm = Arc::new(ScriptedGenerator::new(|system, prompt| {
            if system.starts_with(CHECKLIST_SYSTEM) {
                // three excerpts plus the fixed template
                assert!(prompt.chars().count() < 3 * ROLE_EXCERPT_CHARS + CHECKLIST_PROMPT_TEMPLATE.len() + 64);
            }
            "not json".to_string()
        }));
        let agent = ChecklistBuilderAgent::new(llm.clone());

        agent.process(&inputs(&["Software Engineer"])).await.unwrap();
        // one role call, master checklist, timeline
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn test_unparseable_responses_yield_declared_fallbacks() {
        let agent = ChecklistBuilderAgent::new(Arc::new(GarbageGenerator));

        let report = agent.process(&inputs(&["Designer"])).await.unwrap();

        assert_eq!(
            report.output.role_checklists.get("Designer"),
            Some(&fallback_role_checklist())
        );
        assert_eq!(report.output.master_checklist, fallback_master_checklist());
        assert_eq!(report.degraded.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let agent = ChecklistBuilderAgent::new(Arc::new(FailingGenerator));
        assert!(agent.process(&inputs(&["Designer"])).await.is_err());
    }
}
