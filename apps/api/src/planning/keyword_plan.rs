//! Keyword plan builder — synthesizes a complete hiring plan from raw text
//! without any generation call.
//!
//! Pure and deterministic given its keyword tables: same input, same plan
//! (apart from `created_at` and `session_id`). Used as the fast path and as
//! the orchestrator's last-resort recovery.
//!
//! Matching is case-insensitive substring search; roles come out in table
//! order, not input order.

use chrono::{DateTime, Utc};

use crate::planning::models::{
    BaseSalary, Bonuses, BudgetAnalysis, ChecklistPhase, ChecklistSet, ChecklistTask,
    ClarificationResult, CompensationPackage, CompensationSet, EquityGrant, ExtractedInfo,
    HiringPlan, InterviewProcess, InterviewProcessSet, InterviewStage, JobDescription,
    JobDescriptionSet, MarketResearch, MasterChecklist, PlanStatus, RoleChecklist, RoleMap,
    RoleMarketData, SalaryRanges,
};

/// Marker placed in `agents_used` for plans built here.
pub const KEYWORD_PLANNER: &str = "keyword_planner";

pub const DEFAULT_ROLE: &str = "Software Engineer";

const ROLE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Software Engineer",
        &["software engineer", "engineer", "developer", "programmer"],
    ),
    (
        "Ai Engineer",
        &["ai engineer", "ml engineer", "machine learning", "genai", "ai"],
    ),
    (
        "Data Engineer",
        &["data engineer", "data scientist", "analytics"],
    ),
    ("Frontend Developer", &["frontend", "front-end", "ui developer"]),
    ("Backend Developer", &["backend", "back-end", "api developer"]),
    ("Product Manager", &["product manager", "pm", "product"]),
    ("Designer", &["designer", "ui/ux", "ux designer"]),
    ("Intern", &["intern", "internship", "junior"]),
];

const SKILL_KEYWORDS: &[(&str, &[&str])] = &[
    ("Python", &["python"]),
    ("Javascript", &["javascript", "js", "react", "node"]),
    (
        "Machine Learning",
        &["ml", "ai", "machine learning", "tensorflow", "pytorch"],
    ),
    ("Cloud", &["aws", "azure", "gcp", "cloud"]),
    ("Databases", &["sql", "database", "postgresql", "mongodb"]),
    ("Devops", &["docker", "kubernetes", "ci/cd", "devops"]),
];

const DEFAULT_SKILLS: [&str; 3] = ["Problem solving", "Communication", "Teamwork"];

const SENIOR_KEYWORDS: &[&str] = &["senior", "lead", "principal"];
const ENTRY_KEYWORDS: &[&str] = &["junior", "entry", "intern", "new grad"];
const ASAP_KEYWORDS: &[&str] = &["asap", "urgent", "immediately", "quickly"];
const SOON_KEYWORDS: &[&str] = &["soon", "fast"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
        }
    }

    /// (base salary range, equity range)
    fn pay_band(&self) -> (&'static str, &'static str) {
        match self {
            ExperienceLevel::Entry => ("$70k-100k", "0.1%-0.5%"),
            ExperienceLevel::Mid => ("$100k-150k", "0.05%-0.3%"),
            ExperienceLevel::Senior => ("$150k-220k", "0.02%-0.2%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Asap,
    Soon,
    Standard,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Asap => "ASAP",
            Urgency::Soon => "Soon",
            Urgency::Standard => "Standard",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

// ────────────────────────────────────────────────────────────────────────────
// Detection
// ────────────────────────────────────────────────────────────────────────────

/// Roles whose keyword list hits the input, in table order. No default.
pub fn matched_roles(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(role, _)| *role)
        .collect()
}

/// Matched roles, or `[DEFAULT_ROLE]` when nothing matches.
pub fn detect_roles(text: &str) -> Vec<String> {
    let roles = matched_roles(text);
    if roles.is_empty() {
        vec![DEFAULT_ROLE.to_string()]
    } else {
        roles.into_iter().map(str::to_string).collect()
    }
}

/// Senior keywords take precedence over entry keywords.
pub fn detect_experience_level(text: &str) -> ExperienceLevel {
    let lower = text.to_lowercase();
    if contains_any(&lower, SENIOR_KEYWORDS) {
        ExperienceLevel::Senior
    } else if contains_any(&lower, ENTRY_KEYWORDS) {
        ExperienceLevel::Entry
    } else {
        ExperienceLevel::Mid
    }
}

pub fn detect_urgency(text: &str) -> Urgency {
    let lower = text.to_lowercase();
    if contains_any(&lower, ASAP_KEYWORDS) {
        Urgency::Asap
    } else if contains_any(&lower, SOON_KEYWORDS) {
        Urgency::Soon
    } else {
        Urgency::Standard
    }
}

pub fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let skills: Vec<String> = SKILL_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(skill, _)| skill.to_string())
        .collect();
    if skills.is_empty() {
        DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}

/// Company stage from the first matching marker in `company_context`.
///
/// "pre-seed" is checked before "seed": a pre-seed context yields "Pre-seed",
/// never "Seed stage".
pub fn extract_company_stage(company_context: Option<&str>) -> String {
    let lower = company_context.unwrap_or_default().to_lowercase();
    let stage = if lower.contains("series a") {
        "Series A"
    } else if lower.contains("series b") {
        "Series B"
    } else if lower.contains("pre-seed") {
        "Pre-seed"
    } else if lower.contains("seed") {
        "Seed stage"
    } else {
        "Early-stage startup"
    };
    stage.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Per-role templates
// ────────────────────────────────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn market_data_for(role: &str) -> RoleMarketData {
    match role {
        "Ai Engineer" => RoleMarketData {
            salary_ranges: SalaryRanges {
                entry: "$90k-130k".to_string(),
                mid: "$130k-180k".to_string(),
                senior: "$180k-280k".to_string(),
            },
            key_skills: strings(&[
                "Python",
                "TensorFlow/PyTorch",
                "Machine Learning",
                "Statistics",
            ]),
            market_demand: "Extremely High".to_string(),
            competition_level: "Very High".to_string(),
            hiring_tips: strings(&[
                "Highlight AI projects",
                "Research opportunities",
                "Cutting-edge technology",
            ]),
        },
        // Software Engineer data doubles as the generic default.
        _ => RoleMarketData {
            salary_ranges: SalaryRanges {
                entry: "$70k-100k".to_string(),
                mid: "$100k-150k".to_string(),
                senior: "$150k-220k".to_string(),
            },
            key_skills: strings(&[
                "Python/JavaScript",
                "System Design",
                "Problem Solving",
                "Git",
            ]),
            market_demand: "Very High".to_string(),
            competition_level: "High".to_string(),
            hiring_tips: strings(&[
                "Emphasize growth opportunities",
                "Competitive tech stack",
                "Strong engineering culture",
            ]),
        },
    }
}

fn job_description_for(role: &str, level: ExperienceLevel) -> JobDescription {
    let lower = role.to_lowercase();
    JobDescription {
        title: format!("{role} - Join Our Growing Team"),
        summary: format!(
            "We're looking for a talented {lower} to help build innovative solutions and grow with our team."
        ),
        responsibilities: vec![
            format!("Develop and maintain {lower} solutions"),
            "Collaborate with cross-functional teams".to_string(),
            "Write clean, efficient, and maintainable code".to_string(),
            "Participate in code reviews and technical discussions".to_string(),
            "Contribute to product strategy and technical decisions".to_string(),
        ],
        required_qualifications: vec![
            format!("{} experience in {lower} role", level.label()),
            "Strong problem-solving and analytical skills".to_string(),
            "Excellent communication and teamwork abilities".to_string(),
            "Experience with modern development practices".to_string(),
            "Bachelor's degree or equivalent experience".to_string(),
        ],
        preferred_qualifications: strings(&[
            "Startup or fast-paced environment experience",
            "Leadership or mentoring experience",
            "Open source contributions",
            "Advanced degree in relevant field",
        ]),
        what_we_offer: strings(&[
            "Competitive salary and equity package",
            "Flexible work arrangements",
            "Professional development opportunities",
            "Health and wellness benefits",
            "Collaborative and innovative culture",
        ]),
        application_process: "Send your resume and cover letter. We'll review applications on a rolling basis and reach out to qualified candidates.".to_string(),
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

fn interview_process_for(role: &str) -> InterviewProcess {
    let lower = role.to_lowercase();
    InterviewProcess {
        stages: vec![
            interview_stage(
                "Initial Screen",
                "30 minutes",
                "Phone/Video",
                "Basic qualifications and interest",
            ),
            interview_stage(
                "Technical Interview",
                "60 minutes",
                "Video with coding",
                "Technical skills and problem-solving",
            ),
            interview_stage(
                "Team Interview",
                "45 minutes",
                "Video with team",
                "Collaboration and culture fit",
            ),
            interview_stage(
                "Final Interview",
                "30 minutes",
                "Video with leadership",
                "Vision alignment and questions",
            ),
        ],
        timeline: "2-3 weeks from application to decision".to_string(),
        evaluation_criteria: strings(&[
            "Technical competency",
            "Cultural fit",
            "Communication skills",
            "Growth potential",
            "Problem-solving approach",
        ]),
        sample_questions: [
            (
                "technical".to_string(),
                vec![
                    format!("Walk us through your approach to a {lower} challenge"),
                    "How would you handle scalability issues?".to_string(),
                    "Describe a complex project you worked on".to_string(),
                ],
            ),
            (
                "behavioral".to_string(),
                strings(&[
                    "Tell us about a time you had to learn something quickly",
                    "How do you handle feedback?",
                    "Describe your ideal work environment",
                ]),
            ),
            (
                "cultural".to_string(),
                strings(&[
                    "What motivates you in your work?",
                    "How do you approach collaboration?",
                    "What are your career goals?",
                ]),
            ),
        ]
        .into_iter()
        .collect(),
        decision_process: "Collaborative decision with input from all interviewers and hiring manager".to_string(),
        logistics: "All interviews will be scheduled through our HR team with clear communication about expectations".to_string(),
    }
}

fn compensation_for(role: &str, level: ExperienceLevel) -> CompensationPackage {
    let (base, equity) = level.pay_band();
    CompensationPackage {
        base_salary: BaseSalary {
            range: base.to_string(),
            justification: format!("Market competitive for {} {role}", level.label()),
        },
        equity_percentage: EquityGrant {
            range: equity.to_string(),
            vesting: "4 years with 1-year cliff".to_string(),
            justification: "Startup equity to align with company growth".to_string(),
        },
        benefits: strings(&[
            "Health insurance (medical, dental, vision)",
            "401(k) retirement plan with company matching",
            "Paid time off and holidays",
            "Professional development budget ($2,000/year)",
            "Flexible work arrangements",
        ]),
        bonuses: Bonuses {
            performance_bonus: "Up to 15% of base salary annually".to_string(),
            signing_bonus: "Negotiable based on candidate situation".to_string(),
            referral_bonus: "$2,000 for successful referrals".to_string(),
        },
        perks: strings(&[
            "Flexible working hours",
            "Remote work options",
            "Modern equipment and tools",
            "Team building activities and events",
            "Learning and conference budget",
        ]),
        total_value_estimate: format!("Total compensation package worth {base} plus equity upside"),
    }
}

fn task(task: &str, deadline: &str, responsible: &str) -> ChecklistTask {
    ChecklistTask {
        task: task.to_string(),
        deadline: deadline.to_string(),
        responsible: responsible.to_string(),
    }
}

fn checklist_for(role: &str) -> RoleChecklist {
    RoleChecklist {
        pre_posting: ChecklistPhase {
            tasks: vec![
                task(&format!("Finalize {role} job description"), "Day 1", "Hiring Manager"),
                task("Set up interview panel and process", "Day 2", "HR"),
                task("Prepare technical assessment materials", "Day 3", "Technical Team"),
            ],
        },
        job_posting: ChecklistPhase {
            tasks: vec![
                task("Post on primary job boards (LinkedIn, Indeed)", "Day 4", "HR"),
                task("Share on company social media", "Day 4", "Marketing"),
                task("Reach out to professional networks", "Day 5", "Team"),
            ],
        },
        screening: ChecklistPhase {
            tasks: vec![
                task("Review and screen applications", "Ongoing", "HR + Hiring Manager"),
                task("Conduct initial phone screens", "Week 2", "HR"),
                task("Technical assessments", "Week 2-3", "Technical Team"),
            ],
        },
        interviews: ChecklistPhase {
            tasks: vec![
                task("Schedule interview rounds", "Week 3", "HR"),
                task("Conduct team interviews", "Week 3-4", "Interview Panel"),
                task("Collect and compile feedback", "Week 4", "HR"),
            ],
        },
        decision_offer: ChecklistPhase {
            tasks: vec![
                task("Make final hiring decision", "Week 4", "Hiring Manager"),
                task("Prepare and approve offer letter", "Week 4", "HR + Leadership"),
                task("Extend offer to candidate", "Week 4", "Hiring Manager"),
            ],
        },
        onboarding: ChecklistPhase {
            tasks: vec![
                task("Prepare onboarding materials and schedule", "Before start date", "HR"),
                task("Set up workspace and equipment", "Before start date", "IT"),
                task(
                    "Schedule first week meetings and introductions",
                    "Before start date",
                    "Hiring Manager",
                ),
            ],
        },
    }
}

fn per_role<T>(roles: &[String], make: impl Fn(&str) -> T) -> RoleMap<T> {
    roles
        .iter()
        .map(|role| (role.clone(), make(role)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Plan assembly
// ────────────────────────────────────────────────────────────────────────────

pub fn build_plan(user_input: &str, company_context: Option<&str>, session_id: &str) -> HiringPlan {
    build_plan_at(user_input, company_context, session_id, Utc::now())
}

pub fn build_plan_at(
    user_input: &str,
    company_context: Option<&str>,
    session_id: &str,
    created_at: DateTime<Utc>,
) -> HiringPlan {
    let roles = detect_roles(user_input);
    let level = detect_experience_level(user_input);
    let urgency = detect_urgency(user_input);
    let role_count = roles.len();

    let clarifications = ClarificationResult {
        extracted_info: ExtractedInfo {
            roles: roles.clone(),
            skills: extract_skills(user_input),
            timeline: urgency.label().to_string(),
            budget: "Competitive".to_string(),
            company_stage: extract_company_stage(company_context),
            team_size: "Growing team".to_string(),
            work_mode: "Flexible".to_string(),
        },
        clarifying_questions: strings(&[
            "What is your specific budget range for these positions?",
            "What are the most important technical skills for your team?",
            "Do you prefer remote, hybrid, or onsite work arrangements?",
            "What is your ideal timeline for completing these hires?",
            "Are there any specific company culture aspects candidates should know?",
        ]),
        assumptions: strings(&[
            "Assuming startup environment with growth opportunities",
            "Assuming competitive compensation is important",
            "Assuming modern tech stack and practices",
            "Assuming collaborative team environment",
        ]),
    };

    let market_research = MarketResearch {
        roles_analyzed: roles.clone(),
        market_data: per_role(&roles, market_data_for),
        summary: format!(
            "Market analysis shows strong demand for {} roles with competitive salaries and benefits needed to attract top talent.",
            roles.join(", ")
        ),
    };

    let job_descriptions = JobDescriptionSet {
        job_descriptions: per_role(&roles, |role| job_description_for(role, level)),
        posting_tips: "Post on multiple platforms, emphasize growth opportunities, highlight company mission and impact.".to_string(),
    };

    let interview_process = InterviewProcessSet {
        interview_processes: per_role(&roles, interview_process_for),
        general_guidelines: "Ensure consistent evaluation criteria, provide good candidate experience, minimize bias in decision making.".to_string(),
    };

    let compensation_packages = CompensationSet {
        compensation_packages: per_role(&roles, |role| compensation_for(role, level)),
        budget_analysis: BudgetAnalysis {
            total_annual_cost: format!(
                "${}k - ${}k estimated total",
                role_count * 120,
                role_count * 180
            ),
            budget_recommendations: strings(&[
                "Consider equity to offset base salary",
                "Flexible benefits package",
                "Performance bonuses",
            ]),
            cost_optimization: strings(&[
                "Negotiate based on candidate priorities",
                "Offer growth opportunities",
                "Competitive equity packages",
            ]),
        },
        negotiation_guidelines: "Be transparent about compensation philosophy, understand candidate priorities, have flexibility in package structure.".to_string(),
    };

    let hiring_checklist = ChecklistSet {
        role_checklists: per_role(&roles, checklist_for),
        master_checklist: MasterChecklist {
            setup_phase: strings(&[
                "Define hiring goals",
                "Set budget",
                "Prepare job descriptions",
                "Set up interview process",
            ]),
            execution_phase: strings(&[
                "Post jobs",
                "Screen candidates",
                "Conduct interviews",
                "Make decisions",
            ]),
            coordination_tasks: strings(&[
                "Weekly team meetings",
                "Candidate tracking",
                "Feedback collection",
            ]),
            milestones: strings(&[
                "Week 1: Jobs posted",
                "Week 2: Initial interviews",
                "Week 4: Final decisions",
                "Week 6: Onboarding",
            ]),
        },
        timeline_overview: format!(
            "Expected timeline: {} hiring process with {role_count} role(s) to fill. Estimated 4-6 weeks from job posting to hire.",
            urgency.label().to_lowercase()
        ),
    };

    HiringPlan {
        session_id: session_id.to_string(),
        user_request: user_input.to_string(),
        company_context: company_context.map(str::to_string),
        status: PlanStatus::Completed,
        agents_used: vec![KEYWORD_PLANNER.to_string()],
        created_at,
        error: None,
        clarifications,
        market_research,
        job_descriptions,
        interview_process,
        compensation_packages,
        hiring_checklist,
        degraded_outputs: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FOUNDING_REQUEST: &str = "I need to hire a founding engineer and a GenAI intern ASAP";

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_founding_engineer_and_genai_intern_scenario() {
        let plan = build_plan(FOUNDING_REQUEST, None, "session-1");

        let expected = vec!["Software Engineer", "Ai Engineer", "Intern"];
        assert_eq!(plan.clarifications.extracted_info.roles, expected);
        assert_eq!(plan.clarifications.extracted_info.timeline, "ASAP");
        assert_eq!(detect_experience_level(FOUNDING_REQUEST), ExperienceLevel::Entry);
        assert_eq!(detect_urgency(FOUNDING_REQUEST), Urgency::Asap);

        assert_eq!(plan.job_descriptions.job_descriptions.role_names(), expected);
        assert_eq!(plan.interview_process.interview_processes.role_names(), expected);
        assert_eq!(plan.compensation_packages.compensation_packages.role_names(), expected);
        assert_eq!(plan.hiring_checklist.role_checklists.role_names(), expected);

        for role in &expected {
            let jd = plan.job_descriptions.job_descriptions.get(role).unwrap();
            assert!(jd.required_qualifications[0].starts_with("Entry Level"));
            let interview = plan.interview_process.interview_processes.get(role).unwrap();
            assert_eq!(interview.stages.len(), 4);
            let comp = plan.compensation_packages.compensation_packages.get(role).unwrap();
            assert_eq!(comp.base_salary.range, "$70k-100k");
            assert!(!plan.hiring_checklist.role_checklists.get(role).unwrap().onboarding.tasks.is_empty());
        }
        assert!(plan.check_role_consistency().is_ok());
    }

    #[test]
    fn test_no_role_keywords_defaults_to_software_engineer() {
        assert!(matched_roles("We want to grow the team").is_empty());
        assert_eq!(detect_roles("We want to grow the team"), vec![DEFAULT_ROLE]);
    }

    #[test]
    fn test_role_detection_is_case_insensitive_and_in_table_order() {
        let roles = detect_roles("DESIGNER first, then a Backend person");
        assert_eq!(roles, vec!["Backend Developer", "Designer"]);
    }

    #[test]
    fn test_role_detection_is_monotonic_under_added_keywords() {
        let bases = [
            "hire a designer",
            "looking for a backend developer",
            "need an analytics lead and a product manager",
        ];
        for base in bases {
            let before = matched_roles(base);
            for (_, keywords) in ROLE_KEYWORDS {
                for keyword in *keywords {
                    let extended = format!("{base} and {keyword}");
                    let after = matched_roles(&extended);
                    for role in &before {
                        assert!(
                            after.contains(role),
                            "adding '{keyword}' to '{base}' dropped {role}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_senior_wins_over_entry() {
        assert_eq!(
            detect_experience_level("a senior engineer and a junior one"),
            ExperienceLevel::Senior
        );
        assert_eq!(detect_experience_level("a new grad"), ExperienceLevel::Entry);
        assert_eq!(detect_experience_level("an engineer"), ExperienceLevel::Mid);
    }

    #[test]
    fn test_urgency_buckets() {
        assert_eq!(detect_urgency("we need this urgent"), Urgency::Asap);
        assert_eq!(detect_urgency("hiring soon"), Urgency::Soon);
        assert_eq!(detect_urgency("whenever"), Urgency::Standard);
    }

    #[test]
    fn test_skill_extraction_with_default() {
        assert_eq!(
            extract_skills("Python and Postgresql on AWS"),
            vec!["Python", "Cloud", "Databases"]
        );
        assert_eq!(
            extract_skills("someone nice"),
            vec!["Problem solving", "Communication", "Teamwork"]
        );
    }

    #[test]
    fn test_company_stage_extraction() {
        assert_eq!(extract_company_stage(Some("")), "Early-stage startup");
        assert_eq!(extract_company_stage(None), "Early-stage startup");
        assert_eq!(extract_company_stage(Some("We raised our Series A")), "Series A");
        assert_eq!(extract_company_stage(Some("series b, 40 people")), "Series B");
        assert_eq!(extract_company_stage(Some("pre-seed, 3 founders")), "Pre-seed");
        assert_eq!(extract_company_stage(Some("Seed round closed")), "Seed stage");
    }

    #[test]
    fn test_empty_company_context_in_plan() {
        let plan = build_plan("hire a designer", Some(""), "s");
        assert_eq!(
            plan.clarifications.extracted_info.company_stage,
            "Early-stage startup"
        );
        assert_eq!(plan.company_context.as_deref(), Some(""));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build_plan_at(FOUNDING_REQUEST, Some("Seed"), "a", fixed_time());
        let b = build_plan_at(FOUNDING_REQUEST, Some("Seed"), "a", fixed_time());
        assert_eq!(a, b);

        let mut c = build_plan(FOUNDING_REQUEST, Some("Seed"), "other");
        c.session_id = a.session_id.clone();
        c.created_at = a.created_at;
        assert_eq!(a, c);
    }

    #[test]
    fn test_unknown_role_uses_generic_market_data() {
        let plan = build_plan("hire a designer", None, "s");
        let data = plan.market_research.market_data.get("Designer").unwrap();
        assert_eq!(data.market_demand, "Very High");
    }

    #[test]
    fn test_plan_markers_and_budget() {
        let plan = build_plan("a designer and a product manager", None, "s");
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.agents_used, vec![KEYWORD_PLANNER]);
        assert!(plan.error.is_none());
        assert_eq!(
            plan.compensation_packages.budget_analysis.total_annual_cost,
            "$240k - $360k estimated total"
        );
        assert!(plan
            .hiring_checklist
            .timeline_overview
            .contains("standard hiring process with 2 role(s)"));
    }
}
