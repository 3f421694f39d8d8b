//! Inter-stage data contracts for the hiring plan.
//!
//! Every stage output that varies per role is a `RoleMap`, keyed by the free-text
//! role label chosen upstream. Struct fields without `#[serde(default)]` are
//! required: a generation response missing one of them does not parse.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// RoleMap
// ────────────────────────────────────────────────────────────────────────────

/// Ordered mapping from role name to a stage-specific value.
///
/// Preserves insertion order; inserting an existing role replaces its value
/// in place. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for RoleMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RoleMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `role`, returning the previous value.
    pub fn insert(&mut self, role: impl Into<String>, value: T) -> Option<T> {
        let role = role.into();
        match self.entries.iter_mut().find(|(r, _)| *r == role) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((role, value));
                None
            }
        }
    }

    pub fn get(&self, role: &str) -> Option<&T> {
        self.entries.iter().find(|(r, _)| r == role).map(|(_, v)| v)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.as_str())
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles().map(str::to_string).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(r, v)| (r.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when both maps hold exactly the same role keys (order ignored).
    pub fn same_roles<U>(&self, other: &RoleMap<U>) -> bool {
        self.len() == other.len() && self.roles().all(|r| other.get(r).is_some())
    }
}

impl<T> FromIterator<(String, T)> for RoleMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = RoleMap::new();
        for (role, value) in iter {
            map.insert(role, value);
        }
        map
    }
}

impl<T> IntoIterator for RoleMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for RoleMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (role, value) in &self.entries {
            map.serialize_entry(role, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RoleMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RoleMapVisitor<T> {
            type Value = RoleMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map keyed by role name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = RoleMap::new();
                while let Some((role, value)) = access.next_entry::<String, T>()? {
                    map.insert(role, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RoleMapVisitor(PhantomData))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage names and plan status
// ────────────────────────────────────────────────────────────────────────────

/// The six generation stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Clarification,
    MarketResearch,
    JobDescription,
    InterviewProcess,
    Compensation,
    Checklist,
}

impl StageName {
    pub const ALL: [StageName; 6] = [
        StageName::Clarification,
        StageName::MarketResearch,
        StageName::JobDescription,
        StageName::InterviewProcess,
        StageName::Compensation,
        StageName::Checklist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Clarification => "clarification",
            StageName::MarketResearch => "market_research",
            StageName::JobDescription => "job_description",
            StageName::InterviewProcess => "interview_process",
            StageName::Compensation => "compensation",
            StageName::Checklist => "checklist",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Completed,
    Fallback,
}

/// A slice of the plan that was filled from a static fallback instead of a
/// parsed generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedOutput {
    pub stage: StageName,
    /// `None` for cross-role aggregates (budget analysis, master checklist).
    pub role: Option<String>,
    pub reason: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Clarification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    pub roles: Vec<String>,
    pub skills: Vec<String>,
    pub timeline: String,
    pub budget: String,
    pub company_stage: String,
    pub team_size: String,
    pub work_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationResult {
    pub extracted_info: ExtractedInfo,
    pub clarifying_questions: Vec<String>,
    pub assumptions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Market research
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRanges {
    pub entry: String,
    pub mid: String,
    pub senior: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMarketData {
    pub salary_ranges: SalaryRanges,
    pub key_skills: Vec<String>,
    pub market_demand: String,
    pub competition_level: String,
    pub hiring_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketResearch {
    pub roles_analyzed: Vec<String>,
    pub market_data: RoleMap<RoleMarketData>,
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Job descriptions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub summary: String,
    pub responsibilities: Vec<String>,
    pub required_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub what_we_offer: Vec<String>,
    pub application_process: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptionSet {
    pub job_descriptions: RoleMap<JobDescription>,
    pub posting_tips: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Interview process
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewStage {
    pub name: String,
    pub duration: String,
    pub format: String,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewProcess {
    pub stages: Vec<InterviewStage>,
    pub timeline: String,
    pub evaluation_criteria: Vec<String>,
    /// Question category (technical, behavioral, ...) → questions.
    pub sample_questions: BTreeMap<String, Vec<String>>,
    pub decision_process: String,
    pub logistics: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewProcessSet {
    pub interview_processes: RoleMap<InterviewProcess>,
    pub general_guidelines: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Compensation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSalary {
    pub range: String,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityGrant {
    pub range: String,
    pub vesting: String,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonuses {
    pub performance_bonus: String,
    pub signing_bonus: String,
    pub referral_bonus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationPackage {
    pub base_salary: BaseSalary,
    pub equity_percentage: EquityGrant,
    pub benefits: Vec<String>,
    pub bonuses: Bonuses,
    pub perks: Vec<String>,
    pub total_value_estimate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub total_annual_cost: String,
    pub budget_recommendations: Vec<String>,
    pub cost_optimization: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationSet {
    pub compensation_packages: RoleMap<CompensationPackage>,
    pub budget_analysis: BudgetAnalysis,
    pub negotiation_guidelines: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Checklists
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistTask {
    pub task: String,
    pub deadline: String,
    #[serde(alias = "responsible_party")]
    pub responsible: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistPhase {
    pub tasks: Vec<ChecklistTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleChecklist {
    pub pre_posting: ChecklistPhase,
    pub job_posting: ChecklistPhase,
    pub screening: ChecklistPhase,
    pub interviews: ChecklistPhase,
    pub decision_offer: ChecklistPhase,
    pub onboarding: ChecklistPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterChecklist {
    pub setup_phase: Vec<String>,
    pub execution_phase: Vec<String>,
    pub coordination_tasks: Vec<String>,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSet {
    pub role_checklists: RoleMap<RoleChecklist>,
    pub master_checklist: MasterChecklist,
    pub timeline_overview: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Hiring plan
// ────────────────────────────────────────────────────────────────────────────

/// The aggregate produced by one plan generation, from either path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringPlan {
    pub session_id: String,
    pub user_request: String,
    pub company_context: Option<String>,
    pub status: PlanStatus,
    pub agents_used: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Error that tripped the circuit breaker, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub clarifications: ClarificationResult,
    pub market_research: MarketResearch,
    pub job_descriptions: JobDescriptionSet,
    pub interview_process: InterviewProcessSet,
    pub compensation_packages: CompensationSet,
    pub hiring_checklist: ChecklistSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_outputs: Vec<DegradedOutput>,
}

/// Role keys that disagree between the role-keyed sub-records of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleKeyMismatch {
    pub section: &'static str,
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

impl HiringPlan {
    /// Roles the plan was built for, in job-description order.
    pub fn roles(&self) -> Vec<String> {
        self.job_descriptions.job_descriptions.role_names()
    }

    /// Checks that interview processes, compensation packages and checklists
    /// cover exactly the job-description roles, and that there is at least one.
    pub fn check_role_consistency(&self) -> Result<(), RoleKeyMismatch> {
        let jds = &self.job_descriptions.job_descriptions;
        let expected = jds.role_names();

        if jds.is_empty() {
            return Err(RoleKeyMismatch {
                section: "job_descriptions",
                expected,
                found: Vec::new(),
            });
        }

        let sections: [(&'static str, Vec<String>, bool); 3] = [
            (
                "interview_process",
                self.interview_process.interview_processes.role_names(),
                jds.same_roles(&self.interview_process.interview_processes),
            ),
            (
                "compensation_packages",
                self.compensation_packages.compensation_packages.role_names(),
                jds.same_roles(&self.compensation_packages.compensation_packages),
            ),
            (
                "hiring_checklist",
                self.hiring_checklist.role_checklists.role_names(),
                jds.same_roles(&self.hiring_checklist.role_checklists),
            ),
        ];

        for (section, found, consistent) in sections {
            if !consistent {
                return Err(RoleKeyMismatch {
                    section,
                    expected: expected.clone(),
                    found,
                });
            }
        }
        Ok(())
    }
}
