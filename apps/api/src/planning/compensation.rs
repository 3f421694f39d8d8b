//! Compensation stage: a package per market-data role, a cross-role budget
//! analysis and free-text negotiation guidelines.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::models::{
    BaseSalary, Bonuses, BudgetAnalysis, ClarificationResult, CompensationPackage,
    CompensationSet, EquityGrant, MarketResearch, RoleMarketData, StageName,
};
use crate::planning::prompts::{
    BUDGET_ANALYSIS_PROMPT_TEMPLATE, BUDGET_ANALYSIS_SYSTEM, COMPENSATION_PROMPT_TEMPLATE,
    COMPENSATION_SYSTEM, NEGOTIATION_PROMPT, NEGOTIATION_SYSTEM,
};
use crate::planning::stage::{
    excerpt, fill_template, generate_structured, generate_text, json_system, process_roles,
    settle_aggregate, settle_roles, text_system, RoleAgent, StageOutcome, StageReport,
};

const DEFAULT_BASE_RANGE: &str = "$100k-150k";
const BUDGET_EXCERPT_CHARS: usize = 2000;

/// Declared inputs of the compensation stage.
pub struct CompensationInputs {
    pub market_research: MarketResearch,
    pub clarifications: ClarificationResult,
}

pub struct CompensationAgent {
    llm: Arc<dyn TextGenerator>,
}

impl CompensationAgent {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn process(
        &self,
        inputs: &CompensationInputs,
    ) -> Result<StageReport<CompensationSet>, LlmError> {
        let roles = inputs.market_research.market_data.role_names();
        let outcomes = process_roles(self, &roles, inputs).await?;

        let mut degraded = Vec::new();
        let compensation_packages = settle_roles(self.stage(), outcomes, &mut degraded);

        let packages_excerpt = excerpt(&compensation_packages, BUDGET_EXCERPT_CHARS);
        let extracted_info = excerpt(&inputs.clarifications.extracted_info, usize::MAX);
        let budget_prompt = fill_template(
            BUDGET_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("compensation_packages", packages_excerpt.as_str()),
                ("extracted_info", extracted_info.as_str()),
            ],
        );
        let budget_outcome = generate_structured(
            self.llm.as_ref(),
            &json_system(BUDGET_ANALYSIS_SYSTEM),
            &budget_prompt,
            fallback_budget_analysis,
        )
        .await?;
        let budget_analysis = settle_aggregate(self.stage(), budget_outcome, &mut degraded);

        let negotiation_guidelines = generate_text(
            self.llm.as_ref(),
            &text_system(NEGOTIATION_SYSTEM),
            NEGOTIATION_PROMPT,
        )
        .await?;

        Ok(StageReport {
            output: CompensationSet {
                compensation_packages,
                budget_analysis,
                negotiation_guidelines,
            },
            degraded,
        })
    }
}

#[async_trait]
impl RoleAgent for CompensationAgent {
    type Upstream = CompensationInputs;
    type Output = CompensationPackage;

    fn stage(&self) -> StageName {
        StageName::Compensation
    }

    async fn process_role(
        &self,
        role: &str,
        inputs: &CompensationInputs,
    ) -> Result<StageOutcome<CompensationPackage>, LlmError> {
        let market = inputs.market_research.market_data.get(role);
        let info = &inputs.clarifications.extracted_info;

        let salary_ranges = market
            .map(|m| excerpt(&m.salary_ranges, usize::MAX))
            .unwrap_or_else(|| "Unknown".to_string());

        let prompt = fill_template(
            COMPENSATION_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("salary_ranges", salary_ranges.as_str()),
                (
                    "market_demand",
                    market.map(|m| m.market_demand.as_str()).unwrap_or("Moderate"),
                ),
                (
                    "competition_level",
                    market
                        .map(|m| m.competition_level.as_str())
                        .unwrap_or("Moderate"),
                ),
                ("budget", info.budget.as_str()),
                ("company_stage", info.company_stage.as_str()),
                ("team_size", info.team_size.as_str()),
            ],
        );

        generate_structured(
            self.llm.as_ref(),
            &json_system(COMPENSATION_SYSTEM),
            &prompt,
            || fallback_compensation_package(market),
        )
        .await
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Static package whose base range is the role's market `mid` salary.
pub fn fallback_compensation_package(market: Option<&RoleMarketData>) -> CompensationPackage {
    let base_range = market
        .map(|m| m.salary_ranges.mid.clone())
        .unwrap_or_else(|| DEFAULT_BASE_RANGE.to_string());

    CompensationPackage {
        base_salary: BaseSalary {
            range: base_range,
            justification: "Market competitive based on role and experience".to_string(),
        },
        equity_percentage: EquityGrant {
            range: "0.1% - 1.0%".to_string(),
            vesting: "4 years with 1-year cliff".to_string(),
            justification: "Startup equity to align with company growth".to_string(),
        },
        benefits: owned(&[
            "Health insurance (medical, dental, vision)",
            "Retirement plan (401k with matching)",
            "Paid time off (vacation, sick, personal)",
            "Professional development budget",
            "Flexible work arrangements",
        ]),
        bonuses: Bonuses {
            performance_bonus: "Up to 15% of base salary".to_string(),
            signing_bonus: "Negotiable based on candidate".to_string(),
            referral_bonus: "Available for successful hires".to_string(),
        },
        perks: owned(&[
            "Flexible working hours",
            "Remote work options",
            "Modern equipment and tools",
            "Team building activities",
            "Learning and conference budget",
        ]),
        total_value_estimate: "Competitive package with strong upside potential".to_string(),
    }
}

pub fn fallback_budget_analysis() -> BudgetAnalysis {
    BudgetAnalysis {
        total_annual_cost: "Varies by package selection".to_string(),
        budget_recommendations: owned(&[
            "Prioritize equity over high base salaries",
            "Focus on growth and learning opportunities",
            "Consider performance-based compensation",
        ]),
        cost_optimization: owned(&[
            "Negotiate based on candidate priorities",
            "Offer flexible benefits packages",
            "Use equity to offset lower base salaries",
        ]),
    }
}
