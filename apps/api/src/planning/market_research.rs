//! Market research stage: three web searches per role, one analysis call per
//! role, and a free-text summary across roles.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::info;

use crate::llm_client::{LlmError, TextGenerator};
use crate::planning::models::{
    ClarificationResult, MarketResearch, RoleMarketData, SalaryRanges, StageName,
};
use crate::planning::prompts::{
    MARKET_ANALYSIS_PROMPT_TEMPLATE, MARKET_ANALYSIS_SYSTEM_TEMPLATE, MARKET_SUMMARY_PROMPT_TEMPLATE,
    MARKET_SUMMARY_SYSTEM,
};
use crate::planning::stage::{
    excerpt, fill_template, generate_structured, generate_text, json_system, process_roles,
    settle_roles, text_system, RoleAgent, StageOutcome, StageReport,
};
use crate::search::{SearchResponse, WebSearch};

const SEARCH_EXCERPT_CHARS: usize = 2000;

pub struct MarketResearchAgent {
    llm: Arc<dyn TextGenerator>,
    search: Arc<dyn WebSearch>,
}

impl MarketResearchAgent {
    pub fn new(llm: Arc<dyn TextGenerator>, search: Arc<dyn WebSearch>) -> Self {
        Self { llm, search }
    }

    pub async fn process(
        &self,
        clarifications: &ClarificationResult,
    ) -> Result<StageReport<MarketResearch>, LlmError> {
        let roles = clarifications.extracted_info.roles.clone();
        let outcomes = process_roles(self, &roles, clarifications).await?;

        let mut degraded = Vec::new();
        let market_data = settle_roles(self.stage(), outcomes, &mut degraded);

        let summary = generate_text(
            self.llm.as_ref(),
            &text_system(MARKET_SUMMARY_SYSTEM),
            &MARKET_SUMMARY_PROMPT_TEMPLATE.replace("{market_data}", &excerpt(&market_data, usize::MAX)),
        )
        .await?;

        Ok(StageReport {
            output: MarketResearch {
                roles_analyzed: roles,
                market_data,
                summary,
            },
            degraded,
        })
    }

    async fn search_role(&self, role: &str) -> Vec<SearchResponse> {
        let queries = search_queries(role);
        let responses = join_all(queries.iter().map(|q| self.search.search(q))).await;
        let failed = responses.iter().filter(|r| r.error.is_some()).count();
        info!(
            "Market search for '{role}': {} queries, {failed} failed",
            responses.len()
        );
        responses
    }
}

#[async_trait]
impl RoleAgent for MarketResearchAgent {
    type Upstream = ClarificationResult;
    type Output = RoleMarketData;

    fn stage(&self) -> StageName {
        StageName::MarketResearch
    }

    async fn process_role(
        &self,
        role: &str,
        clarifications: &ClarificationResult,
    ) -> Result<StageOutcome<RoleMarketData>, LlmError> {
        let search_results = self.search_role(role).await;

        let system = json_system(&MARKET_ANALYSIS_SYSTEM_TEMPLATE.replace("{role}", role));
        let search_excerpt = excerpt(&search_results, SEARCH_EXCERPT_CHARS);
        let extracted_info = excerpt(&clarifications.extracted_info, usize::MAX);
        let prompt = fill_template(
            MARKET_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("search_results", search_excerpt.as_str()),
                ("extracted_info", extracted_info.as_str()),
            ],
        );

        generate_structured(self.llm.as_ref(), &system, &prompt, || {
            fallback_market_data(role)
        })
        .await
    }
}

pub fn search_queries(role: &str) -> [String; 3] {
    [
        format!("{role} salary range 2024 startup"),
        format!("{role} hiring trends tech industry"),
        format!("{role} skills requirements market demand"),
    ]
}

fn market_data(
    ranges: [&str; 3],
    key_skills: &[&str],
    demand: &str,
    competition: &str,
    tips: &[&str],
) -> RoleMarketData {
    let [entry, mid, senior] = ranges;
    RoleMarketData {
        salary_ranges: SalaryRanges {
            entry: entry.to_string(),
            mid: mid.to_string(),
            senior: senior.to_string(),
        },
        key_skills: key_skills.iter().map(|s| s.to_string()).collect(),
        market_demand: demand.to_string(),
        competition_level: competition.to_string(),
        hiring_tips: tips.iter().map(|s| s.to_string()).collect(),
    }
}

/// Static market data for a role: Software Engineer, AI/ML Engineer, or generic.
pub fn fallback_market_data(role: &str) -> RoleMarketData {
    match role {
        "Software Engineer" => market_data(
            ["$80k-120k", "$120k-180k", "$180k-250k"],
            &["Python/JavaScript", "System Design", "Problem Solving"],
            "Very High",
            "High",
            &[
                "Focus on coding skills",
                "Emphasize growth opportunities",
                "Competitive compensation",
            ],
        ),
        "AI/ML Engineer" | "Ai Engineer" => market_data(
            ["$100k-140k", "$140k-200k", "$200k-300k"],
            &["Python", "TensorFlow/PyTorch", "Statistics", "Deep Learning"],
            "Extremely High",
            "Very High",
            &[
                "Highlight AI projects",
                "Offer learning opportunities",
                "Premium compensation",
            ],
        ),
        _ => market_data(
            ["$60k-90k", "$90k-130k", "$130k-180k"],
            &["Domain expertise", "Communication", "Problem solving"],
            "Moderate",
            "Moderate",
            &["Clear role definition", "Growth path", "Competitive benefits"],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::clarification::fallback_clarification;
    use crate::test_support::{FailingGenerator, GarbageGenerator, RecordingSearch, ScriptedGenerator};

    const ANALYSIS_JSON: &str = r#"{
        "salary_ranges": {"entry": "$1", "mid": "$2", "senior": "$3"},
        "key_skills": ["Rust"],
        "market_demand": "High",
        "competition_level": "Medium",
        "hiring_tips": ["Move fast"]
    }"#;

    fn clarifications(roles: &[&str]) -> ClarificationResult {
        let mut c = fallback_clarification("");
        c.extracted_info.roles = roles.iter().map(|r| r.to_string()).collect();
        c
    }

    #[tokio::test]
    async fn test_parsed_market_data_keyed_by_clarified_roles() {
        let llm = ScriptedGenerator::new(|system, _| {
            if system.starts_with(MARKET_SUMMARY_SYSTEM) {
                "Strong market.".to_string()
            } else {
                ANALYSIS_JSON.to_string()
            }
        });
        let search = Arc::new(RecordingSearch::default());
        let agent = MarketResearchAgent::new(Arc::new(llm), search.clone());

        let report = agent
            .process(&clarifications(&["Designer", "Intern"]))
            .await
            .unwrap();

        assert!(report.degraded.is_empty());
        assert_eq!(report.output.roles_analyzed, vec!["Designer", "Intern"]);
        assert_eq!(report.output.market_data.role_names(), vec!["Designer", "Intern"]);
        assert_eq!(
            report.output.market_data.get("Intern").unwrap().key_skills,
            vec!["Rust"]
        );
        assert_eq!(report.output.summary, "Strong market.");
        assert_eq!(search.queries().len(), 6);
        assert!(search
            .queries()
            .contains(&"Designer salary range 2024 startup".to_string()));
    }

    #[tokio::test]
    async fn test_unparseable_analysis_yields_declared_fallback() {
        let agent = MarketResearchAgent::new(
            Arc::new(GarbageGenerator),
            Arc::new(RecordingSearch::default()),
        );
        let roles = ["Software Engineer", "Ai Engineer", "Designer"];

        let report = agent.process(&clarifications(&roles)).await.unwrap();

        for role in roles {
            assert_eq!(
                report.output.market_data.get(role),
                Some(&fallback_market_data(role))
            );
        }
        assert_eq!(report.degraded.len(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let agent = MarketResearchAgent::new(
            Arc::new(FailingGenerator),
            Arc::new(RecordingSearch::default()),
        );
        assert!(agent.process(&clarifications(&["Designer"])).await.is_err());
    }

    #[test]
    fn test_fallback_table_has_generic_default() {
        assert_eq!(fallback_market_data("Software Engineer").market_demand, "Very High");
        assert_eq!(fallback_market_data("AI/ML Engineer").market_demand, "Extremely High");
        assert_eq!(fallback_market_data("Chef").market_demand, "Moderate");
        assert_eq!(fallback_market_data("Chef").salary_ranges.mid, "$90k-130k");
    }
}
