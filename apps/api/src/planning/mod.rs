//! Hiring plan construction: the six stage agents, the keyword plan builder
//! and the orchestrator that chooses between them.

pub mod checklist;
pub mod clarification;
pub mod compensation;
pub mod handlers;
pub mod interview;
pub mod job_description;
pub mod keyword_plan;
pub mod market_research;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod stage;
