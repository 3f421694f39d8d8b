// All generation prompts for the planning pipeline and chat.
// Templates use `{placeholder}` markers filled with `str::replace`.
// JSON-producing system directives end with llm_client::prompts::JSON_ONLY_SYSTEM.

// ── Clarification ────────────────────────────────────────────────────────────

pub const CLARIFICATION_SYSTEM: &str = "You are a senior HR consultant specializing in startup hiring. \
    Analyze hiring requests and extract the roles to be hired, required skills, \
    timeline and urgency, budget constraints, company stage, team size and \
    remote/hybrid/onsite preference. When information is missing or unclear, \
    generate intelligent clarifying questions and state your assumptions.";

/// Replace: {user_input}, {company_context}
pub const CLARIFICATION_PROMPT_TEMPLATE: &str = r#"User Request: "{user_input}"
{company_context}

Analyze this hiring request. Return a JSON object with this EXACT schema:
{
  "extracted_info": {
    "roles": ["Software Engineer"],
    "skills": ["Python"],
    "timeline": "ASAP",
    "budget": "Competitive",
    "company_stage": "Seed stage",
    "team_size": "5 people",
    "work_mode": "Hybrid"
  },
  "clarifying_questions": ["What is your budget range for these positions?"],
  "assumptions": ["Assuming startup environment with fast-paced growth"]
}

List each distinct role exactly once, as a short job title."#;

// ── Market research ──────────────────────────────────────────────────────────

/// Replace: {role}
pub const MARKET_ANALYSIS_SYSTEM_TEMPLATE: &str = "You are a market research analyst specializing in tech hiring. \
    Analyze the search results and provide insights about the {role} market: \
    salary ranges for entry, mid and senior levels, in-demand skills, market \
    competition and demand, and hiring trends. Provide actionable insights for startup hiring.";

/// Replace: {role}, {search_results}, {extracted_info}
pub const MARKET_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Role: {role}

Search Results Summary:
{search_results}

Company Context:
{extracted_info}

Return a JSON object with this EXACT schema:
{
  "salary_ranges": {"entry": "$80k-120k", "mid": "$120k-180k", "senior": "$180k-250k"},
  "key_skills": ["System Design"],
  "market_demand": "Very High",
  "competition_level": "High",
  "hiring_tips": ["Emphasize growth opportunities"]
}"#;

pub const MARKET_SUMMARY_SYSTEM: &str = "Summarize the market research findings across all roles. \
    Provide key insights and recommendations for the hiring strategy in a few short paragraphs of plain text.";

/// Replace: {market_data}
pub const MARKET_SUMMARY_PROMPT_TEMPLATE: &str = "Market Data:\n{market_data}";

// ── Job descriptions ─────────────────────────────────────────────────────────

pub const JOB_DESCRIPTION_SYSTEM: &str = "You are an expert technical recruiter who writes compelling \
    job descriptions for startups. Include a compelling title and summary, key responsibilities, \
    required and preferred qualifications, what we offer, and the application process. \
    Emphasize growth, impact and learning opportunities.";

/// Replace: {role}, {company_stage}, {team_size}, {work_mode}, {skills},
///          {timeline}, {budget}, {key_skills}, {salary_ranges}, {market_demand}
pub const JOB_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Role: {role}

Company Context:
- Stage: {company_stage}
- Team Size: {team_size}
- Work Mode: {work_mode}

Requirements:
- Skills: {skills}
- Timeline: {timeline}
- Budget: {budget}

Market Data:
- Key Skills: {key_skills}
- Salary Range: {salary_ranges}
- Market Demand: {market_demand}

Return a JSON object with this EXACT schema:
{
  "title": "...",
  "summary": "...",
  "responsibilities": ["..."],
  "required_qualifications": ["..."],
  "preferred_qualifications": ["..."],
  "what_we_offer": ["..."],
  "application_process": "..."
}"#;

pub const POSTING_TIPS_SYSTEM: &str = "Provide actionable tips for posting and promoting these job \
    descriptions to attract the best candidates. Focus on startup-specific strategies. Answer in plain text.";

/// Replace: {job_descriptions}
pub const POSTING_TIPS_PROMPT_TEMPLATE: &str = "Job Descriptions:\n{job_descriptions}";

// ── Interview process ────────────────────────────────────────────────────────

pub const INTERVIEW_SYSTEM: &str = "You are a hiring process designer for startups. Design an \
    efficient, fair interview process: interview stages with duration and format, evaluation \
    criteria, sample questions per category, the decision process and logistics. \
    Keep it quick enough for a startup while still thorough.";

/// Replace: {role}, {title}, {required_qualifications}, {responsibilities}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Role: {role}
Job Title: {title}

Required Qualifications:
{required_qualifications}

Key Responsibilities:
{responsibilities}

Return a JSON object with this EXACT schema:
{
  "stages": [
    {"name": "Initial Screen", "duration": "30 minutes", "format": "Video", "focus": "..."}
  ],
  "timeline": "2-3 weeks from application to decision",
  "evaluation_criteria": ["..."],
  "sample_questions": {"technical": ["..."], "behavioral": ["..."]},
  "decision_process": "...",
  "logistics": "..."
}"#;

pub const INTERVIEW_GUIDELINES_SYSTEM: &str = "Provide comprehensive interview guidelines and best \
    practices for startup hiring teams. Focus on legal compliance, bias reduction and candidate \
    experience. Answer in plain text.";

pub const INTERVIEW_GUIDELINES_PROMPT: &str = "Generate interview guidelines for startup hiring teams.";

// ── Compensation ─────────────────────────────────────────────────────────────

pub const COMPENSATION_SYSTEM: &str = "You are a compensation specialist for startups. Design \
    competitive, fair compensation packages that attract top talent while being financially \
    responsible: base salary, startup-appropriate equity, benefits, performance bonuses and perks.";

/// Replace: {role}, {salary_ranges}, {market_demand}, {competition_level},
///          {budget}, {company_stage}, {team_size}
pub const COMPENSATION_PROMPT_TEMPLATE: &str = r#"Role: {role}

Market Data:
- Salary Ranges: {salary_ranges}
- Market Demand: {market_demand}
- Competition Level: {competition_level}

Company Context:
- Budget Constraint: {budget}
- Company Stage: {company_stage}
- Team Size: {team_size}

Return a JSON object with this EXACT schema:
{
  "base_salary": {"range": "$120k-150k", "justification": "..."},
  "equity_percentage": {"range": "0.1%-0.5%", "vesting": "4 years with 1-year cliff", "justification": "..."},
  "benefits": ["..."],
  "bonuses": {"performance_bonus": "...", "signing_bonus": "...", "referral_bonus": "..."},
  "perks": ["..."],
  "total_value_estimate": "..."
}"#;

pub const BUDGET_ANALYSIS_SYSTEM: &str = "Analyze the total compensation budget and provide insights \
    on affordability, budget allocation and cost optimization strategies for a startup.";

/// Replace: {compensation_packages}, {extracted_info}
pub const BUDGET_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compensation Packages:
{compensation_packages}

Company Context:
{extracted_info}

Return a JSON object with this EXACT schema:
{
  "total_annual_cost": "...",
  "budget_recommendations": ["..."],
  "cost_optimization": ["..."]
}"#;

pub const NEGOTIATION_SYSTEM: &str = "Provide practical negotiation guidelines for startup hiring \
    managers when discussing compensation with candidates. Answer in plain text.";

pub const NEGOTIATION_PROMPT: &str = "Generate compensation negotiation guidelines for startups.";

// ── Checklists ───────────────────────────────────────────────────────────────

pub const CHECKLIST_SYSTEM: &str = "You are a hiring operations specialist. Create a detailed, \
    actionable hiring checklist covering every phase from preparation to onboarding, with \
    deadlines and a responsible party for each task.";

/// Replace: {role}, {job_description}, {interview_process}, {compensation}
pub const CHECKLIST_PROMPT_TEMPLATE: &str = r#"Role: {role}

Job Description:
{job_description}

Interview Process:
{interview_process}

Compensation:
{compensation}

Return a JSON object with this EXACT schema. Every phase has the same shape:
{
  "pre_posting": {"tasks": [{"task": "...", "deadline": "Day 1", "responsible": "HR"}]},
  "job_posting": {"tasks": []},
  "screening": {"tasks": []},
  "interviews": {"tasks": []},
  "decision_offer": {"tasks": []},
  "onboarding": {"tasks": []}
}"#;

pub const MASTER_CHECKLIST_SYSTEM: &str = "Create a master hiring checklist that coordinates hiring \
    for multiple roles. Focus on dependencies, resource allocation and overall project management.";

/// Replace: {role_checklists}
pub const MASTER_CHECKLIST_PROMPT_TEMPLATE: &str = r#"Role Checklists:
{role_checklists}

Return a JSON object with this EXACT schema:
{
  "setup_phase": ["..."],
  "execution_phase": ["..."],
  "coordination_tasks": ["..."],
  "milestones": ["Week 1: ..."]
}"#;

pub const TIMELINE_SYSTEM: &str = "Create a timeline overview showing the hiring process flow for \
    multiple roles, highlighting key milestones and dependencies. Answer in plain text.";

/// Replace: {role_checklists}
pub const TIMELINE_PROMPT_TEMPLATE: &str = "Role Checklists:\n{role_checklists}";

// ── Chat ─────────────────────────────────────────────────────────────────────

/// Replace: {hiring_plan}, {recent_messages}
pub const CHAT_SYSTEM_TEMPLATE: &str = r#"You are an expert startup hiring assistant. You help founders and hiring managers refine their hiring plans.

Current hiring plan:
{hiring_plan}

Recent conversation:
{recent_messages}

Answer the user's question concisely and practically. Refer to the hiring plan when it is relevant."#;
