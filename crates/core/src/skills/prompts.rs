//! Default prompt templates bundled at compile time.
//!
//! Phase prompts are the system instructions of each skill. Role
//! instructions are prepended to a task request and selected by
//! [`AgentCategory`].

use crate::roster::{AgentCategory, AgentProfile};

/// Concept scout - proposes a product idea
pub const CONCEPT: &str = include_str!("defaults/concept.md");

/// CEO - vision and KPIs
pub const STRATEGY: &str = include_str!("defaults/strategy.md");

/// Taskmaster - expands the decision into a waterfall plan
pub const TASKMASTER: &str = include_str!("defaults/taskmaster.md");

/// Builder - wraps every task execution
pub const BUILDER: &str = include_str!("defaults/builder.md");

pub const ROLE_PRODUCT_OWNER: &str = include_str!("defaults/roles/product_owner.md");
pub const ROLE_CONTEXT_ENGINEER: &str = include_str!("defaults/roles/context_engineer.md");
pub const ROLE_DATABASE_ARCHITECT: &str = include_str!("defaults/roles/database_architect.md");
pub const ROLE_UI_DESIGNER: &str = include_str!("defaults/roles/ui_designer.md");
pub const ROLE_CREATIVE_CODER: &str = include_str!("defaults/roles/creative_coder.md");
pub const ROLE_ARCHITECT: &str = include_str!("defaults/roles/architect.md");
pub const ROLE_BUILDER: &str = include_str!("defaults/roles/builder.md");
pub const ROLE_JANITOR: &str = include_str!("defaults/roles/janitor.md");
pub const ROLE_DOCUMENTER: &str = include_str!("defaults/roles/documenter.md");

/// Role template for a category; `Generic` has none and is built per agent
pub fn role_instruction(category: AgentCategory) -> Option<&'static str> {
    match category {
        AgentCategory::ProductOwner => Some(ROLE_PRODUCT_OWNER),
        AgentCategory::ContextEngineer => Some(ROLE_CONTEXT_ENGINEER),
        AgentCategory::DatabaseArchitect => Some(ROLE_DATABASE_ARCHITECT),
        AgentCategory::UiDesigner => Some(ROLE_UI_DESIGNER),
        AgentCategory::CreativeCoder => Some(ROLE_CREATIVE_CODER),
        AgentCategory::Architect => Some(ROLE_ARCHITECT),
        AgentCategory::Builder => Some(ROLE_BUILDER),
        AgentCategory::Janitor => Some(ROLE_JANITOR),
        AgentCategory::Documenter => Some(ROLE_DOCUMENTER),
        AgentCategory::Generic => None,
    }
}

/// Instruction block for `agent` working on `task_title`
pub fn instruction_for(agent: &AgentProfile, task_title: &str) -> String {
    match role_instruction(agent.category()) {
        Some(template) => template.to_string(),
        None => format!(
            "You are {} ({}). Execute: {}. Provide output in file format blocks.",
            agent.name, agent.specialty, task_title
        ),
    }
}

/// All bundled prompts with their slugs
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("concept", CONCEPT),
        ("strategy", STRATEGY),
        ("taskmaster", TASKMASTER),
        ("builder", BUILDER),
        ("role_product_owner", ROLE_PRODUCT_OWNER),
        ("role_context_engineer", ROLE_CONTEXT_ENGINEER),
        ("role_database_architect", ROLE_DATABASE_ARCHITECT),
        ("role_ui_designer", ROLE_UI_DESIGNER),
        ("role_creative_coder", ROLE_CREATIVE_CODER),
        ("role_architect", ROLE_ARCHITECT),
        ("role_builder", ROLE_BUILDER),
        ("role_janitor", ROLE_JANITOR),
        ("role_documenter", ROLE_DOCUMENTER),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::find_agent;

    #[test]
    fn test_all_prompts_non_empty() {
        for (slug, content) in all_defaults() {
            assert!(!content.is_empty(), "Prompt '{}' should not be empty", slug);
            assert!(content.len() > 50, "Prompt '{}' seems too short", slug);
        }
    }

    #[test]
    fn test_role_selection() {
        let po = instruction_for(find_agent("product-owner").unwrap(), "Define PRD");
        assert!(po.contains("### PRD.md"));
        assert!(po.contains("### sitemap.md"));

        let be = instruction_for(find_agent("builder-be").unwrap(), "Build API");
        assert!(be.contains("WORKING CODE"));

        let janitor = instruction_for(find_agent("janitor-01").unwrap(), "Review");
        assert!(janitor.contains("CODE_REVIEW.md"));
    }

    #[test]
    fn test_generic_fallback_names_agent_and_task() {
        let growth = find_agent("mkt-growth").unwrap();
        let text = instruction_for(growth, "Plan launch campaign");
        assert!(text.contains("Hacker (Growth)"));
        assert!(text.contains("Growth Hacking"));
        assert!(text.contains("Plan launch campaign"));
    }
}
