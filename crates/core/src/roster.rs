//! # Agent Roster
//!
//! The fixed set of agent profiles available to a run. Profiles are
//! defined once as static tables and looked up by id; tasks refer to them
//! through `assigned_agent_id`.

use serde::{Deserialize, Serialize};

/// Rank of an agent in the organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentRole {
    /// Top strategist
    Ceo,
    /// Architect
    Cto,
    /// Coordinator
    Pm,
    /// Specialist worker
    Worker,
}

/// Identity of a worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub role: AgentRole,
    pub specialty: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl AgentProfile {
    pub fn category(&self) -> AgentCategory {
        AgentCategory::from_agent_id(self.id)
    }
}

/// Deliverable family of an agent, used to select instructions and the
/// artifact-purpose message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCategory {
    ProductOwner,
    ContextEngineer,
    DatabaseArchitect,
    UiDesigner,
    CreativeCoder,
    Architect,
    Builder,
    Janitor,
    Documenter,
    Generic,
}

impl AgentCategory {
    pub fn from_agent_id(id: &str) -> Self {
        match id {
            "product-owner" => AgentCategory::ProductOwner,
            "ctx-eng" => AgentCategory::ContextEngineer,
            "db-arch" => AgentCategory::DatabaseArchitect,
            "designer-ui" => AgentCategory::UiDesigner,
            "creative-coder" => AgentCategory::CreativeCoder,
            "arch-01" => AgentCategory::Architect,
            "janitor-01" => AgentCategory::Janitor,
            "doc-01" => AgentCategory::Documenter,
            id if id.starts_with("builder") => AgentCategory::Builder,
            _ => AgentCategory::Generic,
        }
    }
}

/// Strategy, architecture and orchestration
pub static C_SUITE: &[AgentProfile] = &[
    AgentProfile {
        id: "ceo-01",
        name: "OVERLORD (CEO)",
        role: AgentRole::Ceo,
        specialty: "Strategy & Goal",
        description: "Defines the high-level goal and business value.",
        icon: "👑",
    },
    AgentProfile {
        id: "arch-01",
        name: "ARCHITECT (CTO)",
        role: AgentRole::Cto,
        specialty: "System Design",
        description: "Converts goals into system architecture and file structures.",
        icon: "📐",
    },
    AgentProfile {
        id: "pm-01",
        name: "TASKMASTER (PM)",
        role: AgentRole::Pm,
        specialty: "Orchestration",
        description: "Breaks down architecture into build tasks.",
        icon: "📋",
    },
];

/// Specialists that execute planned tasks
pub static WORKER_ARMY: &[AgentProfile] = &[
    // Planning & specs
    AgentProfile {
        id: "product-owner",
        name: "Product Owner",
        role: AgentRole::Worker,
        specialty: "PRD & Sitemap",
        description: "Creates Product Requirements Document and Sitemaps.",
        icon: "📑",
    },
    AgentProfile {
        id: "ctx-eng",
        name: "Context Eng.",
        role: AgentRole::Worker,
        specialty: "Prompt Engineering",
        description: "Designs System Prompts and Agent Contexts.",
        icon: "🧠",
    },
    AgentProfile {
        id: "db-arch",
        name: "DB Architect",
        role: AgentRole::Worker,
        specialty: "SQL & Schema",
        description: "Designs Database Schemas and SQL relations.",
        icon: "🗄️",
    },
    // Builders
    AgentProfile {
        id: "builder-fe",
        name: "Builder (Frontend)",
        role: AgentRole::Worker,
        specialty: "Next.js/React/HTML",
        description: "Writes the actual frontend code based on spec.",
        icon: "⚛️",
    },
    AgentProfile {
        id: "builder-be",
        name: "Builder (Backend)",
        role: AgentRole::Worker,
        specialty: "Python/FastAPI/Node",
        description: "Writes the actual backend code based on spec.",
        icon: "🐍",
    },
    AgentProfile {
        id: "designer-ui",
        name: "UI Designer",
        role: AgentRole::Worker,
        specialty: "CSS/Bootstrap/Tailwind",
        description: "Handles styling, aesthetics, and responsive layout.",
        icon: "🎨",
    },
    AgentProfile {
        id: "creative-coder",
        name: "Creative Coder",
        role: AgentRole::Worker,
        specialty: "p5.js & Canvas",
        description: "Creates interactive visuals and generative art.",
        icon: "✨",
    },
    // Quality & maintenance
    AgentProfile {
        id: "janitor-01",
        name: "Janitor (Refactor)",
        role: AgentRole::Worker,
        specialty: "Code Cleanup & Optimization",
        description: "Refactors code, removes complexity, ensures clean code.",
        icon: "🧹",
    },
    AgentProfile {
        id: "doc-01",
        name: "Documenter",
        role: AgentRole::Worker,
        specialty: "Technical Writing",
        description: "Writes README.md and technical documentation.",
        icon: "📝",
    },
    // Optional support
    AgentProfile {
        id: "dev-ops",
        name: "Pipeline (DevOps)",
        role: AgentRole::Worker,
        specialty: "Docker/Vercel",
        description: "Deployment configuration.",
        icon: "🚀",
    },
    AgentProfile {
        id: "mkt-growth",
        name: "Hacker (Growth)",
        role: AgentRole::Worker,
        specialty: "Growth Hacking",
        description: "Growth strategy.",
        icon: "📈",
    },
];

/// Every profile, C-suite first
pub fn all_agents() -> impl Iterator<Item = &'static AgentProfile> {
    C_SUITE.iter().chain(WORKER_ARMY.iter())
}

/// Issues the run's strategic decision
pub fn ceo() -> &'static AgentProfile {
    &C_SUITE[0]
}

/// Expands the decision into a plan
pub fn taskmaster() -> &'static AgentProfile {
    &C_SUITE[2]
}

/// Look up an agent by id
pub fn find_agent(id: &str) -> Option<&'static AgentProfile> {
    WORKER_ARMY
        .iter()
        .chain(C_SUITE.iter())
        .find(|agent| agent.id == id)
}

/// `id (specialty)` listing handed to the planner
pub fn roster_listing() -> String {
    all_agents()
        .map(|a| format!("{} ({})", a.id, a.specialty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Static explanation of what a category's deliverable is for.
/// Logged after a task completes; `Generic` has none.
pub fn artifact_purpose(category: AgentCategory) -> Option<&'static str> {
    let message = match category {
        AgentCategory::ProductOwner => {
            "📄 Artifact Generated: PRD.md & sitemap.md\n👉 Purpose: a blueprint so the dev team understands scope and user flow"
        }
        AgentCategory::Architect => {
            "📐 Artifact Generated: ARCHITECTURE.md\n👉 Purpose: pins down the tech stack, folder structure and API surface"
        }
        AgentCategory::DatabaseArchitect => {
            "🗄️ Artifact Generated: SQL Schema / Database Design\n👉 Purpose: lays out tables and relations that scale"
        }
        AgentCategory::ContextEngineer => {
            "🧠 Artifact Generated: Context / System Prompts\n👉 Purpose: defines the brain and personality of the product's AI"
        }
        AgentCategory::UiDesigner => {
            "🎨 Artifact Generated: UI Styles / CSS System\n👉 Purpose: sets design tokens, colours and theme"
        }
        AgentCategory::CreativeCoder => {
            "✨ Artifact Generated: Generative Art Scripts (p5.js)\n👉 Purpose: an interactive visual experience that sets the product apart"
        }
        AgentCategory::Documenter => {
            "📝 Artifact Generated: README.md\n👉 Purpose: usage and installation guide for other developers"
        }
        AgentCategory::Janitor => {
            "🧹 Artifact Generated: CODE_REVIEW.md\n👉 Purpose: audits code quality and recommends refactors"
        }
        AgentCategory::Builder => {
            "🛠️ Artifact Generated: Source Code (frontend/backend)\n👉 Purpose: turns design and logic into working software"
        }
        AgentCategory::Generic => return None,
    };
    Some(message)
}
