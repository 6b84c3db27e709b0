//! Learning Level Catalog

use serde::Serialize;

/// One rung on the integration ladder
#[derive(Clone, Debug, Serialize)]
pub struct LearningLevel {
    pub level: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub why_needed: &'static str,
    pub route: &'static str,
}

/// All levels, in teaching order.
pub const LEVELS: &[LearningLevel] = &[
    LearningLevel {
        level: 1,
        title: "Plain LLM Chat",
        description: "The most basic AI conversation, with no guidance at all",
        why_needed: "Understand the raw capabilities and limits of an LLM",
        route: "/level1",
    },
    LearningLevel {
        level: 2,
        title: "System Prompt",
        description: "Give the AI a role and rules",
        why_needed: "Control the AI's behavior and keep it consistent",
        route: "/level2",
    },
    LearningLevel {
        level: 3,
        title: "Few-shot Learning",
        description: "Teach the AI a specific format through examples",
        why_needed: "Make the AI produce a particular format or style",
        route: "/level3",
    },
    LearningLevel {
        level: 4,
        title: "Conversation Memory",
        description: "Context carried across multiple turns",
        why_needed: "Keep the dialogue coherent and aware of what came before",
        route: "/level4",
    },
    LearningLevel {
        level: 5,
        title: "Retrieval Augmentation",
        description: "Question answering grounded in a knowledge base",
        why_needed: "Let the AI answer from private or up-to-date knowledge",
        route: "/level5",
    },
    LearningLevel {
        level: 6,
        title: "Function Calling",
        description: "The AI invokes external tools",
        why_needed: "Extend the AI's abilities to real operations",
        route: "/level6",
    },
    LearningLevel {
        level: 7,
        title: "Autonomous Agent",
        description: "The AI plans and executes multi-step tasks on its own",
        why_needed: "Handle complex tasks and adjust strategy automatically",
        route: "/level7",
    },
    LearningLevel {
        level: 8,
        title: "Tool Protocol",
        description: "Standardized tool connections over an external protocol",
        why_needed: "One uniform way to plug in tools, like USB for AI",
        route: "/level8",
    },
];
