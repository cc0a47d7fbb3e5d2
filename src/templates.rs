//! Built-in template catalog. Each template is only a named seed patch.

use serde::Serialize;

use crate::error::{PromptMakerError, Result};
use crate::model::PromptPatch;

#[derive(Debug, Clone, Serialize)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub seed: PromptPatch,
}

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// All templates, in display order.
pub fn templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            id: "bug-fixer",
            name: "Bug Fixer (Code)",
            description: "Diagnose and propose fixes for code issues",
            seed: PromptPatch {
                role: text("Senior software engineer and debugger"),
                objective: text(
                    "Identify root cause and propose minimal, safe code changes with reasoning.",
                ),
                steps: strings(&[
                    "Restate suspected issue and scope.",
                    "Propose 1-2 likely root causes.",
                    "Provide minimal diff or snippet to fix.",
                    "Add tests or checks to prevent regression.",
                ]),
                output_format: text(
                    "Return sections: Summary, Root Cause, Fix (code), Tests, Risks, Next Steps.",
                ),
                keywords: strings(&["stack trace", "reproduction", "regression"]),
                model_preference: text("gpt-4o-mini"),
                ..Default::default()
            },
        },
        PromptTemplate {
            id: "code-review",
            name: "Code Review",
            description: "Structured code review prompts",
            seed: PromptPatch {
                role: text("Staff engineer code reviewer"),
                objective: text("Review the following code and provide actionable feedback."),
                constraints: strings(&[
                    "Be specific and cite lines.",
                    "Prefer clarity over cleverness.",
                ]),
                steps: strings(&[
                    "Assess correctness and edge cases.",
                    "Evaluate readability and naming.",
                    "Check performance and resource usage.",
                    "Flag security and privacy issues.",
                ]),
                output_format: text(
                    "Return sections: Summary, Major Issues, Suggestions, Questions, Suggested Refactor (if any).",
                ),
                ..Default::default()
            },
        },
        PromptTemplate {
            id: "product-spec",
            name: "Product Spec",
            description: "Draft or refine product specifications",
            seed: PromptPatch {
                role: text("Product manager and UX writer"),
                objective: text("Create a crisp product spec for the following feature."),
                steps: strings(&[
                    "Define problem and goals.",
                    "List user stories and acceptance criteria.",
                    "Non-functional requirements.",
                    "Open questions.",
                ]),
                output_format: text(
                    "Return sections: Overview, Goals, User Stories, Acceptance Criteria, NFRs, Open Questions.",
                ),
                ..Default::default()
            },
        },
        PromptTemplate {
            id: "sql-gen",
            name: "SQL Generator",
            description: "Generate safe SQL queries",
            seed: PromptPatch {
                role: text("Senior data engineer"),
                objective: text("Generate a correct and efficient SQL query."),
                constraints: strings(&[
                    "Avoid full scans where indexes exist.",
                    "Parameterize inputs.",
                ]),
                steps: strings(&[
                    "Summarize the schema.",
                    "Propose query.",
                    "Provide explanation.",
                    "Add indexes if needed.",
                ]),
                output_format: text("Return SQL fenced in ```sql and a brief explanation."),
                model_preference: text("gpt-4o-mini"),
                ..Default::default()
            },
        },
        PromptTemplate {
            id: "marketing-copy",
            name: "Marketing Copy",
            description: "High-converting copy",
            seed: PromptPatch {
                role: text("Conversion copywriter"),
                objective: text("Write compelling copy for the following offer."),
                tone: text("Friendly, high-energy, benefits-first"),
                steps: strings(&[
                    "Define audience pain points.",
                    "Craft headline.",
                    "Write body.",
                    "CTA variations.",
                ]),
                output_format: text("Return 3 variants with headline and CTA options."),
                language: text("English"),
                ..Default::default()
            },
        },
        PromptTemplate {
            id: "research-assistant",
            name: "Research Assistant",
            description: "Plan and synthesize research",
            seed: PromptPatch {
                role: text("Research assistant"),
                objective: text("Plan research steps and synthesize findings."),
                steps: strings(&[
                    "Clarify scope.",
                    "Plan research.",
                    "List sources.",
                    "Synthesize findings.",
                ]),
                output_format: text("Return Plan and Synthesis sections with citations."),
                ..Default::default()
            },
        },
    ]
}

/// Look up a template by id.
pub fn find_template(id: &str) -> Result<PromptTemplate> {
    templates()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| PromptMakerError::TemplateNotFound(id.to_string()))
}
