mod edit;
mod patch;

pub use edit::{
    add_example, add_item, pop_item, remove_example, remove_item, set_field, update_example,
    ExampleUpdate, ListField,
};
pub use patch::{merge, PromptPatch};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single few-shot example shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FewShotExample {
    #[serde(default)]
    pub title: String,
    pub input: String,
    /// Expected output; optional on the wire
    #[serde(default)]
    pub output: String,
}

impl FewShotExample {
    pub fn new(title: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    /// An example is rendered only when its input has content.
    pub fn is_active(&self) -> bool {
        !self.input.trim().is_empty()
    }
}

/// The full structured description of a prompt.
///
/// Always fully populated. Partial data travels as a [`PromptPatch`] and is
/// folded in with [`merge`]. List fields may hold blank entries while being
/// edited; they are cleaned up at render time, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptSpec {
    pub role: String,
    pub audience: String,
    pub objective: String,
    pub context: String,
    pub constraints: Vec<String>,
    pub tone: String,
    pub style_guidelines: String,
    pub output_format: String,
    pub language: String,
    pub steps: Vec<String>,
    pub keywords: Vec<String>,
    pub avoid: Vec<String>,
    pub examples: Vec<FewShotExample>,
    pub model_preference: String,
    /// Expected in `[0, 2]`; not enforced
    pub temperature: Option<f64>,
    /// Expected `>= 1`; not enforced
    pub max_tokens: Option<i64>,
    pub system_preamble: String,
}

impl PromptSpec {
    /// A spec with every field empty. Renders to the empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a new spec with `patch` applied on top of `self`.
    pub fn merged(&self, patch: &PromptPatch) -> Self {
        merge(self, patch)
    }
}

/// The starting point when there is no token and nothing cached.
pub fn default_spec() -> PromptSpec {
    PromptSpec {
        role: "World-class expert agent".to_string(),
        audience: "Product engineers and researchers".to_string(),
        objective: "Produce the best possible prompt for the user's task.".to_string(),
        context: String::new(),
        constraints: vec![
            "Be specific and unambiguous.".to_string(),
            "Ask for missing information succinctly.".to_string(),
            "No private data or secrets.".to_string(),
        ],
        tone: "Concise, direct, expert".to_string(),
        style_guidelines: "Prefer lists and structure over prose when helpful.".to_string(),
        output_format: "Return a final prompt under a `Final Prompt` heading. If clarifying questions are needed, include them first under a `Questions` heading.".to_string(),
        language: "English".to_string(),
        steps: vec![
            "Clarify the goal in one sentence.".to_string(),
            "List key constraints and success criteria.".to_string(),
            "Propose structure and outputs.".to_string(),
            "Assemble final prompt in sections.".to_string(),
        ],
        keywords: vec![
            "precise".to_string(),
            "robust".to_string(),
            "reproducible".to_string(),
        ],
        avoid: vec!["vague terms".to_string(), "unbounded scopes".to_string()],
        examples: Vec::new(),
        model_preference: "gpt-4o-mini".to_string(),
        temperature: Some(0.2),
        max_tokens: Some(800),
        system_preamble: "You are a careful prompt engineer. Produce prompts optimized for clarity, safety, and performance.".to_string(),
    }
}
