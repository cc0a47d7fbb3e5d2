//! Turns a [`PromptSpec`] into the final prompt text.
//!
//! Sections appear in a fixed order and a section is left out entirely when
//! it would have no body. Surviving sections are separated by one blank line:
//!
//! ```text
//! System, Role, Objective, Context, Constraints, Process, Vocabulary,
//! Few-shot Examples, Style, Output Format, Language, Generation Preferences
//! ```

use crate::model::{FewShotExample, PromptSpec};
use crate::normalize::{normalize_list, trim_multiline};

/// Section titles in render order.
pub const SECTION_TITLES: [&str; 12] = [
    "System",
    "Role",
    "Objective",
    "Context",
    "Constraints",
    "Process",
    "Vocabulary",
    "Few-shot Examples",
    "Style",
    "Output Format",
    "Language",
    "Generation Preferences",
];

/// One titled block of the rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: String,
}

impl Section {
    fn new(title: &'static str, body: impl Into<String>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// `"{title}\n{body}"`, trimmed.
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.body).trim().to_string()
    }
}

/// Render the spec. Pure: the same spec always gives the same text.
pub fn render(spec: &PromptSpec) -> String {
    sections(spec)
        .iter()
        .map(Section::text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The non-empty sections of `spec`, in render order.
pub fn sections(spec: &PromptSpec) -> Vec<Section> {
    let mut sections = Vec::new();

    let system = spec.system_preamble.trim();
    if !system.is_empty() {
        sections.push(Section::new("System", system));
    }

    let mut role_parts = Vec::new();
    if !spec.role.trim().is_empty() {
        role_parts.push(spec.role.trim().to_string());
    }
    if !spec.audience.trim().is_empty() {
        role_parts.push(format!("for {}", spec.audience.trim()));
    }
    if !role_parts.is_empty() {
        sections.push(Section::new("Role", role_parts.join(" ")));
    }

    let objective = spec.objective.trim();
    if !objective.is_empty() {
        sections.push(Section::new("Objective", objective));
    }

    if !spec.context.trim().is_empty() {
        sections.push(Section::new("Context", trim_multiline(&spec.context)));
    }

    let constraints = normalize_list(&spec.constraints);
    if !constraints.is_empty() {
        sections.push(Section::new("Constraints", numbered(&constraints)));
    }

    let steps = normalize_list(&spec.steps);
    if !steps.is_empty() {
        sections.push(Section::new("Process", numbered(&steps)));
    }

    let keywords = normalize_list(&spec.keywords);
    let avoid = normalize_list(&spec.avoid);
    if !keywords.is_empty() || !avoid.is_empty() {
        let mut lines = Vec::new();
        if !keywords.is_empty() {
            lines.push(format!("Use: {}", keywords.join(", ")));
        }
        if !avoid.is_empty() {
            lines.push(format!("Avoid: {}", avoid.join(", ")));
        }
        sections.push(Section::new("Vocabulary", lines.join("\n")));
    }

    // Fallback titles count every example, including inactive ones.
    let blocks: Vec<String> = spec
        .examples
        .iter()
        .enumerate()
        .filter(|(_, example)| example.is_active())
        .map(|(index, example)| example_block(index, example))
        .collect();
    if !blocks.is_empty() {
        sections.push(Section::new("Few-shot Examples", blocks.join("\n\n")));
    }

    let tone = spec.tone.trim();
    let has_style = !spec.style_guidelines.trim().is_empty();
    if !tone.is_empty() || has_style {
        let mut lines = Vec::new();
        if !tone.is_empty() {
            lines.push(format!("Tone: {}", tone));
        }
        if has_style {
            lines.push(format!("Style: {}", trim_multiline(&spec.style_guidelines)));
        }
        sections.push(Section::new("Style", lines.join("\n")));
    }

    if !spec.output_format.trim().is_empty() {
        sections.push(Section::new("Output Format", trim_multiline(&spec.output_format)));
    }

    let language = spec.language.trim();
    if !language.is_empty() {
        sections.push(Section::new("Language", language));
    }

    let mut preferences = Vec::new();
    if !spec.model_preference.trim().is_empty() {
        preferences.push(format!("Model: {}", spec.model_preference));
    }
    if let Some(temperature) = spec.temperature {
        preferences.push(format!("Temperature: {}", temperature));
    }
    if let Some(max_tokens) = spec.max_tokens {
        preferences.push(format!("Max Tokens: {}", max_tokens));
    }
    if !preferences.is_empty() {
        sections.push(Section::new("Generation Preferences", preferences.join("\n")));
    }

    sections
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn example_block(index: usize, example: &FewShotExample) -> String {
    let title = match example.title.trim() {
        "" => format!("Example {}", index + 1),
        title => title.to_string(),
    };

    let mut lines = vec![format!("- {}:", title)];
    let input = trim_multiline(&example.input);
    if !input.is_empty() {
        lines.push(format!("Input:\n{}", input));
    }
    let output = trim_multiline(&example.output);
    if !output.is_empty() {
        lines.push(format!("Expected:\n{}", output));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_spec;

    fn empty_spec() -> PromptSpec {
        PromptSpec::empty()
    }

    #[test]
    fn test_empty_spec_renders_nothing() {
        assert_eq!(render(&empty_spec()), "");
        assert!(sections(&empty_spec()).is_empty());
    }

    #[test]
    fn test_whitespace_only_fields_render_nothing() {
        let spec = PromptSpec {
            role: "  ".to_string(),
            context: "\n\t\n".to_string(),
            constraints: vec!["   ".to_string(), String::new()],
            model_preference: " ".to_string(),
            examples: vec![FewShotExample::new("Has title", "  ", "out")],
            ..empty_spec()
        };
        assert_eq!(render(&spec), "");
    }

    #[test]
    fn test_objective_only() {
        let spec = PromptSpec {
            objective: "Write a haiku.".to_string(),
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Objective\nWrite a haiku.");
    }

    #[test]
    fn test_constraints_are_numbered() {
        let spec = PromptSpec {
            constraints: vec!["Be terse.".to_string(), "No emoji.".to_string()],
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Constraints\n1. Be terse.\n2. No emoji.");
    }

    #[test]
    fn test_blank_list_entries_do_not_consume_numbers() {
        let spec = PromptSpec {
            steps: vec![" ".to_string(), "First".to_string(), "".to_string(), "Second ".to_string()],
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Process\n1. First\n2. Second");
    }

    #[test]
    fn test_untitled_example() {
        let spec = PromptSpec {
            examples: vec![FewShotExample::new("", "2+2", "4")],
            ..empty_spec()
        };
        assert_eq!(
            render(&spec),
            "Few-shot Examples\n- Example 1:\nInput:\n2+2\nExpected:\n4"
        );
    }

    #[test]
    fn test_example_fallback_title_counts_inactive_examples() {
        let spec = PromptSpec {
            examples: vec![
                FewShotExample::new("", "   ", "ignored"),
                FewShotExample::new("  ", "hello  \n  world", ""),
                FewShotExample::new("Named", "x", "y"),
            ],
            ..empty_spec()
        };
        assert_eq!(
            render(&spec),
            "Few-shot Examples\n- Example 2:\nInput:\nhello\n  world\n\n- Named:\nInput:\nx\nExpected:\ny"
        );
    }

    #[test]
    fn test_vocabulary_keywords_only() {
        let spec = PromptSpec {
            keywords: vec!["fast".to_string()],
            ..empty_spec()
        };
        let sections = sections(&spec);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Vocabulary");
        assert_eq!(sections[0].body, "Use: fast");
    }

    #[test]
    fn test_vocabulary_both_lines() {
        let spec = PromptSpec {
            keywords: vec!["a".to_string(), "b".to_string()],
            avoid: vec!["c".to_string()],
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Vocabulary\nUse: a, b\nAvoid: c");
    }

    #[test]
    fn test_role_with_audience_only() {
        let spec = PromptSpec {
            audience: " students ".to_string(),
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Role\nfor students");

        let spec = PromptSpec {
            role: "Tutor".to_string(),
            ..spec
        };
        assert_eq!(render(&spec), "Role\nTutor for students");
    }

    #[test]
    fn test_style_lines() {
        let spec = PromptSpec {
            style_guidelines: "Short lines.  \nNo jargon.\n".to_string(),
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Style\nStyle: Short lines.\nNo jargon.");

        let spec = PromptSpec {
            tone: "Warm".to_string(),
            ..spec
        };
        assert_eq!(render(&spec), "Style\nTone: Warm\nStyle: Short lines.\nNo jargon.");
    }

    #[test]
    fn test_generation_preferences() {
        let spec = PromptSpec {
            temperature: Some(0.2),
            max_tokens: Some(800),
            ..empty_spec()
        };
        assert_eq!(
            render(&spec),
            "Generation Preferences\nTemperature: 0.2\nMax Tokens: 800"
        );

        let spec = PromptSpec {
            model_preference: "gpt-4o-mini".to_string(),
            temperature: Some(1.0),
            max_tokens: None,
            ..empty_spec()
        };
        assert_eq!(
            render(&spec),
            "Generation Preferences\nModel: gpt-4o-mini\nTemperature: 1"
        );
    }

    #[test]
    fn test_zero_temperature_is_present() {
        let spec = PromptSpec {
            temperature: Some(0.0),
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Generation Preferences\nTemperature: 0");
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let mut spec = default_spec();
        spec.context = "Some context".to_string();
        spec.examples = vec![FewShotExample::new("", "in", "out")];

        let titles: Vec<&str> = sections(&spec).iter().map(|s| s.title).collect();
        assert_eq!(titles, SECTION_TITLES.to_vec());

        let text = render(&spec);
        let mut last = 0;
        for title in SECTION_TITLES {
            let pos = text.find(&format!("{}\n", title)).unwrap();
            assert!(pos >= last, "{title} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_sections_separated_by_one_blank_line() {
        let spec = PromptSpec {
            objective: "Goal".to_string(),
            language: "French".to_string(),
            ..empty_spec()
        };
        assert_eq!(render(&spec), "Objective\nGoal\n\nLanguage\nFrench");
    }

    #[test]
    fn test_default_spec_render() {
        let text = render(&default_spec());
        assert!(text.starts_with("System\nYou are a careful prompt engineer."));
        assert!(text.contains("Role\nWorld-class expert agent for Product engineers and researchers"));
        assert!(text.contains("Vocabulary\nUse: precise, robust, reproducible\nAvoid: vague terms, unbounded scopes"));
        assert!(text.ends_with("Model: gpt-4o-mini\nTemperature: 0.2\nMax Tokens: 800"));
        assert!(!text.contains("Context"));
        assert_eq!(render(&default_spec()), text);
    }
}
