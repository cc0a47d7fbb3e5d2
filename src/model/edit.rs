//! Input-layer edits. Each returns a new value; nothing is edited in place.

use std::str::FromStr;

use super::{FewShotExample, PromptSpec};
use crate::error::{PromptMakerError, Result};

/// Append a trimmed item unless it is blank or already present.
pub fn add_item(items: &[String], draft: &str) -> Vec<String> {
    let value = draft.trim();
    let mut next = items.to_vec();
    if value.is_empty() || items.iter().any(|item| item == value) {
        return next;
    }
    next.push(value.to_string());
    next
}

/// Remove every entry equal to the trimmed `value`.
pub fn remove_item(items: &[String], value: &str) -> Vec<String> {
    let value = value.trim();
    items.iter().filter(|item| *item != value).cloned().collect()
}

/// Drop the last entry.
pub fn pop_item(items: &[String]) -> Vec<String> {
    let mut next = items.to_vec();
    next.pop();
    next
}

/// Append a blank example titled after its position.
pub fn add_example(examples: &[FewShotExample]) -> Vec<FewShotExample> {
    let mut next = examples.to_vec();
    next.push(FewShotExample::new(
        format!("Example {}", examples.len() + 1),
        "",
        "",
    ));
    next
}

pub fn remove_example(examples: &[FewShotExample], index: usize) -> Result<Vec<FewShotExample>> {
    check_index(examples, index)?;
    let mut next = examples.to_vec();
    next.remove(index);
    Ok(next)
}

/// Fields of a single example to overwrite.
#[derive(Debug, Clone, Default)]
pub struct ExampleUpdate {
    pub title: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
}

pub fn update_example(
    examples: &[FewShotExample],
    index: usize,
    update: ExampleUpdate,
) -> Result<Vec<FewShotExample>> {
    check_index(examples, index)?;
    let mut next = examples.to_vec();
    let target = &mut next[index];
    if let Some(title) = update.title {
        target.title = title;
    }
    if let Some(input) = update.input {
        target.input = input;
    }
    if let Some(output) = update.output {
        target.output = output;
    }
    Ok(next)
}

fn check_index(examples: &[FewShotExample], index: usize) -> Result<()> {
    if index >= examples.len() {
        return Err(PromptMakerError::ExampleOutOfRange {
            index,
            len: examples.len(),
        });
    }
    Ok(())
}

/// The string-list fields of a [`PromptSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Constraints,
    Steps,
    Keywords,
    Avoid,
}

impl ListField {
    pub fn get(self, spec: &PromptSpec) -> &[String] {
        match self {
            ListField::Constraints => &spec.constraints,
            ListField::Steps => &spec.steps,
            ListField::Keywords => &spec.keywords,
            ListField::Avoid => &spec.avoid,
        }
    }

    /// Return a copy of `spec` with this field replaced.
    pub fn with(self, spec: &PromptSpec, items: Vec<String>) -> PromptSpec {
        let mut next = spec.clone();
        match self {
            ListField::Constraints => next.constraints = items,
            ListField::Steps => next.steps = items,
            ListField::Keywords => next.keywords = items,
            ListField::Avoid => next.avoid = items,
        }
        next
    }
}

impl FromStr for ListField {
    type Err = PromptMakerError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_field_name(s).as_str() {
            "constraints" => Ok(ListField::Constraints),
            "steps" => Ok(ListField::Steps),
            "keywords" => Ok(ListField::Keywords),
            "avoid" => Ok(ListField::Avoid),
            _ => Err(PromptMakerError::NotAListField(s.to_string())),
        }
    }
}

/// Set a scalar field by name, accepting camelCase or snake_case.
///
/// Numeric fields parse `value`; an empty value or `none` clears them.
pub fn set_field(spec: &PromptSpec, field: &str, value: &str) -> Result<PromptSpec> {
    let mut next = spec.clone();
    match normalize_field_name(field).as_str() {
        "role" => next.role = value.to_string(),
        "audience" => next.audience = value.to_string(),
        "objective" => next.objective = value.to_string(),
        "context" => next.context = value.to_string(),
        "tone" => next.tone = value.to_string(),
        "styleguidelines" => next.style_guidelines = value.to_string(),
        "outputformat" => next.output_format = value.to_string(),
        "language" => next.language = value.to_string(),
        "modelpreference" => next.model_preference = value.to_string(),
        "systempreamble" => next.system_preamble = value.to_string(),
        "temperature" => next.temperature = parse_temperature(field, value)?,
        "maxtokens" => next.max_tokens = parse_optional(field, value)?,
        "constraints" | "steps" | "keywords" | "avoid" | "examples" => {
            return Err(PromptMakerError::InvalidFieldValue {
                field: field.to_string(),
                value: value.to_string(),
            })
        }
        _ => return Err(PromptMakerError::UnknownField(field.to_string())),
    }
    Ok(next)
}

/// `f64` parsing accepts `inf` and `NaN`, which JSON cannot carry.
fn parse_temperature(field: &str, value: &str) -> Result<Option<f64>> {
    match parse_optional::<f64>(field, value)? {
        Some(t) if !t.is_finite() => Err(PromptMakerError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
        parsed => Ok(parsed),
    }
}

fn parse_optional<T: FromStr>(field: &str, value: &str) -> Result<Option<T>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| PromptMakerError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
