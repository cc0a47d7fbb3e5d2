//! Partial prompt specs and the shallow merge that applies them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{FewShotExample, PromptSpec};

/// A partial [`PromptSpec`]: every field optional.
///
/// Produced by template seeds and by the remote advisor. Deserialization is
/// lenient: unknown keys and values of the wrong type are dropped rather than
/// failing the whole patch. For `temperature` and `maxTokens` an explicit
/// `null` is kept and clears the value on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_guidelines: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<FewShotExample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_preamble: Option<String>,
}

impl PromptPatch {
    /// Coerce an untyped JSON value into a patch.
    ///
    /// Anything that is not an object yields an empty patch.
    pub fn from_value(value: &Value) -> Self {
        let mut patch = Self::default();

        let Some(obj) = value.as_object() else {
            debug!("patch is not a JSON object, ignoring");
            return patch;
        };

        for (key, value) in obj {
            match key.as_str() {
                "role" => patch.role = coerce(key, value),
                "audience" => patch.audience = coerce(key, value),
                "objective" => patch.objective = coerce(key, value),
                "context" => patch.context = coerce(key, value),
                "constraints" => patch.constraints = coerce(key, value),
                "tone" => patch.tone = coerce(key, value),
                "styleGuidelines" => patch.style_guidelines = coerce(key, value),
                "outputFormat" => patch.output_format = coerce(key, value),
                "language" => patch.language = coerce(key, value),
                "steps" => patch.steps = coerce(key, value),
                "keywords" => patch.keywords = coerce(key, value),
                "avoid" => patch.avoid = coerce(key, value),
                "examples" => patch.examples = coerce(key, value),
                "modelPreference" => patch.model_preference = coerce(key, value),
                "temperature" => patch.temperature = coerce_nullable(key, value),
                "maxTokens" => patch.max_tokens = coerce_nullable(key, value),
                "systemPreamble" => patch.system_preamble = coerce(key, value),
                _ => debug!(key = key.as_str(), "dropping unknown patch key"),
            }
        }

        patch
    }

    /// True when applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Wire names of the keys present in this patch, in field order.
    pub fn keys(&self) -> Vec<&'static str> {
        let present = [
            ("role", self.role.is_some()),
            ("audience", self.audience.is_some()),
            ("objective", self.objective.is_some()),
            ("context", self.context.is_some()),
            ("constraints", self.constraints.is_some()),
            ("tone", self.tone.is_some()),
            ("styleGuidelines", self.style_guidelines.is_some()),
            ("outputFormat", self.output_format.is_some()),
            ("language", self.language.is_some()),
            ("steps", self.steps.is_some()),
            ("keywords", self.keywords.is_some()),
            ("avoid", self.avoid.is_some()),
            ("examples", self.examples.is_some()),
            ("modelPreference", self.model_preference.is_some()),
            ("temperature", self.temperature.is_some()),
            ("maxTokens", self.max_tokens.is_some()),
            ("systemPreamble", self.system_preamble.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(key, is_set)| is_set.then_some(key))
            .collect()
    }
}

impl<'de> Deserialize<'de> for PromptPatch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn coerce<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(key, error = %e, "dropping mistyped patch value");
            None
        }
    }
}

fn coerce_nullable<T: DeserializeOwned>(key: &str, value: &Value) -> Option<Option<T>> {
    if value.is_null() {
        return Some(None);
    }
    coerce(key, value).map(Some)
}

/// Shallow merge: every key present in `patch` replaces the base value
/// wholesale. Lists are replaced, never appended.
pub fn merge(base: &PromptSpec, patch: &PromptPatch) -> PromptSpec {
    let mut next = base.clone();

    if let Some(v) = &patch.role {
        next.role = v.clone();
    }
    if let Some(v) = &patch.audience {
        next.audience = v.clone();
    }
    if let Some(v) = &patch.objective {
        next.objective = v.clone();
    }
    if let Some(v) = &patch.context {
        next.context = v.clone();
    }
    if let Some(v) = &patch.constraints {
        next.constraints = v.clone();
    }
    if let Some(v) = &patch.tone {
        next.tone = v.clone();
    }
    if let Some(v) = &patch.style_guidelines {
        next.style_guidelines = v.clone();
    }
    if let Some(v) = &patch.output_format {
        next.output_format = v.clone();
    }
    if let Some(v) = &patch.language {
        next.language = v.clone();
    }
    if let Some(v) = &patch.steps {
        next.steps = v.clone();
    }
    if let Some(v) = &patch.keywords {
        next.keywords = v.clone();
    }
    if let Some(v) = &patch.avoid {
        next.avoid = v.clone();
    }
    if let Some(v) = &patch.examples {
        next.examples = v.clone();
    }
    if let Some(v) = &patch.model_preference {
        next.model_preference = v.clone();
    }
    if let Some(v) = patch.temperature {
        next.temperature = v;
    }
    if let Some(v) = patch.max_tokens {
        next.max_tokens = v;
    }
    if let Some(v) = &patch.system_preamble {
        next.system_preamble = v.clone();
    }

    next
}
