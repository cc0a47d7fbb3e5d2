use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{AdvisorError, RewriteRequest, RewriteResponse};
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::model::{PromptPatch, PromptSpec};

const SYSTEM_PROMPT: &str = "You improve prompt blueprints. \
Return ONLY a compact JSON patch with optional keys that refine the prompt state. \
Prefer improving styleGuidelines, constraints, steps, and outputFormat for clarity. \
Never include secrets or unsafe instructions.";

const USER_PREAMBLE: &str = "Given this prompt-building state, return a JSON object with a 'patch' key. \
The patch may include updated styleGuidelines, constraints, steps, outputFormat, or systemPreamble. \
Keep it minimal and high-signal.\n\n";

fn build_client(config: &AdvisorConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Calls an OpenAI-compatible `/chat/completions` endpoint directly.
pub struct OpenAiAdvisor {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl std::fmt::Debug for OpenAiAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdvisor")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage>,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct StatePayload<'a> {
    state: &'a PromptSpec,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiAdvisor {
    pub fn new(config: &AdvisorConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            client: build_client(config)?,
        })
    }

    pub async fn suggest(&self, spec: &PromptSpec) -> std::result::Result<PromptPatch, AdvisorError> {
        let state = serde_json::to_string(&StatePayload { state: spec })?;
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{}{}", USER_PREAMBLE, state),
                },
            ],
            response_format: json!({ "type": "json_object" }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "requesting advisor patch");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let body: ChatResponse = serde_json::from_str(&response.text().await?)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_string());

        patch_from_content(&content)
    }
}

/// Pull `.patch` out of the model's JSON reply.
fn patch_from_content(content: &str) -> std::result::Result<PromptPatch, AdvisorError> {
    let parsed: Value = serde_json::from_str(content)?;
    match parsed.get("patch") {
        Some(patch) if patch.is_object() => Ok(PromptPatch::from_value(patch)),
        _ => Err(AdvisorError::NoPatch),
    }
}

/// Delegates to a `/api/rewrite` endpoint served by [`super::server`].
#[derive(Debug)]
pub struct RemoteAdvisor {
    endpoint: String,
    client: Client,
}

impl RemoteAdvisor {
    pub fn new(endpoint: &str, config: &AdvisorConfig) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: build_client(config)?,
        })
    }

    pub async fn suggest(&self, spec: &PromptSpec) -> std::result::Result<PromptPatch, AdvisorError> {
        let request = RewriteRequest {
            prompt: spec.clone(),
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let body: RewriteResponse = serde_json::from_str(&response.text().await?)?;
        body.patch.ok_or(AdvisorError::NoPatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::Advisor;
    use crate::model::default_spec;
    use mockito::Matcher;

    fn config_for(base_url: String) -> AdvisorConfig {
        AdvisorConfig {
            api_key: Some("sk-test".to_string()),
            base_url,
            timeout_secs: 5,
            ..Default::default()
        }
    }

    fn completion(content: &str) -> String {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
            .to_string()
    }

    #[test]
    fn test_patch_from_content() {
        let patch = patch_from_content(r#"{"patch":{"steps":["One"],"bogus":1}}"#).unwrap();
        assert_eq!(patch.steps, Some(vec!["One".to_string()]));
        assert_eq!(patch.keys(), vec!["steps"]);

        assert!(matches!(patch_from_content("{}"), Err(AdvisorError::NoPatch)));
        assert!(matches!(
            patch_from_content(r#"{"patch":null}"#),
            Err(AdvisorError::NoPatch)
        ));
        assert!(matches!(patch_from_content("not json"), Err(AdvisorError::Json(_))));
    }

    #[tokio::test]
    async fn test_openai_advisor_returns_patch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion(r#"{"patch":{"outputFormat":"A table."}}"#))
            .create_async()
            .await;

        let advisor = Advisor::from_config(&config_for(server.url())).unwrap();
        let patch = advisor.suggest(&default_spec()).await.unwrap();

        assert_eq!(patch.output_format.as_deref(), Some("A table."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_openai_advisor_error_status_is_no_suggestion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let advisor = Advisor::from_config(&config_for(server.url())).unwrap();
        assert!(advisor.suggest(&default_spec()).await.is_none());
        assert!(matches!(
            advisor.try_suggest(&default_spec()).await,
            Err(AdvisorError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_openai_advisor_garbage_content_is_no_suggestion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("I think you should add more steps."))
            .create_async()
            .await;

        let advisor = Advisor::from_config(&config_for(server.url())).unwrap();
        assert!(advisor.suggest(&default_spec()).await.is_none());
    }

    #[tokio::test]
    async fn test_remote_advisor_reads_patch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/rewrite")
            .match_body(Matcher::PartialJson(json!({ "prompt": { "language": "English" } })))
            .with_status(200)
            .with_body(r#"{"patch":{"language":"German"}}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/api/rewrite", server.url());
        let advisor = Advisor::remote(&endpoint, &AdvisorConfig::default()).unwrap();
        let patch = advisor.suggest(&default_spec()).await.unwrap();

        assert_eq!(patch.language.as_deref(), Some("German"));
    }

    #[tokio::test]
    async fn test_remote_advisor_null_patch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/rewrite")
            .with_status(200)
            .with_body(r#"{"patch":null}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/api/rewrite", server.url());
        let advisor = Advisor::remote(&endpoint, &AdvisorConfig::default()).unwrap();
        assert!(advisor.suggest(&default_spec()).await.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let advisor = OpenAiAdvisor::new(&config_for("http://localhost".to_string())).unwrap();
        let debug = format!("{:?}", advisor);
        assert!(!debug.contains("sk-test"));
    }
}
