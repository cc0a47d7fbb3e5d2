//! The optional "improve" step.
//!
//! An advisor looks at the current spec and may suggest a [`PromptPatch`].
//! Any failure along the way (no key, network, bad status, unparsable body)
//! simply means no suggestion.

mod client;
pub mod server;

pub use client::{OpenAiAdvisor, RemoteAdvisor};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::model::{PromptPatch, PromptSpec};

/// Body of `POST /api/rewrite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub prompt: PromptSpec,
}

/// Response of `POST /api/rewrite`. `patch` is `null` when there is no
/// suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteResponse {
    #[serde(default)]
    pub patch: Option<PromptPatch>,
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("advisor is disabled (no API key configured)")]
    Disabled,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("advisor returned status {0}")]
    Status(u16),

    #[error("advisor response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("advisor response has no patch")]
    NoPatch,
}

pub enum Advisor {
    /// Never suggests anything
    Disabled,
    /// Talks to an OpenAI-compatible chat completions API
    OpenAi(OpenAiAdvisor),
    /// Posts to another instance's `/api/rewrite`
    Remote(RemoteAdvisor),
}

impl Advisor {
    /// OpenAI-backed when an API key is configured, disabled otherwise.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        if !config.is_enabled() {
            debug!("no API key configured, advisor disabled");
            return Ok(Advisor::Disabled);
        }
        Ok(Advisor::OpenAi(OpenAiAdvisor::new(config)?))
    }

    pub fn remote(endpoint: &str, config: &AdvisorConfig) -> Result<Self> {
        Ok(Advisor::Remote(RemoteAdvisor::new(endpoint, config)?))
    }

    pub async fn try_suggest(&self, spec: &PromptSpec) -> std::result::Result<PromptPatch, AdvisorError> {
        match self {
            Advisor::Disabled => Err(AdvisorError::Disabled),
            Advisor::OpenAi(advisor) => advisor.suggest(spec).await,
            Advisor::Remote(advisor) => advisor.suggest(spec).await,
        }
    }

    /// A non-empty patch, or `None` when there is nothing to suggest.
    pub async fn suggest(&self, spec: &PromptSpec) -> Option<PromptPatch> {
        match self.try_suggest(spec).await {
            Ok(patch) if !patch.is_empty() => Some(patch),
            Ok(_) => {
                debug!("advisor returned an empty patch");
                None
            }
            Err(AdvisorError::Disabled) => None,
            Err(e) => {
                warn!(error = %e, "advisor unavailable");
                None
            }
        }
    }
}
