//! Share tokens: a [`PromptSpec`] as JSON, base64url-encoded without padding.
//!
//! Tokens go straight into a `?s=` query parameter, so they never contain
//! `/`, `+` or `=`. Decoding accepts padded input as well.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::PromptSpec;

/// Query parameter carrying a share token.
pub const SHARE_PARAM: &str = "s";

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("token is empty")]
    Empty,

    #[error("token is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("token does not hold a prompt spec: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode `spec` as a share token. Returns an empty string if it cannot be
/// serialized.
pub fn encode(spec: &PromptSpec) -> String {
    match try_encode(spec) {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "failed to encode prompt spec");
            String::new()
        }
    }
}

pub fn try_encode(spec: &PromptSpec) -> Result<String, CodecError> {
    let json = serde_json::to_string(spec)?;
    Ok(TOKEN_ENGINE.encode(json.as_bytes()))
}

/// Decode a share token. `None` when absent or malformed.
pub fn decode(token: Option<&str>) -> Option<PromptSpec> {
    let token = token?;
    match try_decode(token) {
        Ok(spec) => Some(spec),
        Err(e) => {
            debug!(error = %e, "ignoring undecodable share token");
            None
        }
    }
}

pub fn try_decode(token: &str) -> Result<PromptSpec, CodecError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CodecError::Empty);
    }
    let bytes = TOKEN_ENGINE.decode(token)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// `"{base}?s={token}"`, or an empty string when the spec can't be encoded.
pub fn share_url(base: &str, spec: &PromptSpec) -> String {
    let token = encode(spec);
    if token.is_empty() {
        return String::new();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base, separator, SHARE_PARAM, token)
}

/// Pull the share token out of a URL or query string, if present.
pub fn token_from_url(url: &str) -> Option<&str> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or(url);
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == SHARE_PARAM).then_some(value)
    })
}
