//! The owner of the current [`PromptSpec`].
//!
//! A session starts from a share token, else from the cached spec, else from
//! [`default_spec`]. Every change replaces the spec and writes it back to the
//! injected store. Store failures are logged and otherwise ignored.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::cache::StateStore;
use crate::codec;
use crate::error::Result;
use crate::model::{default_spec, merge, PromptPatch, PromptSpec};
use crate::render::render;
use crate::templates::find_template;

/// Cache key for the last-used spec.
pub const STATE_KEY: &str = "prompt-maker-state";

/// Default file name for exported prompts.
pub const EXPORT_FILE: &str = "prompt.txt";

/// Where the session's initial spec came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOrigin {
    Token,
    Cache,
    Default,
}

pub struct PromptSession<S: StateStore> {
    store: S,
    spec: PromptSpec,
    origin: StateOrigin,
}

impl<S: StateStore> PromptSession<S> {
    /// Start a session. A token that decodes takes precedence over the cache.
    pub fn open(store: S, token: Option<&str>) -> Self {
        let (spec, origin) = if let Some(spec) = codec::decode(token) {
            (spec, StateOrigin::Token)
        } else if let Some(spec) = load_cached(&store) {
            (spec, StateOrigin::Cache)
        } else {
            (default_spec(), StateOrigin::Default)
        };
        info!(?origin, "prompt session opened");

        let session = Self {
            store,
            spec,
            origin,
        };
        session.persist();
        session
    }

    pub fn spec(&self) -> &PromptSpec {
        &self.spec
    }

    pub fn origin(&self) -> StateOrigin {
        self.origin
    }

    pub fn into_spec(self) -> PromptSpec {
        self.spec
    }

    /// Swap in a whole new spec.
    pub fn replace(&mut self, spec: PromptSpec) {
        self.spec = spec;
        self.persist();
    }

    /// Derive the next spec from the current one.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&PromptSpec) -> Result<PromptSpec>,
    {
        let next = f(&self.spec)?;
        self.replace(next);
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: &PromptPatch) {
        if patch.is_empty() {
            debug!("empty patch, nothing to apply");
            return;
        }
        debug!(keys = ?patch.keys(), "applying patch");
        let next = merge(&self.spec, patch);
        self.replace(next);
    }

    pub fn apply_template(&mut self, id: &str) -> Result<()> {
        let template = find_template(id)?;
        self.apply_patch(&template.seed);
        Ok(())
    }

    /// Back to the built-in default spec.
    pub fn reset(&mut self) {
        self.replace(default_spec());
    }

    pub fn render(&self) -> String {
        render(&self.spec)
    }

    pub fn token(&self) -> String {
        codec::encode(&self.spec)
    }

    pub fn share_url(&self, base: &str) -> String {
        codec::share_url(base, &self.spec)
    }

    /// Write the rendered prompt to `path` as UTF-8.
    pub fn export(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.spec) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize prompt state");
                return;
            }
        };
        if let Err(e) = self.store.set(STATE_KEY, &json) {
            warn!(error = %e, "failed to cache prompt state");
        }
    }
}

fn load_cached<S: StateStore>(store: &S) -> Option<PromptSpec> {
    let raw = match store.get(STATE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "failed to read cached prompt state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(spec) => Some(spec),
        Err(e) => {
            debug!(error = %e, "ignoring unreadable cached prompt state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::error::PromptMakerError;
    use crate::model::set_field;
    use tempfile::TempDir;

    struct FailingStore;

    impl StateStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PromptMakerError::Storage("offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PromptMakerError::Storage("offline".to_string()))
        }
    }

    #[test]
    fn test_fresh_session_uses_default_and_caches_it() {
        let store = MemoryStore::new();
        let session = PromptSession::open(&store, None);

        assert_eq!(session.origin(), StateOrigin::Default);
        assert_eq!(session.spec(), &default_spec());
        assert!(store.get(STATE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_token_wins_over_cache() {
        let store = MemoryStore::new();
        let cached = PromptSpec {
            role: "cached".to_string(),
            ..PromptSpec::empty()
        };
        store
            .set(STATE_KEY, &serde_json::to_string(&cached).unwrap())
            .unwrap();
        let shared = PromptSpec {
            role: "shared".to_string(),
            ..PromptSpec::empty()
        };
        let token = codec::encode(&shared);

        let session = PromptSession::open(&store, Some(token.as_str()));

        assert_eq!(session.origin(), StateOrigin::Token);
        assert_eq!(session.spec().role, "shared");
    }

    #[test]
    fn test_bad_token_falls_back_to_cache() {
        let store = MemoryStore::new();
        let cached = PromptSpec {
            objective: "from cache".to_string(),
            ..PromptSpec::empty()
        };
        store
            .set(STATE_KEY, &serde_json::to_string(&cached).unwrap())
            .unwrap();

        let session = PromptSession::open(&store, Some("%%%"));

        assert_eq!(session.origin(), StateOrigin::Cache);
        assert_eq!(session.spec(), &cached);
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set(STATE_KEY, "{not json").unwrap();

        let session = PromptSession::open(&store, None);

        assert_eq!(session.origin(), StateOrigin::Default);
    }

    #[test]
    fn test_changes_are_persisted() {
        let store = MemoryStore::new();
        {
            let mut session = PromptSession::open(&store, None);
            session
                .update(|spec| set_field(spec, "objective", "Summarize the text."))
                .unwrap();
        }

        let reopened = PromptSession::open(&store, None);
        assert_eq!(reopened.origin(), StateOrigin::Cache);
        assert_eq!(reopened.spec().objective, "Summarize the text.");
    }

    #[test]
    fn test_failed_update_leaves_state_alone() {
        let store = MemoryStore::new();
        let mut session = PromptSession::open(&store, None);

        let result = session.update(|spec| set_field(spec, "bogus", "x"));

        assert!(result.is_err());
        assert_eq!(session.spec(), &default_spec());
    }

    #[test]
    fn test_apply_template_and_reset() {
        let store = MemoryStore::new();
        let mut session = PromptSession::open(&store, None);

        session.apply_template("research-assistant").unwrap();
        assert_eq!(session.spec().role, "Research assistant");
        assert!(session.apply_template("missing").is_err());

        session.reset();
        assert_eq!(session.spec(), &default_spec());
    }

    #[test]
    fn test_store_failures_are_absorbed() {
        let mut session = PromptSession::open(FailingStore, None);
        assert_eq!(session.origin(), StateOrigin::Default);

        session.apply_patch(&PromptPatch {
            tone: Some("Playful".to_string()),
            ..Default::default()
        });
        assert_eq!(session.spec().tone, "Playful");
    }

    #[test]
    fn test_share_url_round_trips() {
        let store = MemoryStore::new();
        let session = PromptSession::open(&store, None);

        let url = session.share_url("https://prompts.example/");
        let token = codec::token_from_url(&url);
        assert_eq!(codec::decode(token).as_ref(), Some(session.spec()));
    }

    #[test]
    fn test_export_writes_rendered_text() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let session = PromptSession::open(&store, None);
        let path = tmp.path().join(EXPORT_FILE);

        session.export(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), session.render());
    }
}
