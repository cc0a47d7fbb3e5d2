pub mod advisor;
pub mod cache;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod render;
pub mod session;
pub mod templates;

pub use cache::{MemoryStore, SqliteCache, StateStore};
pub use codec::{decode, encode};
pub use error::{PromptMakerError, Result};
pub use model::{default_spec, merge, FewShotExample, PromptPatch, PromptSpec};
pub use normalize::{normalize_list, trim_multiline};
pub use render::render;
pub use session::PromptSession;
