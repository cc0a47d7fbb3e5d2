//! Storage for the last-used prompt spec.
//!
//! Sessions are handed a [`StateStore`]: [`SqliteCache`] on disk,
//! [`MemoryStore`] in tests.

mod memory;
mod sqlite_cache;

pub use memory::MemoryStore;
pub use sqlite_cache::SqliteCache;

use crate::error::Result;

/// A minimal string key/value capability.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
