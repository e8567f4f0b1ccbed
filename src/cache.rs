//! Process-wide memoization cache for built [`crate::Encoding`]s.
//!
//! An external collaborator per spec §5/§9: write-once-per-key, thread-safe,
//! and errors are never cached. Keyed on construction parameters rather than
//! on the resulting table contents, since rebuilding from the same
//! parameters is assumed to be deterministic.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::encoding::Encoding;
use crate::specials::SpecialMatching;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub repo: String,
    pub revision: String,
    pub pattern_source: String,
    pub matching: SpecialMatchingKey,
}

/// [`SpecialMatching`] doesn't derive `Hash`/`Eq` (kept minimal for its own
/// module); this mirrors it for use as a cache-key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMatchingKey {
    Parity,
    Longest,
}

impl From<SpecialMatching> for SpecialMatchingKey {
    fn from(value: SpecialMatching) -> Self {
        match value {
            SpecialMatching::Parity => SpecialMatchingKey::Parity,
            SpecialMatching::Longest => SpecialMatchingKey::Longest,
        }
    }
}

/// A process-wide cache of shared, immutable [`Encoding`]s.
#[derive(Default)]
pub struct EncodingCache {
    entries: RwLock<FxHashMap<CacheKey, Arc<Encoding>>>,
}

impl EncodingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Encoding>> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Returns the cached instance if present; otherwise calls `build`,
    /// inserts the result on success, and returns it. A build error is
    /// propagated but never cached, so the next call retries.
    pub fn get_or_build<F, E>(&self, key: CacheKey, build: F) -> Result<Arc<Encoding>, E>
    where
        F: FnOnce() -> Result<Encoding, E>,
    {
        if let Some(existing) = self.get(&key) {
            return Ok(existing);
        }
        let built = Arc::new(build()?);
        self.entries
            .write()
            .unwrap()
            .entry(key)
            .or_insert_with(|| built.clone());
        Ok(built)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
