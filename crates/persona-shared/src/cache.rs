//! Caller-owned memoization of engine evaluations.
//!
//! The engine keeps no state between calls. Callers that re-evaluate the same
//! inputs often can hold an [`EvaluationCache`], keyed by the SHA-256 of the
//! JSON encoding of `(history, catalog, config)`.
//!
//! Custom predicates are keyed by label only, and the scorer is not part of
//! the key: use one cache per scorer and give distinct custom rules distinct
//! labels.

use crate::archetype::ArchetypeDefinition;
use crate::classifier::MatchScorer;
use crate::engine::{evaluate_with, EngineConfig, Evaluation};
use crate::error::EngineError;
use crate::session::SessionRecord;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use tracing::debug;

/// Content hash of one set of engine inputs
pub type EvaluationKey = [u8; 32];

/// Default number of cached evaluations
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Hash the inputs of one evaluation
pub fn evaluation_key(
    history: &[SessionRecord],
    catalog: &[ArchetypeDefinition],
    config: &EngineConfig,
) -> Result<EvaluationKey, EngineError> {
    let encoded = serde_json::to_vec(&(history, catalog, config))?;
    let digest = Sha256::digest(&encoded);
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    Ok(key)
}

/// LRU cache of evaluations
pub struct EvaluationCache {
    entries: LruCache<EvaluationKey, Evaluation>,
    hits: u64,
    misses: u64,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl EvaluationCache {
    /// Create a cache holding up to `capacity` evaluations (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached evaluation for these inputs or compute and store it
    pub fn evaluate(
        &mut self,
        history: &[SessionRecord],
        catalog: &[ArchetypeDefinition],
        config: &EngineConfig,
        scorer: &dyn MatchScorer,
    ) -> Result<Evaluation, EngineError> {
        let key = evaluation_key(history, catalog, config)?;
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(cached.clone());
        }

        self.misses += 1;
        debug!(sessions = history.len(), "evaluation cache miss");
        let evaluation = evaluate_with(history, catalog, config, scorer)?;
        self.entries.put(key, evaluation.clone());
        Ok(evaluation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
