//! A bounded cache of compiled expressions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use htmlpath_xpath1::{Expression, XPathError};

/// Configuration for a [`QueryCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of compiled expressions kept before the store is reset.
    /// A capacity of zero disables storage, like `enabled: false`.
    pub max_entries: usize,
    /// When false, every lookup compiles fresh and nothing is stored.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: 50,
            enabled: true,
        }
    }
}

/// A thread-safe store of compiled expressions keyed by their source
/// text.
///
/// Query workloads tend to reuse a handful of distinct expressions
/// across many documents, so eviction is deliberately coarse: once the
/// store is full it is discarded wholesale before the next insert,
/// instead of tracking per-entry recency.
#[derive(Debug, Default)]
pub struct QueryCache {
    config: CacheConfig,
    entries: Mutex<HashMap<String, Arc<Expression>>>,
}

impl QueryCache {
    /// A cache with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache with explicit capacity and enablement.
    pub fn with_config(config: CacheConfig) -> Self {
        QueryCache {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the compiled form of `path`, compiling and storing it on
    /// a miss.
    ///
    /// Lookup, compilation, and insert all happen under one lock, so a
    /// concurrent caller never observes the bulk eviction below losing
    /// an entry it was just promised. Compile failures are returned
    /// without being stored; a later call with the same text compiles
    /// again rather than replaying a stale error.
    pub fn get_or_compile(&self, path: &str) -> Result<Arc<Expression>, XPathError> {
        if !self.config.enabled || self.config.max_entries == 0 {
            return Ok(Arc::new(Expression::compile(path)?));
        }

        let mut entries = self.locked();
        if let Some(compiled) = entries.get(path) {
            return Ok(Arc::clone(compiled));
        }

        let compiled = Arc::new(Expression::compile(path)?);
        if entries.len() >= self.config.max_entries {
            log::debug!(
                "expression cache reached {} entries, discarding all of them",
                entries.len()
            );
            entries.clear();
        }
        entries.insert(path.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of compiled expressions currently stored.
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    /// Whether a compiled form of `path` is stored right now.
    pub fn contains(&self, path: &str) -> bool {
        self.locked().contains_key(path)
    }

    /// Discards every stored expression.
    pub fn clear(&self) {
        self.locked().clear();
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, Arc<Expression>>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            // A panic elsewhere cannot leave the map half-written; single
            // inserts and clears keep it consistent, so keep serving.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
