//! # Store Contract
//!
//! The `Store` trait is the narrow interface every graph view talks to.
//! [`MemoryStore`] is the in-process implementation; other backends plug in
//! through [`StoreRegistry`] or by handing a constructed store to a graph.
//!
//! All fallible operations return `Result<T, TriplexError>`. Missing data is
//! never an error: unknown terms or contexts yield empty results and removals
//! of absent triples are no-ops.

mod interner;
mod memory;

pub use interner::{IdSource, NodeTable};
pub use memory::MemoryStore;

use crate::config::StoreConfig;
use crate::term::Term;
use crate::{Quad, Triple, TripleChoices, TriplePattern, TriplexError};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// STORE TRAIT
// =============================================================================

/// What a store can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCapabilities {
    /// Named contexts are kept apart.
    pub context_aware: bool,
    /// Quoted (unasserted) triples are supported.
    pub formula_aware: bool,
    /// `commit`/`rollback` delimit real transactions.
    pub transaction_aware: bool,
}

/// Lazy sequence of matches, each with the contexts asserting it.
pub type TripleMatches<'a> = Box<dyn Iterator<Item = Result<(Triple, Vec<Term>), TriplexError>> + 'a>;

/// Lazy sequence of (triple, context) pairs, one per asserting context.
pub type QuadMatches<'a> = Box<dyn Iterator<Item = Result<Quad, TriplexError>> + 'a>;

pub trait Store: Send + Sync + fmt::Debug {
    fn capabilities(&self) -> StoreCapabilities;

    /// Add `triple` to `context`. Adding an existing (triple, context) pair is a no-op.
    /// Quoted triples stay out of the context-free aggregate.
    fn add(&mut self, triple: &Triple, context: &Term, quoted: bool) -> Result<(), TriplexError>;

    /// Register `context` without adding triples to it.
    fn add_context(&mut self, context: &Term, quoted: bool) -> Result<(), TriplexError>;

    /// Remove every match of `pattern` from `context`, or from every context when `None`.
    fn remove(&mut self, pattern: &TriplePattern, context: Option<&Term>)
    -> Result<(), TriplexError>;

    /// Matches of `pattern` in `context`, or in the aggregate of asserted triples when `None`.
    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&Term>,
    ) -> Result<TripleMatches<'_>, TriplexError>;

    /// One `triples` query per alternative, concatenated.
    fn triples_choices(
        &self,
        choices: &TripleChoices,
        context: Option<&Term>,
    ) -> Result<TripleMatches<'_>, TriplexError> {
        let parts = choices
            .patterns()
            .map(|pattern| self.triples(&pattern, context))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(parts.into_iter().flatten()))
    }

    /// Number of (triple, context) pairs, or triples in `context`.
    fn len(&self, context: Option<&Term>) -> Result<usize, TriplexError>;

    /// All registered contexts, or the contexts asserting `triple`.
    fn contexts(&self, triple: Option<&Triple>) -> Result<Vec<Term>, TriplexError>;

    fn bind(&mut self, prefix: &str, namespace: &str) -> Result<(), TriplexError>;
    fn namespace(&self, prefix: &str) -> Option<String>;
    fn prefix(&self, namespace: &str) -> Option<String>;
    fn namespaces(&self) -> Vec<(String, String)>;

    fn open(&mut self, config: &StoreConfig, create: bool) -> Result<(), TriplexError>;
    fn close(&mut self, commit_pending: bool) -> Result<(), TriplexError>;
    fn commit(&mut self) -> Result<(), TriplexError>;
    fn rollback(&mut self) -> Result<(), TriplexError>;
    fn destroy(&mut self, config: &StoreConfig) -> Result<(), TriplexError>;
}

// =============================================================================
// SHARED HANDLES
// =============================================================================

/// A store shared between graph views.
pub type SharedStore = Arc<RwLock<dyn Store>>;

/// Wrap a store so several graphs can view it.
pub fn shared<S: Store + 'static>(store: S) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// Where a graph gets its store from.
#[derive(Clone)]
pub enum StoreSource {
    /// An already constructed store.
    Handle(SharedStore),
    /// A factory registered under this name.
    Named(String),
}

impl fmt::Debug for StoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreSource::Handle(_) => f.write_str("Handle(..)"),
            StoreSource::Named(name) => write!(f, "Named({:?})", name),
        }
    }
}

impl From<SharedStore> for StoreSource {
    fn from(value: SharedStore) -> Self {
        StoreSource::Handle(value)
    }
}

/// Builds a store from configuration.
pub type StoreFactory = fn(&StoreConfig) -> SharedStore;

/// Named store factories.
///
/// Ships with `"IOMemory"` (context aware) and `"Memory"` (flat).
#[derive(Debug, Clone)]
pub struct StoreRegistry {
    factories: BTreeMap<String, StoreFactory>,
}

impl StoreRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        registry.register("IOMemory", |config| shared(MemoryStore::with_config(config.clone())));
        registry.register("Memory", |config| {
            shared(MemoryStore::with_config(StoreConfig {
                context_aware: false,
                formula_aware: false,
                ..config.clone()
            }))
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: StoreFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Resolve a source into a live store.
    pub fn resolve(
        &self,
        source: StoreSource,
        config: &StoreConfig,
    ) -> Result<SharedStore, TriplexError> {
        match source {
            StoreSource::Handle(store) => Ok(store),
            StoreSource::Named(name) => self
                .factories
                .get(&name)
                .map(|factory| factory(config))
                .ok_or(TriplexError::UnknownStore(name)),
        }
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_factories() {
        let registry = StoreRegistry::new();
        let config = StoreConfig::default();

        let io = registry
            .resolve(StoreSource::Named("IOMemory".to_string()), &config)
            .expect("IOMemory");
        assert!(io.read().capabilities().context_aware);

        let flat = registry
            .resolve(StoreSource::Named("Memory".to_string()), &config)
            .expect("Memory");
        assert!(!flat.read().capabilities().context_aware);
    }

    #[test]
    fn unknown_name_fails() {
        let registry = StoreRegistry::default();
        let result = registry.resolve(StoreSource::Named("Sleepycat".to_string()), &StoreConfig::default());
        assert!(matches!(result, Err(TriplexError::UnknownStore(name)) if name == "Sleepycat"));
    }

    #[test]
    fn handles_pass_through() {
        let store = shared(MemoryStore::new());
        let resolved = StoreRegistry::new()
            .resolve(StoreSource::from(store.clone()), &StoreConfig::default())
            .expect("handle");
        assert!(Arc::ptr_eq(&store, &resolved));
    }
}
