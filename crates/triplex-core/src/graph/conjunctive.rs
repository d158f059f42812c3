//! # Conjunctive Graph
//!
//! The union of every asserted triple in a context-aware store. Reads see
//! all contexts; plain `add` writes into the default context.

use super::{Graph, GraphOps, QuotedGraph};
use crate::namespace::QualifiedName;
use crate::store::SharedStore;
use crate::term::Term;
use crate::{Quad, Triple, TriplePattern, TriplexError};
use std::fmt;

#[derive(Clone)]
pub struct ConjunctiveGraph {
    store: SharedStore,
    default_context: Graph,
}

impl ConjunctiveGraph {
    /// View `store` with a fresh blank-node default context.
    ///
    /// Fails with [`TriplexError::CapabilityMismatch`] for flat stores.
    pub fn new(store: SharedStore) -> Result<Self, TriplexError> {
        Self::with_default_context(store, Term::fresh_blank())
    }

    pub fn with_default_context(store: SharedStore, identifier: Term) -> Result<Self, TriplexError> {
        if !store.read().capabilities().context_aware {
            return Err(TriplexError::CapabilityMismatch(
                "ConjunctiveGraph requires a context-aware store".to_string(),
            ));
        }
        let default_context = Graph::with_identifier(store.clone(), identifier);
        Ok(Self {
            store,
            default_context,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Where plain `add` writes.
    pub fn default_context(&self) -> &Graph {
        &self.default_context
    }

    pub fn add_quad(&self, quad: Quad) -> Result<(), TriplexError> {
        quad.triple.validate()?;
        self.store.write().add(&quad.triple, &quad.context, false)
    }

    /// Add many quads under one write lock. Nothing is written unless every
    /// triple is valid.
    pub fn add_quads(&self, quads: impl IntoIterator<Item = Quad>) -> Result<(), TriplexError> {
        let quads: Vec<Quad> = quads.into_iter().collect();
        quads.iter().try_for_each(|quad| quad.triple.validate())?;
        let mut store = self.store.write();
        for quad in &quads {
            store.add(&quad.triple, &quad.context, false)?;
        }
        tracing::trace!("Added {} quads", quads.len());
        Ok(())
    }

    /// One quad per (match, asserting context) pair.
    pub fn quads(&self, pattern: &TriplePattern) -> Result<Vec<Quad>, TriplexError> {
        let store = self.store.read();
        let mut quads = Vec::new();
        for matched in store.triples(pattern, None)? {
            let (triple, contexts) = matched?;
            quads.extend(contexts.into_iter().map(|context| Quad {
                triple: triple.clone(),
                context,
            }));
        }
        Ok(quads)
    }

    /// Every context, or those asserting `triple`, as graph views.
    pub fn contexts(&self, triple: Option<&Triple>) -> Result<Vec<Graph>, TriplexError> {
        let identifiers = self.store.read().contexts(triple)?;
        Ok(identifiers
            .into_iter()
            .map(|identifier| Graph::with_identifier(self.store.clone(), identifier))
            .collect())
    }

    /// View one context. Nothing is registered until a triple is added.
    #[must_use]
    pub fn get_context(&self, identifier: Term) -> Graph {
        let graph = Graph::with_identifier(self.store.clone(), identifier);
        if let Ok(manager) = self.default_context.namespace_manager() {
            graph.set_namespace_manager(manager);
        }
        graph
    }

    /// View one context as a formula: adds through it are quoted.
    #[must_use]
    pub fn get_quoted_context(&self, identifier: Term) -> QuotedGraph {
        QuotedGraph::from_graph(self.get_context(identifier))
    }

    /// Drop every triple in `identifier` and the context itself.
    pub fn remove_context(&self, identifier: &Term) -> Result<(), TriplexError> {
        self.store
            .write()
            .remove(&TriplePattern::any(), Some(identifier))
    }

    pub fn bind(&self, prefix: &str, namespace: &str, override_existing: bool) -> Result<(), TriplexError> {
        self.default_context.bind(prefix, namespace, override_existing)
    }

    pub fn namespaces(&self) -> Result<Vec<(String, String)>, TriplexError> {
        self.default_context.namespaces()
    }

    pub fn qname(&self, iri: &str) -> Result<String, TriplexError> {
        self.default_context.qname(iri)
    }

    pub fn compute_qname(&self, iri: &str) -> Result<QualifiedName, TriplexError> {
        self.default_context.compute_qname(iri)
    }

    /// `[<default context>]`
    #[must_use]
    pub fn n3(&self) -> String {
        self.default_context.n3()
    }
}

impl fmt::Debug for ConjunctiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConjunctiveGraph")
            .field("default_context", self.default_context.identifier())
            .finish_non_exhaustive()
    }
}

impl GraphOps for ConjunctiveGraph {
    fn identifier(&self) -> &Term {
        self.default_context.identifier()
    }

    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError> {
        let store = self.store.read();
        store
            .triples(pattern, None)?
            .map(|m| m.map(|(triple, _)| triple))
            .collect()
    }

    /// Number of (triple, context) pairs.
    fn len(&self) -> Result<usize, TriplexError> {
        self.store.read().len(None)
    }

    fn add(&self, triple: Triple) -> Result<(), TriplexError> {
        self.default_context.add(triple)
    }

    /// Removes matches from every context.
    fn remove(&self, pattern: &TriplePattern) -> Result<(), TriplexError> {
        self.store.write().remove(pattern, None)
    }
}
