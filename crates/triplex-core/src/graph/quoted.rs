//! # Quoted Graphs
//!
//! Formulae: triples that are stored but not asserted. They live in their
//! own context and never show up in conjunctive reads.

use super::{Graph, GraphOps};
use crate::formats::CanonicalGraph;
use crate::store::SharedStore;
use crate::term::Term;
use crate::{Quad, Triple, TriplePattern, TriplexError};

/// A mutable formula.
#[derive(Debug, Clone)]
pub struct QuotedGraph {
    graph: Graph,
}

impl QuotedGraph {
    pub fn new(store: SharedStore, identifier: Term) -> Self {
        Self {
            graph: Graph::with_identifier(store, identifier),
        }
    }

    pub(super) fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn store(&self) -> &SharedStore {
        self.graph.store()
    }

    /// Add the quads whose context is this formula; the rest are skipped.
    pub fn add_quads(&self, quads: impl IntoIterator<Item = Quad>) -> Result<(), TriplexError> {
        let own: Vec<Triple> = quads
            .into_iter()
            .filter(|quad| &quad.context == self.graph.identifier())
            .map(|quad| quad.triple)
            .collect();
        own.iter().try_for_each(Triple::validate)?;
        let mut store = self.graph.store().write();
        for triple in &own {
            store.add(triple, self.graph.identifier(), true)?;
        }
        Ok(())
    }

    pub fn qname(&self, iri: &str) -> Result<String, TriplexError> {
        self.graph.qname(iri)
    }

    /// `{<identifier>}`
    #[must_use]
    pub fn n3(&self) -> String {
        format!("{{{}}}", self.graph.identifier().n3())
    }
}

impl GraphOps for QuotedGraph {
    fn identifier(&self) -> &Term {
        self.graph.identifier()
    }

    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError> {
        self.graph.triples(pattern)
    }

    fn len(&self) -> Result<usize, TriplexError> {
        self.graph.len()
    }

    fn add(&self, triple: Triple) -> Result<(), TriplexError> {
        triple.validate()?;
        self.graph
            .store()
            .write()
            .add(&triple, self.graph.identifier(), true)
    }

    fn remove(&self, pattern: &TriplePattern) -> Result<(), TriplexError> {
        self.graph.remove(pattern)
    }
}

/// An immutable formula named by the hash of its content.
///
/// Equal triple sets always get the same `data:<hash>` identifier.
#[derive(Debug, Clone)]
pub struct GraphValue {
    graph: Graph,
}

impl GraphValue {
    /// Copy the triples of `source` into `store` as a quoted context.
    pub fn new(store: SharedStore, source: &dyn GraphOps) -> Result<Self, TriplexError> {
        let triples = source.triples(&TriplePattern::any())?;
        Self::from_triples(store, triples)
    }

    /// Nothing reaches the store unless every triple is valid.
    pub fn from_triples(store: SharedStore, triples: Vec<Triple>) -> Result<Self, TriplexError> {
        triples.iter().try_for_each(Triple::validate)?;
        let identifier = CanonicalGraph::from_triples(&triples).identifier()?;
        {
            let mut guard = store.write();
            guard.add_context(&identifier, true)?;
            for triple in &triples {
                guard.add(triple, &identifier, true)?;
            }
        }
        tracing::debug!("GraphValue {} holds {} triples", identifier.n3(), triples.len());
        Ok(Self {
            graph: Graph::with_identifier(store, identifier),
        })
    }

    pub fn store(&self) -> &SharedStore {
        self.graph.store()
    }

    /// `{<identifier>}`
    #[must_use]
    pub fn n3(&self) -> String {
        format!("{{{}}}", self.graph.identifier().n3())
    }
}

impl GraphOps for GraphValue {
    fn identifier(&self) -> &Term {
        self.graph.identifier()
    }

    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError> {
        self.graph.triples(pattern)
    }

    fn len(&self) -> Result<usize, TriplexError> {
        self.graph.len()
    }

    fn add(&self, _triple: Triple) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("GraphValue"))
    }

    fn remove(&self, _pattern: &TriplePattern) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("GraphValue"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::graph::ConjunctiveGraph;
    use crate::store::{MemoryStore, shared};

    fn iri(name: &str) -> Term {
        Term::iri(format!("http://example.org/{name}"))
    }

    fn t(s: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri("p"), iri(o))
    }

    #[test]
    fn quoted_triples_stay_out_of_the_aggregate() {
        let store = shared(MemoryStore::new());
        let g = ConjunctiveGraph::new(store.clone()).unwrap();
        let formula = QuotedGraph::new(store, Term::blank("f"));
        formula.add(t("a", "b")).unwrap();

        assert_eq!(formula.len().unwrap(), 1);
        assert!(formula.contains(&t("a", "b")).unwrap());
        assert!(!g.contains(&t("a", "b")).unwrap());
        assert_eq!(formula.n3(), "{_:f}");
    }

    #[test]
    fn add_quads_keeps_only_own_context() {
        let store = shared(MemoryStore::new());
        let formula = QuotedGraph::new(store.clone(), Term::blank("f"));
        formula
            .add_quads(vec![
                Quad { triple: t("a", "b"), context: Term::blank("f") },
                Quad { triple: t("c", "d"), context: iri("elsewhere") },
            ])
            .unwrap();

        assert_eq!(formula.len().unwrap(), 1);
        assert_eq!(store.read().contexts(None).unwrap(), vec![Term::blank("f")]);
        assert_eq!(store.read().triples(&TriplePattern::any(), None).unwrap().count(), 0);
    }

    #[test]
    fn quoted_graph_needs_formula_aware_store() {
        let store = shared(MemoryStore::with_config(StoreConfig {
            formula_aware: false,
            ..StoreConfig::default()
        }));
        let formula = QuotedGraph::new(store, Term::blank("f"));
        assert!(matches!(
            formula.add(t("a", "b")),
            Err(TriplexError::CapabilityMismatch(_))
        ));
    }

    #[test]
    fn graph_value_identity_follows_content() {
        let source = Graph::memory();
        source.add(t("a", "b")).unwrap();
        source.add(t("c", "d")).unwrap();

        let store = shared(MemoryStore::new());
        let v1 = GraphValue::new(store.clone(), &source).unwrap();
        let v2 = GraphValue::from_triples(store.clone(), vec![t("c", "d"), t("a", "b")]).unwrap();
        let v3 = GraphValue::from_triples(store, vec![t("a", "b")]).unwrap();

        assert_eq!(v1.identifier(), v2.identifier());
        assert_ne!(v1.identifier(), v3.identifier());
        assert!(v1.identifier().lexical().starts_with("data:"));
        assert_eq!(v1.len().unwrap(), 2);
    }

    #[test]
    fn graph_value_is_immutable() {
        let value = GraphValue::from_triples(shared(MemoryStore::new()), vec![t("a", "b")]).unwrap();
        assert!(matches!(value.add(t("x", "y")), Err(TriplexError::Immutable(_))));
        assert!(matches!(
            value.remove(&TriplePattern::any()),
            Err(TriplexError::Immutable(_))
        ));
        assert_eq!(value.len().unwrap(), 1);
    }

    #[test]
    fn invalid_triple_leaves_store_untouched() {
        let store = shared(MemoryStore::new());
        let bad = Triple::new(Term::literal("x"), iri("p"), iri("o"));
        let result = GraphValue::from_triples(store.clone(), vec![t("a", "b"), bad]);

        assert!(matches!(result, Err(TriplexError::InvalidTerm(_))));
        assert!(store.read().contexts(None).unwrap().is_empty());
        assert_eq!(store.read().len(None).unwrap(), 0);
    }

    #[test]
    fn empty_graph_value_is_registered() {
        let store = shared(MemoryStore::new());
        let value = GraphValue::from_triples(store.clone(), Vec::new()).unwrap();
        let contexts = store.read().contexts(None).unwrap();
        assert_eq!(contexts, vec![value.identifier().clone()]);
    }
}
