//! # Read-Only Aggregate
//!
//! Concatenated view over several graphs, possibly backed by different
//! stores. Nothing is deduplicated: a triple held by two members is seen twice.

use super::{Graph, GraphOps};
use crate::config::StoreConfig;
use crate::namespace::{NamespaceManager, QualifiedName};
use crate::term::Term;
use crate::{Triple, TriplePattern, TriplexError};

#[derive(Debug, Clone)]
pub struct ReadOnlyGraphAggregate {
    graphs: Vec<Graph>,
    identifier: Term,
    namespace_manager: Option<NamespaceManager>,
}

impl ReadOnlyGraphAggregate {
    /// Fails with [`TriplexError::EmptyAggregate`] when `graphs` is empty.
    pub fn new(graphs: Vec<Graph>) -> Result<Self, TriplexError> {
        if graphs.is_empty() {
            return Err(TriplexError::EmptyAggregate);
        }
        Ok(Self {
            graphs,
            identifier: Term::fresh_blank(),
            namespace_manager: None,
        })
    }

    #[must_use]
    pub fn with_namespace_manager(mut self, manager: NamespaceManager) -> Self {
        self.namespace_manager = Some(manager);
        self
    }

    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Matches paired with the member graph holding them, in member order.
    pub fn quads(&self, pattern: &TriplePattern) -> Result<Vec<(Triple, &Graph)>, TriplexError> {
        let mut quads = Vec::new();
        for graph in &self.graphs {
            quads.extend(graph.triples(pattern)?.into_iter().map(|t| (t, graph)));
        }
        Ok(quads)
    }

    /// The attached manager's bindings, or every member's bindings in order.
    pub fn namespaces(&self) -> Result<Vec<(String, String)>, TriplexError> {
        if let Some(manager) = &self.namespace_manager {
            return Ok(manager.namespaces());
        }
        let mut bindings = Vec::new();
        for graph in &self.graphs {
            bindings.extend(graph.namespaces()?);
        }
        Ok(bindings)
    }

    pub fn open(&self, config: &StoreConfig, create: bool) -> Result<(), TriplexError> {
        for graph in &self.graphs {
            graph.open(config, create)?;
        }
        Ok(())
    }

    pub fn close(&self, commit_pending: bool) -> Result<(), TriplexError> {
        for graph in &self.graphs {
            graph.close(commit_pending)?;
        }
        Ok(())
    }

    pub fn commit(&self) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("read-only aggregate"))
    }

    pub fn rollback(&self) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("read-only aggregate"))
    }

    pub fn destroy(&self, _config: &StoreConfig) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("read-only aggregate"))
    }

    pub fn bind(&self, _prefix: &str, _namespace: &str, _override_existing: bool) -> Result<(), TriplexError> {
        Err(TriplexError::Unsupported("bind on an aggregate"))
    }

    pub fn qname(&self, _iri: &str) -> Result<String, TriplexError> {
        Err(TriplexError::Unsupported("qname on an aggregate"))
    }

    pub fn compute_qname(&self, _iri: &str) -> Result<QualifiedName, TriplexError> {
        Err(TriplexError::Unsupported("compute_qname on an aggregate"))
    }

    pub fn n3(&self) -> Result<String, TriplexError> {
        Err(TriplexError::Unsupported("n3 on an aggregate"))
    }

    pub fn absolutize(&self, _iri: &str) -> Result<Term, TriplexError> {
        Err(TriplexError::Unsupported("absolutize on an aggregate"))
    }
}

impl GraphOps for ReadOnlyGraphAggregate {
    fn identifier(&self) -> &Term {
        &self.identifier
    }

    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError> {
        let mut out = Vec::new();
        for graph in &self.graphs {
            out.extend(graph.triples(pattern)?);
        }
        Ok(out)
    }

    /// Sum of member lengths.
    fn len(&self) -> Result<usize, TriplexError> {
        self.graphs.iter().map(GraphOps::len).sum()
    }

    fn add(&self, _triple: Triple) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("read-only aggregate"))
    }

    fn remove(&self, _pattern: &TriplePattern) -> Result<(), TriplexError> {
        Err(TriplexError::Immutable("read-only aggregate"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, shared};

    fn iri(name: &str) -> Term {
        Term::iri(format!("http://example.org/{name}"))
    }

    fn t(s: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri("p"), iri(o))
    }

    fn members() -> Vec<Graph> {
        let a = Graph::memory();
        let b = Graph::memory();
        a.add(t("x", "1")).unwrap();
        a.add(t("x", "2")).unwrap();
        b.add(t("x", "2")).unwrap();
        vec![a, b]
    }

    #[test]
    fn empty_aggregate_rejected() {
        assert!(matches!(
            ReadOnlyGraphAggregate::new(Vec::new()),
            Err(TriplexError::EmptyAggregate)
        ));
    }

    #[test]
    fn reads_concatenate_members() {
        let aggregate = ReadOnlyGraphAggregate::new(members()).unwrap();
        assert_eq!(aggregate.len().unwrap(), 3);
        assert_eq!(aggregate.triples(&t("x", "2").to_pattern()).unwrap().len(), 2);

        let quads = aggregate.quads(&TriplePattern::any()).unwrap();
        assert_eq!(quads.len(), 3);
        assert_eq!(quads[2].1.identifier(), aggregate.graphs()[1].identifier());
    }

    #[test]
    fn mutation_is_refused() {
        let aggregate = ReadOnlyGraphAggregate::new(members()).unwrap();
        assert!(matches!(aggregate.add(t("y", "z")), Err(TriplexError::Immutable(_))));
        assert!(matches!(
            aggregate.remove(&TriplePattern::any()),
            Err(TriplexError::Immutable(_))
        ));
        assert!(matches!(aggregate.commit(), Err(TriplexError::Immutable(_))));
        assert!(matches!(aggregate.rollback(), Err(TriplexError::Immutable(_))));
        assert!(matches!(
            aggregate.destroy(&StoreConfig::default()),
            Err(TriplexError::Immutable(_))
        ));
        assert_eq!(aggregate.len().unwrap(), 3);
    }

    #[test]
    fn namespace_operations_unsupported() {
        let aggregate = ReadOnlyGraphAggregate::new(members()).unwrap();
        assert!(matches!(
            aggregate.bind("ex", "http://example.org/", false),
            Err(TriplexError::Unsupported(_))
        ));
        assert!(matches!(aggregate.qname("http://example.org/a"), Err(TriplexError::Unsupported(_))));
        assert!(matches!(aggregate.n3(), Err(TriplexError::Unsupported(_))));
        assert!(matches!(aggregate.absolutize("a"), Err(TriplexError::Unsupported(_))));

        let qualified: Result<QualifiedName, TriplexError> =
            aggregate.compute_qname("http://example.org/a");
        assert!(matches!(qualified, Err(TriplexError::Unsupported(_))));
    }

    #[test]
    fn namespaces_from_members_or_manager() {
        let aggregate = ReadOnlyGraphAggregate::new(members()).unwrap();
        // Two members, each with xml/rdf/rdfs.
        assert_eq!(aggregate.namespaces().unwrap().len(), 6);

        let manager = NamespaceManager::new(shared(MemoryStore::new())).unwrap();
        manager.bind("ex", "http://example.org/", false).unwrap();
        let aggregate = aggregate.with_namespace_manager(manager);
        assert_eq!(aggregate.namespaces().unwrap().len(), 4);
    }

    #[test]
    fn open_and_close_reach_members() {
        let aggregate = ReadOnlyGraphAggregate::new(members()).unwrap();
        aggregate.open(&StoreConfig::default(), true).unwrap();
        aggregate.close(false).unwrap();
        assert_eq!(aggregate.len().unwrap(), 3);
    }
}
