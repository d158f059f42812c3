//! # Graph Layer
//!
//! Graphs are cheap views over a shared store. They hold no triples of
//! their own: every query and mutation goes straight to the store, scoped to
//! the graph's identifier.
//!
//! [`GraphOps`] is the contract every view implements. Implementors supply
//! `identifier`, `triples`, `len`, `add` and `remove`; the navigation helpers
//! (`subjects`, `value`, `items`, `transitive_objects`, ...) come for free.
//!
//! - [`Graph`]: one context
//! - [`ConjunctiveGraph`]: every asserted triple, across contexts
//! - [`QuotedGraph`] / [`GraphValue`]: formulae kept out of the aggregate
//! - [`ReadOnlyGraphAggregate`]: union of several graphs

mod aggregate;
mod conjunctive;
mod quoted;

pub use aggregate::ReadOnlyGraphAggregate;
pub use conjunctive::ConjunctiveGraph;
pub use quoted::{GraphValue, QuotedGraph};

use crate::config::StoreConfig;
use crate::namespace::{NamespaceManager, QualifiedName, rdf, rdfs};
use crate::store::{MemoryStore, SharedStore, StoreRegistry, StoreSource, shared};
use crate::term::{Term, TermKey};
use crate::{Triple, TripleChoices, TriplePattern, TriplexError};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// GRAPH CONTRACT
// =============================================================================

pub trait GraphOps {
    /// The context this view is scoped to.
    fn identifier(&self) -> &Term;

    /// Matches of `pattern`, in store order.
    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError>;

    fn len(&self) -> Result<usize, TriplexError>;

    fn add(&self, triple: Triple) -> Result<(), TriplexError>;

    /// Remove every match of `pattern`.
    fn remove(&self, pattern: &TriplePattern) -> Result<(), TriplexError>;

    fn is_empty(&self) -> Result<bool, TriplexError> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, triple: &Triple) -> Result<bool, TriplexError> {
        Ok(!self.triples(&triple.to_pattern())?.is_empty())
    }

    /// One query per alternative, concatenated.
    fn triples_choices(&self, choices: &TripleChoices) -> Result<Vec<Triple>, TriplexError> {
        let mut out = Vec::new();
        for pattern in choices.patterns() {
            out.extend(self.triples(&pattern)?);
        }
        Ok(out)
    }

    fn subjects(
        &self,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Term>, TriplexError> {
        let pattern = TriplePattern::new(None, predicate.cloned(), object.cloned());
        Ok(self.triples(&pattern)?.into_iter().map(|t| t.subject).collect())
    }

    fn predicates(
        &self,
        subject: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Term>, TriplexError> {
        let pattern = TriplePattern::new(subject.cloned(), None, object.cloned());
        Ok(self.triples(&pattern)?.into_iter().map(|t| t.predicate).collect())
    }

    fn objects(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
    ) -> Result<Vec<Term>, TriplexError> {
        let pattern = TriplePattern::new(subject.cloned(), predicate.cloned(), None);
        Ok(self.triples(&pattern)?.into_iter().map(|t| t.object).collect())
    }

    fn subject_predicates(&self, object: Option<&Term>) -> Result<Vec<(Term, Term)>, TriplexError> {
        let pattern = TriplePattern::new(None, None, object.cloned());
        Ok(self
            .triples(&pattern)?
            .into_iter()
            .map(|t| (t.subject, t.predicate))
            .collect())
    }

    fn subject_objects(&self, predicate: Option<&Term>) -> Result<Vec<(Term, Term)>, TriplexError> {
        let pattern = TriplePattern::new(None, predicate.cloned(), None);
        Ok(self
            .triples(&pattern)?
            .into_iter()
            .map(|t| (t.subject, t.object))
            .collect())
    }

    fn predicate_objects(&self, subject: Option<&Term>) -> Result<Vec<(Term, Term)>, TriplexError> {
        let pattern = TriplePattern::new(subject.cloned(), None, None);
        Ok(self
            .triples(&pattern)?
            .into_iter()
            .map(|t| (t.predicate, t.object))
            .collect())
    }

    /// The single missing position of a pattern with at least two bound terms.
    ///
    /// - Fewer than two bound: returns `default` without querying
    /// - No match: returns `default`
    /// - All three bound: returns the object when the triple is present
    /// - Several matches with `any == false`: [`TriplexError::Uniqueness`]
    fn value(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        default: Option<Term>,
        any: bool,
    ) -> Result<Option<Term>, TriplexError> {
        let pattern = TriplePattern::new(subject.cloned(), predicate.cloned(), object.cloned());
        if pattern.bound_count() < 2 {
            return Ok(default);
        }
        let pick = |t: Triple| -> Term {
            if subject.is_none() {
                t.subject
            } else if predicate.is_none() {
                t.predicate
            } else {
                t.object
            }
        };

        let mut values = self.triples(&pattern)?.into_iter().map(pick);
        let Some(first) = values.next() else {
            return Ok(default);
        };
        if !any {
            if let Some(second) = values.next() {
                return Err(TriplexError::Uniqueness(format!(
                    "{} matches both {} and {}",
                    pattern_n3(&pattern),
                    first.n3(),
                    second.n3()
                )));
            }
        }
        Ok(Some(first))
    }

    /// Replace every `(s, p, *)` with the given triple.
    fn set(&self, triple: Triple) -> Result<(), TriplexError> {
        self.remove(&TriplePattern::new(
            Some(triple.subject.clone()),
            Some(triple.predicate.clone()),
            None,
        ))?;
        self.add(triple)
    }

    fn label(&self, subject: &Term, default: Option<Term>) -> Result<Option<Term>, TriplexError> {
        self.value(Some(subject), Some(&rdfs::label()), None, default, true)
    }

    fn comment(&self, subject: &Term, default: Option<Term>) -> Result<Option<Term>, TriplexError> {
        self.value(Some(subject), Some(&rdfs::comment()), None, default, true)
    }

    /// Items of the RDF list starting at `list`.
    fn items(&self, list: &Term) -> Result<Vec<Term>, TriplexError> {
        let (first, rest, nil) = (rdf::first(), rdf::rest(), rdf::nil());
        let mut items = Vec::new();
        let mut visited = BTreeSet::new();
        let mut node = Some(list.clone());
        while let Some(current) = node {
            if current == nil {
                break;
            }
            if !visited.insert(current.key()) {
                return Err(TriplexError::CyclicList(current.n3()));
            }
            if let Some(item) = self.value(Some(&current), Some(&first), None, None, true)? {
                items.push(item);
            }
            node = self.value(Some(&current), Some(&rest), None, None, true)?;
        }
        Ok(items)
    }

    /// Members of an `rdf:Seq`, ordered by their `rdf:_n` index.
    ///
    /// `None` when `subject` is not typed `rdf:Seq`.
    fn seq(&self, subject: &Term) -> Result<Option<Vec<Term>>, TriplexError> {
        let typed = Triple::new(subject.clone(), rdf::type_(), rdf::seq());
        if !self.contains(&typed)? {
            return Ok(None);
        }
        let mut members: Vec<(usize, Term)> = self
            .predicate_objects(Some(subject))?
            .into_iter()
            .filter_map(|(p, o)| rdf::member_index(&p).map(|n| (n, o)))
            .collect();
        members.sort_by_key(|(n, _)| *n);
        Ok(Some(members.into_iter().map(|(_, o)| o).collect()))
    }

    /// `subject` followed by everything reachable through `property`,
    /// depth-first, each node once.
    fn transitive_objects(&self, subject: &Term, property: &Term) -> Result<Vec<Term>, TriplexError> {
        transitive_closure(subject, |node| self.objects(Some(node), Some(property)))
    }

    /// `object` followed by everything reaching it through `predicate`.
    fn transitive_subjects(&self, predicate: &Term, object: &Term) -> Result<Vec<Term>, TriplexError> {
        transitive_closure(object, |node| self.subjects(Some(predicate), Some(node)))
    }

    /// Every term used as a subject or object.
    fn all_nodes(&self) -> Result<BTreeSet<TermKey>, TriplexError> {
        let mut nodes = BTreeSet::new();
        for triple in self.triples(&TriplePattern::any())? {
            nodes.insert(TermKey::from(triple.subject));
            nodes.insert(TermKey::from(triple.object));
        }
        Ok(nodes)
    }

    /// Whether every node reaches every other, ignoring edge direction.
    ///
    /// The empty graph counts as connected.
    fn connected(&self) -> Result<bool, TriplexError> {
        let nodes = self.all_nodes()?;
        let Some(start) = nodes.first() else {
            return Ok(true);
        };

        let mut seen = BTreeSet::new();
        let mut stack = vec![start.term().clone()];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.key()) {
                continue;
            }
            let outgoing = self.triples(&TriplePattern::new(Some(node.clone()), None, None))?;
            let incoming = self.triples(&TriplePattern::new(None, None, Some(node)))?;
            stack.extend(outgoing.into_iter().map(|t| t.object));
            stack.extend(incoming.into_iter().map(|t| t.subject));
        }
        Ok(seen.len() == nodes.len())
    }

    /// Same size, and every triple without blank nodes appears in both.
    ///
    /// Blank-node bijection is not attempted.
    fn isomorphic(&self, other: &dyn GraphOps) -> Result<bool, TriplexError> {
        if self.len()? != other.len()? {
            return Ok(false);
        }
        let ground = |t: &Triple| !t.subject.is_blank() && !t.object.is_blank();
        for triple in self.triples(&TriplePattern::any())? {
            if ground(&triple) && !other.contains(&triple)? {
                return Ok(false);
            }
        }
        for triple in other.triples(&TriplePattern::any())? {
            if ground(&triple) && !self.contains(&triple)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Add every triple of `other`.
    fn add_all(&self, other: &dyn GraphOps) -> Result<(), TriplexError> {
        for triple in other.triples(&TriplePattern::any())? {
            self.add(triple)?;
        }
        Ok(())
    }

    /// Remove every triple of `other`.
    fn remove_all(&self, other: &dyn GraphOps) -> Result<(), TriplexError> {
        for triple in other.triples(&TriplePattern::any())? {
            self.remove(&triple.to_pattern())?;
        }
        Ok(())
    }

    /// New in-memory graph holding the triples of both.
    fn union(&self, other: &dyn GraphOps) -> Result<Graph, TriplexError> {
        let result = Graph::memory();
        for triple in self.triples(&TriplePattern::any())? {
            result.add(triple)?;
        }
        result.add_all(other)?;
        Ok(result)
    }

    /// New in-memory graph holding the triples present in both.
    fn intersection(&self, other: &dyn GraphOps) -> Result<Graph, TriplexError> {
        let result = Graph::memory();
        for triple in self.triples(&TriplePattern::any())? {
            if other.contains(&triple)? {
                result.add(triple)?;
            }
        }
        Ok(result)
    }

    /// New in-memory graph holding the triples of `self` absent from `other`.
    fn difference(&self, other: &dyn GraphOps) -> Result<Graph, TriplexError> {
        let result = Graph::memory();
        for triple in self.triples(&TriplePattern::any())? {
            if !other.contains(&triple)? {
                result.add(triple)?;
            }
        }
        Ok(result)
    }
}

/// Depth-first preorder from `start` over the edges `next` produces,
/// visiting each node once.
///
/// `transitive_objects` and `transitive_subjects` are the two common steps;
/// any other step (several predicates, inverse edges, filtering) plugs in here.
pub fn transitive_closure(
    start: &Term,
    mut next: impl FnMut(&Term) -> Result<Vec<Term>, TriplexError>,
) -> Result<Vec<Term>, TriplexError> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    let mut stack = vec![start.clone()];
    while let Some(node) = stack.pop() {
        if !seen.insert(node.key()) {
            continue;
        }
        let children = next(&node)?;
        order.push(node);
        stack.extend(children.into_iter().rev());
    }
    Ok(order)
}

fn pattern_n3(pattern: &TriplePattern) -> String {
    let part = |t: &Option<Term>| t.as_ref().map_or_else(|| "*".to_string(), Term::n3);
    format!(
        "({} {} {})",
        part(&pattern.subject),
        part(&pattern.predicate),
        part(&pattern.object)
    )
}

// =============================================================================
// GRAPH
// =============================================================================

/// A view of one context of a store.
///
/// Clones share the store and the namespace manager.
#[derive(Clone)]
pub struct Graph {
    store: SharedStore,
    identifier: Term,
    namespace_manager: Arc<Mutex<Option<NamespaceManager>>>,
}

impl Graph {
    /// View a fresh blank-node context of `store`.
    pub fn new(store: SharedStore) -> Self {
        Self::with_identifier(store, Term::fresh_blank())
    }

    pub fn with_identifier(store: SharedStore, identifier: Term) -> Self {
        Self {
            store,
            identifier,
            namespace_manager: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolve `source` through `registry` and view `identifier` (fresh blank
    /// node when `None`).
    pub fn from_source(
        registry: &StoreRegistry,
        source: StoreSource,
        config: &StoreConfig,
        identifier: Option<Term>,
    ) -> Result<Self, TriplexError> {
        let store = registry.resolve(source, config)?;
        Ok(match identifier {
            Some(identifier) => Self::with_identifier(store, identifier),
            None => Self::new(store),
        })
    }

    /// A graph over its own fresh in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(shared(MemoryStore::new()))
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The namespace manager, created on first use.
    pub fn namespace_manager(&self) -> Result<NamespaceManager, TriplexError> {
        let mut slot = self.namespace_manager.lock();
        if let Some(manager) = slot.as_ref() {
            return Ok(manager.clone());
        }
        let manager = NamespaceManager::new(self.store.clone())?;
        *slot = Some(manager.clone());
        Ok(manager)
    }

    pub fn set_namespace_manager(&self, manager: NamespaceManager) {
        *self.namespace_manager.lock() = Some(manager);
    }

    pub fn bind(&self, prefix: &str, namespace: &str, override_existing: bool) -> Result<(), TriplexError> {
        self.namespace_manager()?.bind(prefix, namespace, override_existing)
    }

    pub fn namespaces(&self) -> Result<Vec<(String, String)>, TriplexError> {
        Ok(self.namespace_manager()?.namespaces())
    }

    pub fn qname(&self, iri: &str) -> Result<String, TriplexError> {
        self.namespace_manager()?.qname(iri)
    }

    pub fn compute_qname(&self, iri: &str) -> Result<QualifiedName, TriplexError> {
        self.namespace_manager()?.compute_qname(iri)
    }

    /// `[<identifier>]`
    #[must_use]
    pub fn n3(&self) -> String {
        format!("[{}]", self.identifier.n3())
    }

    /// Resolve `iri` against the identifier when it names a document.
    ///
    /// Relative references (no scheme) are appended to the identifier's
    /// fragment-free form; absolute ones are returned unchanged.
    pub fn absolutize(&self, iri: &str) -> Result<Term, TriplexError> {
        if iri.contains(':') {
            return Ok(Term::iri(iri));
        }
        let base = self.identifier.as_iri().ok_or(TriplexError::Unsupported(
            "absolutize needs an IRI identifier",
        ))?;
        let base = base.defrag();
        let separator = if iri.starts_with('#') { "" } else { "#" };
        Ok(Term::iri(format!("{}{}{}", base.as_str(), separator, iri)))
    }

    pub fn open(&self, config: &StoreConfig, create: bool) -> Result<(), TriplexError> {
        self.store.write().open(config, create)
    }

    pub fn close(&self, commit_pending: bool) -> Result<(), TriplexError> {
        self.store.write().close(commit_pending)
    }

    pub fn commit(&self) -> Result<(), TriplexError> {
        self.store.write().commit()
    }

    pub fn rollback(&self) -> Result<(), TriplexError> {
        self.store.write().rollback()
    }

    pub fn destroy(&self, config: &StoreConfig) -> Result<(), TriplexError> {
        self.store.write().destroy(config)
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl GraphOps for Graph {
    fn identifier(&self) -> &Term {
        &self.identifier
    }

    fn triples(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, TriplexError> {
        let store = self.store.read();
        store
            .triples(pattern, Some(&self.identifier))?
            .map(|m| m.map(|(triple, _)| triple))
            .collect()
    }

    fn len(&self) -> Result<usize, TriplexError> {
        self.store.read().len(Some(&self.identifier))
    }

    fn add(&self, triple: Triple) -> Result<(), TriplexError> {
        triple.validate()?;
        self.store.write().add(&triple, &self.identifier, false)
    }

    fn remove(&self, pattern: &TriplePattern) -> Result<(), TriplexError> {
        self.store.write().remove(pattern, Some(&self.identifier))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn iri(name: &str) -> Term {
        Term::iri(format!("http://example.org/{name}"))
    }

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri(p), iri(o))
    }

    #[test]
    fn graphs_sharing_a_store_are_scoped() {
        let store = shared(MemoryStore::new());
        let a = Graph::with_identifier(store.clone(), iri("a"));
        let b = Graph::with_identifier(store, iri("b"));
        a.add(t("s", "p", "o")).unwrap();
        assert_eq!(a.len().unwrap(), 1);
        assert_eq!(b.len().unwrap(), 0);
        assert!(!b.contains(&t("s", "p", "o")).unwrap());
    }

    #[test]
    fn add_rejects_bad_positions() {
        let g = Graph::memory();
        let bad = Triple::new(Term::literal("x"), iri("p"), iri("o"));
        assert!(matches!(g.add(bad), Err(TriplexError::InvalidTerm(_))));
        let bad = Triple::new(iri("s"), iri("p"), Term::variable("x"));
        assert!(matches!(g.add(bad), Err(TriplexError::InvalidTerm(_))));
    }

    #[test]
    fn value_guards_and_uniqueness() {
        let g = Graph::memory();
        g.add(t("s", "p", "o1")).unwrap();

        // Only one bound term: no query, default returned.
        let fallback = Some(iri("fallback"));
        assert_eq!(
            g.value(Some(&iri("s")), None, None, fallback.clone(), true).unwrap(),
            fallback
        );
        assert_eq!(
            g.value(Some(&iri("s")), Some(&iri("p")), None, None, false).unwrap(),
            Some(iri("o1"))
        );
        assert_eq!(
            g.value(None, Some(&iri("p")), Some(&iri("o1")), None, false).unwrap(),
            Some(iri("s"))
        );

        g.add(t("s", "p", "o2")).unwrap();
        assert!(matches!(
            g.value(Some(&iri("s")), Some(&iri("p")), None, None, false),
            Err(TriplexError::Uniqueness(_))
        ));
        assert!(g.value(Some(&iri("s")), Some(&iri("p")), None, None, true).unwrap().is_some());
    }

    #[test]
    fn value_with_all_bound_checks_presence() {
        let g = Graph::memory();
        g.add(t("s", "p", "o")).unwrap();
        assert_eq!(
            g.value(Some(&iri("s")), Some(&iri("p")), Some(&iri("o")), None, false).unwrap(),
            Some(iri("o"))
        );
        assert_eq!(
            g.value(Some(&iri("s")), Some(&iri("p")), Some(&iri("x")), None, false).unwrap(),
            None
        );
    }

    #[test]
    fn set_replaces_values() {
        let g = Graph::memory();
        g.add(t("s", "p", "o1")).unwrap();
        g.add(t("s", "p", "o2")).unwrap();
        g.set(t("s", "p", "o3")).unwrap();
        assert_eq!(g.objects(Some(&iri("s")), Some(&iri("p"))).unwrap(), vec![iri("o3")]);
    }

    #[test]
    fn choices_query_each_alternative() {
        let g = Graph::memory();
        g.add(t("a", "p", "1")).unwrap();
        g.add(t("b", "p", "2")).unwrap();
        g.add(t("c", "p", "3")).unwrap();
        let choices = TripleChoices::new(
            TriplePattern::new(None, Some(iri("p")), None),
            crate::Position::Subject,
            vec![iri("c"), iri("a"), iri("missing")],
        );
        assert_eq!(
            g.triples_choices(&choices).unwrap(),
            vec![t("c", "p", "3"), t("a", "p", "1")]
        );
    }

    #[test]
    fn label_and_comment() {
        let g = Graph::memory();
        g.add(Triple::new(iri("s"), rdfs::label(), Term::literal("Thing"))).unwrap();
        assert_eq!(g.label(&iri("s"), None).unwrap(), Some(Term::literal("Thing")));
        assert_eq!(
            g.comment(&iri("s"), Some(Term::literal(""))).unwrap(),
            Some(Term::literal(""))
        );
    }

    #[test]
    fn transitive_closure_follows_custom_steps() {
        let g = Graph::memory();
        g.add(t("a", "next", "b")).unwrap();
        g.add(t("b", "skip", "c")).unwrap();
        g.add(t("c", "next", "a")).unwrap();
        g.add(t("c", "other", "d")).unwrap();

        let either = |node: &Term| -> Result<Vec<Term>, TriplexError> {
            let mut out = g.objects(Some(node), Some(&iri("next")))?;
            out.extend(g.objects(Some(node), Some(&iri("skip")))?);
            Ok(out)
        };
        let reached = transitive_closure(&iri("a"), either).unwrap();
        assert_eq!(reached, vec![iri("a"), iri("b"), iri("c")]);

        let failing = transitive_closure(&iri("a"), |_| Err(TriplexError::Unsupported("step")));
        assert!(matches!(failing, Err(TriplexError::Unsupported("step"))));
    }

    #[test]
    fn transitive_walks_visit_each_node_once() {
        let g = Graph::memory();
        g.add(t("a", "next", "b")).unwrap();
        g.add(t("b", "next", "c")).unwrap();
        g.add(t("c", "next", "a")).unwrap();

        let forward = g.transitive_objects(&iri("a"), &iri("next")).unwrap();
        assert_eq!(forward, vec![iri("a"), iri("b"), iri("c")]);

        let backward = g.transitive_subjects(&iri("next"), &iri("a")).unwrap();
        assert_eq!(backward, vec![iri("a"), iri("c"), iri("b")]);
    }

    #[test]
    fn connectivity() {
        let g = Graph::memory();
        assert!(g.connected().unwrap());
        g.add(t("a", "p", "b")).unwrap();
        g.add(t("c", "p", "b")).unwrap();
        assert!(g.connected().unwrap());
        g.add(t("x", "p", "y")).unwrap();
        assert!(!g.connected().unwrap());
    }

    #[test]
    fn seq_members_in_index_order() {
        let g = Graph::memory();
        let s = iri("list");
        g.add(Triple::new(s.clone(), rdf::type_(), rdf::seq())).unwrap();
        g.add(Triple::new(s.clone(), rdf::member(2), iri("second"))).unwrap();
        g.add(Triple::new(s.clone(), rdf::member(1), iri("first"))).unwrap();
        g.add(Triple::new(s.clone(), rdf::member(10), iri("tenth"))).unwrap();
        assert_eq!(
            g.seq(&s).unwrap(),
            Some(vec![iri("first"), iri("second"), iri("tenth")])
        );
        assert_eq!(g.seq(&iri("other")).unwrap(), None);
    }

    #[test]
    fn set_operations() {
        let a = Graph::memory();
        let b = Graph::memory();
        a.add(t("s", "p", "1")).unwrap();
        a.add(t("s", "p", "2")).unwrap();
        b.add(t("s", "p", "2")).unwrap();
        b.add(t("s", "p", "3")).unwrap();

        assert_eq!(a.union(&b).unwrap().len().unwrap(), 3);
        let both = a.intersection(&b).unwrap();
        assert_eq!(both.triples(&TriplePattern::any()).unwrap(), vec![t("s", "p", "2")]);
        let only_a = a.difference(&b).unwrap();
        assert_eq!(only_a.triples(&TriplePattern::any()).unwrap(), vec![t("s", "p", "1")]);

        a.remove_all(&b).unwrap();
        assert_eq!(a.len().unwrap(), 1);
        a.add_all(&b).unwrap();
        assert_eq!(a.len().unwrap(), 3);
    }

    #[test]
    fn isomorphism_ignores_blank_triples() {
        let a = Graph::memory();
        let b = Graph::memory();
        a.add(t("s", "p", "o")).unwrap();
        b.add(t("s", "p", "o")).unwrap();
        a.add(Triple::new(Term::blank("x"), iri("p"), iri("o"))).unwrap();
        b.add(Triple::new(Term::blank("y"), iri("p"), iri("o"))).unwrap();
        assert!(a.isomorphic(&b).unwrap());

        b.add(t("s", "p", "extra")).unwrap();
        assert!(!a.isomorphic(&b).unwrap());
    }

    #[test]
    fn qnames_through_graph() {
        let g = Graph::memory();
        g.bind("ex", "http://example.org/", false).unwrap();
        assert_eq!(g.qname("http://example.org/thing").unwrap(), "ex:thing");
        assert!(g.namespaces().unwrap().iter().any(|(p, _)| p == "rdfs"));
        assert_eq!(g.n3(), format!("[{}]", g.identifier().n3()));
    }

    #[test]
    fn absolutize_against_identifier() {
        let g = Graph::with_identifier(
            shared(MemoryStore::new()),
            Term::iri("http://example.org/doc#frag"),
        );
        assert_eq!(g.absolutize("name").unwrap(), Term::iri("http://example.org/doc#name"));
        assert_eq!(g.absolutize("#name").unwrap(), Term::iri("http://example.org/doc#name"));
        assert_eq!(g.absolutize("urn:x").unwrap(), Term::iri("urn:x"));
    }

    #[test]
    fn literal_values_match_across_lexical_forms() {
        let g = Graph::memory();
        g.add(Triple::new(iri("s"), iri("p"), Term::Literal(Literal::from(1i64)))).unwrap();
        let found = g.subjects(Some(&iri("p")), Some(&Term::Literal(Literal::from(1i64)))).unwrap();
        assert_eq!(found, vec![iri("s")]);
    }
}
