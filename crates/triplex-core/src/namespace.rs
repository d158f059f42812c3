//! # Namespaces
//!
//! Prefix bindings live in the store; [`NamespaceManager`] layers the
//! binding policy and a qualified-name cache on top.
//!
//! Also home to the small vocabulary helpers (`rdf::first()`, `rdfs::label()`,
//! ...) the graph layer and collections are written against.

use crate::primitives::{
    DEFAULT_PREFIX_BASE, GENERATED_PREFIX_MARKER, RDF_NS, RDFS_NS, XML_NS, XSD_NS,
};
use crate::store::SharedStore;
use crate::term::Term;
use crate::TriplexError;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

// =============================================================================
// NAMESPACES
// =============================================================================

/// An IRI prefix that mints terms by appending local names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn term(&self, name: &str) -> Term {
        Term::iri(format!("{}{}", self.0, name))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A namespace with a fixed set of local names.
#[derive(Debug, Clone)]
pub struct ClosedNamespace {
    namespace: Namespace,
    names: BTreeSet<&'static str>,
}

impl ClosedNamespace {
    pub fn new(uri: impl Into<String>, names: &[&'static str]) -> Self {
        Self {
            namespace: Namespace::new(uri),
            names: names.iter().copied().collect(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn term(&self, name: &str) -> Result<Term, TriplexError> {
        if self.names.contains(name) {
            Ok(self.namespace.term(name))
        } else {
            Err(TriplexError::UnknownNamespaceTerm {
                namespace: self.namespace.to_string(),
                name: name.to_string(),
            })
        }
    }
}

pub static RDF: LazyLock<ClosedNamespace> = LazyLock::new(|| {
    ClosedNamespace::new(
        RDF_NS,
        &[
            "RDF", "Description", "ID", "about", "parseType", "resource", "li", "nodeID",
            "datatype", "Seq", "Bag", "Alt", "Statement", "Property", "XMLLiteral", "List",
            "subject", "predicate", "object", "type", "value", "first", "rest", "nil",
        ],
    )
});

pub static RDFS: LazyLock<ClosedNamespace> = LazyLock::new(|| {
    ClosedNamespace::new(
        RDFS_NS,
        &[
            "Resource", "Class", "subClassOf", "subPropertyOf", "comment", "label", "domain",
            "range", "seeAlso", "isDefinedBy", "Literal", "Container",
            "ContainerMembershipProperty", "member", "Datatype",
        ],
    )
});

pub static XSD: LazyLock<Namespace> = LazyLock::new(|| Namespace::new(XSD_NS));

/// `rdf:` terms used by lists and containers.
pub mod rdf {
    use super::{RDF_NS, Term};

    pub fn first() -> Term {
        Term::iri(format!("{RDF_NS}first"))
    }

    pub fn rest() -> Term {
        Term::iri(format!("{RDF_NS}rest"))
    }

    pub fn nil() -> Term {
        Term::iri(format!("{RDF_NS}nil"))
    }

    pub fn type_() -> Term {
        Term::iri(format!("{RDF_NS}type"))
    }

    pub fn seq() -> Term {
        Term::iri(format!("{RDF_NS}Seq"))
    }

    /// Container membership property `rdf:_n`.
    pub fn member(n: usize) -> Term {
        Term::iri(format!("{RDF_NS}_{n}"))
    }

    /// Index of an `rdf:_n` property, if `term` is one.
    pub fn member_index(term: &Term) -> Option<usize> {
        term.as_iri()?
            .as_str()
            .strip_prefix(RDF_NS)?
            .strip_prefix('_')?
            .parse()
            .ok()
    }
}

/// `rdfs:` annotation properties.
pub mod rdfs {
    use super::{RDFS_NS, Term};

    pub fn label() -> Term {
        Term::iri(format!("{RDFS_NS}label"))
    }

    pub fn comment() -> Term {
        Term::iri(format!("{RDFS_NS}comment"))
    }
}

/// Split an IRI at its last `#`, or its last `/` when there is no `#`.
///
/// Returns `(namespace, local_name)`. Fails when the local name would be empty.
pub fn split_iri(iri: &str) -> Result<(&str, &str), TriplexError> {
    let at = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .ok_or_else(|| TriplexError::InvalidTerm(format!("Cannot split IRI: {}", iri)))?;
    let (namespace, name) = iri.split_at(at + 1);
    if name.is_empty() {
        return Err(TriplexError::InvalidTerm(format!(
            "IRI has no local name: {}",
            iri
        )));
    }
    Ok((namespace, name))
}

// =============================================================================
// NAMESPACE MANAGER
// =============================================================================

/// The three parts of a qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub prefix: String,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.prefix, self.name)
        }
    }
}

/// Prefix policy over a store's bindings.
///
/// Clones share the store and the qname cache.
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    store: SharedStore,
    cache: Arc<RwLock<BTreeMap<String, QualifiedName>>>,
}

impl NamespaceManager {
    /// Wrap `store`, binding `xml`, `rdf` and `rdfs`.
    pub fn new(store: SharedStore) -> Result<Self, TriplexError> {
        let manager = Self {
            store,
            cache: Arc::new(RwLock::new(BTreeMap::new())),
        };
        manager.bind("xml", XML_NS, false)?;
        manager.bind("rdf", RDF_NS, false)?;
        manager.bind("rdfs", RDFS_NS, false)?;
        Ok(manager)
    }

    /// Bind `prefix` to `namespace`.
    ///
    /// A prefix already taken by another namespace is replaced with the first
    /// free `prefix1`, `prefix2`, ... A namespace already bound under another
    /// prefix keeps it unless `override_existing` is set or the old prefix was
    /// generated (starts with `_`).
    pub fn bind(
        &self,
        prefix: &str,
        namespace: &str,
        override_existing: bool,
    ) -> Result<(), TriplexError> {
        let mut store = self.store.write();
        self.cache.write().clear();

        let prefix_taken = store
            .namespace(prefix)
            .is_some_and(|bound| bound != namespace);
        if prefix_taken {
            let base = if prefix.is_empty() {
                DEFAULT_PREFIX_BASE
            } else {
                prefix
            };
            let mut n = 1u64;
            let fresh = loop {
                let candidate = format!("{}{}", base, n);
                if store
                    .namespace(&candidate)
                    .is_none_or(|bound| bound == namespace)
                {
                    break candidate;
                }
                n += 1;
            };
            tracing::debug!("Prefix {} already bound, binding {} as {}", prefix, namespace, fresh);
            return store.bind(&fresh, namespace);
        }

        match store.prefix(namespace) {
            None => store.bind(prefix, namespace),
            Some(existing) if existing == prefix => Ok(()),
            Some(existing) => {
                if override_existing || existing.starts_with(GENERATED_PREFIX_MARKER) {
                    store.bind(prefix, namespace)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Split `iri` into (prefix, namespace, name), binding a generated `_N`
    /// prefix when the namespace has none.
    pub fn compute_qname(&self, iri: &str) -> Result<QualifiedName, TriplexError> {
        if let Some(cached) = self.cache.read().get(iri) {
            return Ok(cached.clone());
        }

        let (namespace, name) = split_iri(iri)?;
        let existing = self.store.read().prefix(namespace);
        let prefix = match existing {
            Some(prefix) => prefix,
            None => {
                let generated = self.generated_prefix();
                tracing::debug!("Generated prefix {} for {}", generated, namespace);
                self.bind(&generated, namespace, false)?;
                let bound = self.store.read().prefix(namespace);
                bound.unwrap_or(generated)
            }
        };

        let qname = QualifiedName {
            prefix,
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.cache.write().insert(iri.to_string(), qname.clone());
        Ok(qname)
    }

    /// `prefix:name`, or just `name` under the empty prefix.
    pub fn qname(&self, iri: &str) -> Result<String, TriplexError> {
        Ok(self.compute_qname(iri)?.to_string())
    }

    /// `prefix:name` when the namespace is bound, `<iri>` otherwise.
    ///
    /// Never binds anything.
    pub fn normalize_uri(&self, iri: &str) -> String {
        let Ok((namespace, name)) = split_iri(iri) else {
            return format!("<{}>", iri);
        };
        match self.store.read().prefix(namespace) {
            Some(prefix) if prefix.is_empty() => format!(":{}", name),
            Some(prefix) => format!("{}:{}", prefix, name),
            None => format!("<{}>", iri),
        }
    }

    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.store.read().namespaces()
    }

    /// Drop cached qnames.
    pub fn reset(&self) {
        self.cache.write().clear();
    }

    /// Smallest `_N` not yet bound.
    fn generated_prefix(&self) -> String {
        let store = self.store.read();
        let mut n = 0u64;
        loop {
            let candidate = format!("{}{}", GENERATED_PREFIX_MARKER, n);
            if store.namespace(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, shared};

    fn manager() -> NamespaceManager {
        NamespaceManager::new(shared(MemoryStore::new())).expect("manager")
    }

    #[test]
    fn defaults_are_bound() {
        let nm = manager();
        let prefixes: Vec<String> = nm.namespaces().into_iter().map(|(p, _)| p).collect();
        for expected in ["xml", "rdf", "rdfs"] {
            assert!(prefixes.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[test]
    fn taken_prefix_gets_numbered() {
        let nm = manager();
        nm.bind("ex", "http://example.org/a#", false).expect("bind a");
        nm.bind("ex", "http://example.org/b#", false).expect("bind b");
        assert_eq!(nm.qname("http://example.org/b#x").expect("qname"), "ex1:x");
        assert_eq!(nm.qname("http://example.org/a#x").expect("qname"), "ex:x");
    }

    #[test]
    fn empty_prefix_conflict_uses_default_base() {
        let nm = manager();
        nm.bind("", "http://example.org/a#", false).expect("bind a");
        nm.bind("", "http://example.org/b#", false).expect("bind b");
        assert_eq!(nm.qname("http://example.org/b#x").expect("qname"), "default1:x");
    }

    #[test]
    fn existing_prefix_kept_without_override() {
        let nm = manager();
        nm.bind("ex", "http://example.org/", false).expect("bind");
        nm.bind("other", "http://example.org/", false).expect("rebind");
        assert_eq!(nm.qname("http://example.org/x").expect("qname"), "ex:x");

        nm.bind("other", "http://example.org/", true).expect("override");
        assert_eq!(nm.qname("http://example.org/x").expect("qname"), "other:x");
    }

    #[test]
    fn generated_prefixes_yield_to_explicit_bindings() {
        let nm = manager();
        assert_eq!(nm.qname("http://example.org/ns#a").expect("qname"), "_0:a");
        assert_eq!(nm.qname("http://other.org/ns#a").expect("qname"), "_1:a");

        nm.bind("ex", "http://example.org/ns#", false).expect("bind");
        assert_eq!(nm.qname("http://example.org/ns#a").expect("qname"), "ex:a");
    }

    #[test]
    fn unsplittable_iri_fails() {
        let nm = manager();
        assert!(matches!(
            nm.compute_qname("http://example.org/ns#"),
            Err(TriplexError::InvalidTerm(_))
        ));
        assert!(matches!(
            nm.compute_qname("urn:isbn"),
            Err(TriplexError::InvalidTerm(_))
        ));
    }

    #[test]
    fn normalize_does_not_bind() {
        let nm = manager();
        assert_eq!(
            nm.normalize_uri("http://example.org/ns#a"),
            "<http://example.org/ns#a>"
        );
        assert_eq!(nm.normalize_uri(&format!("{RDF_NS}type")), "rdf:type");
        assert!(nm.namespaces().iter().all(|(_, ns)| ns != "http://example.org/ns#"));
    }

    #[test]
    fn closed_namespace_rejects_unknown_names() {
        assert_eq!(RDF.term("type").expect("rdf:type"), rdf::type_());
        assert_eq!(RDFS.term("label").expect("rdfs:label"), rdfs::label());
        assert!(matches!(
            RDF.term("colour"),
            Err(TriplexError::UnknownNamespaceTerm { .. })
        ));
    }

    #[test]
    fn member_properties() {
        assert_eq!(rdf::member_index(&rdf::member(3)), Some(3));
        assert_eq!(rdf::member_index(&rdf::first()), None);
        assert_eq!(XSD.term("integer").lexical(), format!("{XSD_NS}integer"));
    }

    #[test]
    fn split_prefers_hash() {
        assert_eq!(
            split_iri("http://e.org/a/b#c").expect("split"),
            ("http://e.org/a/b#", "c")
        );
        assert_eq!(
            split_iri("http://e.org/a/b").expect("split"),
            ("http://e.org/a/", "b")
        );
    }
}
