//! # In-Memory Triple Store
//!
//! Three permuted nested indices over interned ids, partitioned by context:
//!
//! ```text
//! CSPO[context][subject][predicate] -> {object}
//! CPOS[context][predicate][object]  -> {subject}
//! COSP[context][object][subject]    -> {predicate}
//! ```
//!
//! Besides one partition per concrete context, every index holds an
//! `Aggregate` partition with the union of all *asserted* (non-quoted)
//! triples, so context-free queries never scan contexts. Each aggregate
//! entry records the set of contexts asserting it; the entry disappears
//! when that set becomes empty.
//!
//! Query planning picks the index whose rotation starts with a bound field:
//! subject → CSPO, else predicate → CPOS, else object → COSP, else a full
//! CSPO scan. Results are produced lazily.
//!
//! Uses `BTreeMap`/`BTreeSet` exclusively. No `HashMap`.

use super::{NodeTable, QuadMatches, Store, StoreCapabilities, TripleMatches};
use crate::config::StoreConfig;
use crate::formats::snapshot::{self, QuadRecord, StoreSnapshot, TermRecord};
use crate::term::Term;
use crate::{NodeId, Quad, Triple, TriplePattern, TriplexError};
use bimap::BiBTreeMap;
use std::collections::{BTreeMap, BTreeSet};
use std::iter;

// =============================================================================
// INDEX LAYOUT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Partition {
    /// Union of asserted triples across all contexts (the `""` context).
    Aggregate,
    Context(NodeId),
}

/// second key -> third keys
type Leaf = BTreeMap<NodeId, BTreeSet<NodeId>>;
/// partition -> first key -> Leaf
type Index = BTreeMap<Partition, BTreeMap<NodeId, Leaf>>;

type Ids = [NodeId; 3];
type IdPattern = [Option<NodeId>; 3];
type IdIter<'a> = Box<dyn Iterator<Item = Ids> + 'a>;

/// Insert `a → b → c`. Returns false if it was already present.
fn insert(index: &mut Index, partition: Partition, a: NodeId, b: NodeId, c: NodeId) -> bool {
    index
        .entry(partition)
        .or_default()
        .entry(a)
        .or_default()
        .entry(b)
        .or_default()
        .insert(c)
}

/// Remove `a → b → c`, pruning maps left empty. Returns false if absent.
fn unindex(index: &mut Index, partition: Partition, a: NodeId, b: NodeId, c: NodeId) -> bool {
    let Some(rotation) = index.get_mut(&partition) else {
        return false;
    };
    let Some(leaf) = rotation.get_mut(&a) else {
        return false;
    };
    let Some(set) = leaf.get_mut(&b) else {
        return false;
    };
    let removed = set.remove(&c);
    if set.is_empty() {
        leaf.remove(&b);
    }
    if leaf.is_empty() {
        rotation.remove(&a);
    }
    if rotation.is_empty() {
        index.remove(&partition);
    }
    removed
}

/// Enumerate `(second, third)` pairs of a leaf, filtered by optional bindings.
fn walk(
    leaf: &Leaf,
    second: Option<NodeId>,
    third: Option<NodeId>,
) -> Box<dyn Iterator<Item = (NodeId, NodeId)> + '_> {
    match (second, third) {
        (Some(b), Some(c)) => Box::new(
            leaf.get(&b)
                .filter(|set| set.contains(&c))
                .map(|_| (b, c))
                .into_iter(),
        ),
        (Some(b), None) => Box::new(
            leaf.get(&b)
                .into_iter()
                .flat_map(move |set| set.iter().map(move |&c| (b, c))),
        ),
        (None, Some(c)) => Box::new(
            leaf.iter()
                .filter(move |(_, set)| set.contains(&c))
                .map(move |(&b, _)| (b, c)),
        ),
        (None, None) => Box::new(
            leaf.iter()
                .flat_map(|(&b, set)| set.iter().map(move |&c| (b, c))),
        ),
    }
}

fn configured_default(config: &StoreConfig) -> Term {
    match &config.default_context {
        Some(iri) => Term::iri(iri.as_str()),
        None => Term::fresh_blank(),
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Context-aware in-memory store.
///
/// Not internally synchronized; share it through
/// [`SharedStore`](super::SharedStore) to serialize access.
#[derive(Debug)]
pub struct MemoryStore {
    config: StoreConfig,
    nodes: NodeTable,
    cspo: Index,
    cpos: Index,
    cosp: Index,
    /// Aggregate entry -> contexts asserting it.
    asserted_in: BTreeMap<Ids, BTreeSet<NodeId>>,
    /// Every registered concrete context.
    contexts: BTreeSet<NodeId>,
    /// Contexts that received quoted triples.
    quoted: BTreeSet<NodeId>,
    /// prefix <-> namespace
    namespaces: BiBTreeMap<String, String>,
    default_context: Term,
    /// Number of (triple, context) pairs.
    count: usize,
    /// Image taken at the last `open` or `commit`.
    committed: Option<StoreSnapshot>,
}

impl MemoryStore {
    /// Context-aware, formula-aware store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        let default_context = configured_default(&config);
        Self::with_parts(config, NodeTable::new(), default_context)
    }

    /// Store whose interning table draws ids from `ids`.
    #[must_use]
    pub fn with_id_source(config: StoreConfig, ids: super::IdSource) -> Self {
        let default_context = configured_default(&config);
        Self::with_parts(config, NodeTable::with_id_source(ids), default_context)
    }

    fn with_parts(config: StoreConfig, nodes: NodeTable, default_context: Term) -> Self {
        Self {
            config,
            nodes,
            cspo: Index::new(),
            cpos: Index::new(),
            cosp: Index::new(),
            asserted_in: BTreeMap::new(),
            contexts: BTreeSet::new(),
            quoted: BTreeSet::new(),
            namespaces: BiBTreeMap::new(),
            default_context,
            count: 0,
            committed: None,
        }
    }

    /// The context every triple lands in when the store is not context aware.
    #[must_use]
    pub fn default_context(&self) -> &Term {
        &self.default_context
    }

    /// Number of interned terms.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Union over every concrete context, quoted ones included.
    ///
    /// Yields a triple once per context holding it.
    pub fn triples_by_context(&self, pattern: &TriplePattern) -> QuadMatches<'_> {
        let Some(ids) = self.resolve(pattern) else {
            return Box::new(iter::empty());
        };
        Box::new(self.contexts.iter().flat_map(move |&c| {
            self.scan(Partition::Context(c), ids).map(move |found| -> Result<Quad, TriplexError> {
                Ok(Quad {
                    triple: self.triple_of(found)?,
                    context: self.nodes.externalize(c)?.clone(),
                })
            })
        }))
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn effective<'a>(&'a self, context: &'a Term) -> &'a Term {
        if self.config.context_aware {
            context
        } else {
            &self.default_context
        }
    }

    /// Ids for the bound positions. `None` if a bound term was never interned.
    /// Variables act as wildcards.
    fn resolve(&self, pattern: &TriplePattern) -> Option<IdPattern> {
        let slot = |term: &Option<Term>| match term {
            None | Some(Term::Variable(_)) => Some(None),
            Some(term) => self.nodes.lookup(term).map(Some),
        };
        Some([
            slot(&pattern.subject)?,
            slot(&pattern.predicate)?,
            slot(&pattern.object)?,
        ])
    }

    fn scan(&self, partition: Partition, pattern: IdPattern) -> IdIter<'_> {
        match pattern {
            [Some(s), p, o] => match self.cspo.get(&partition).and_then(|r| r.get(&s)) {
                Some(leaf) => Box::new(walk(leaf, p, o).map(move |(p, o)| [s, p, o])),
                None => Box::new(iter::empty()),
            },
            [None, Some(p), o] => match self.cpos.get(&partition).and_then(|r| r.get(&p)) {
                Some(leaf) => Box::new(walk(leaf, o, None).map(move |(o, s)| [s, p, o])),
                None => Box::new(iter::empty()),
            },
            [None, None, Some(o)] => match self.cosp.get(&partition).and_then(|r| r.get(&o)) {
                Some(leaf) => Box::new(walk(leaf, None, None).map(move |(s, p)| [s, p, o])),
                None => Box::new(iter::empty()),
            },
            [None, None, None] => match self.cspo.get(&partition) {
                Some(rotation) => Box::new(rotation.iter().flat_map(|(&s, leaf)| {
                    walk(leaf, None, None).map(move |(p, o)| [s, p, o])
                })),
                None => Box::new(iter::empty()),
            },
        }
    }

    fn triple_of(&self, [s, p, o]: Ids) -> Result<Triple, TriplexError> {
        Ok(Triple::new(
            self.nodes.externalize(s)?.clone(),
            self.nodes.externalize(p)?.clone(),
            self.nodes.externalize(o)?.clone(),
        ))
    }

    fn asserting_contexts(&self, ids: &Ids) -> Result<Vec<Term>, TriplexError> {
        self.asserted_in
            .get(ids)
            .into_iter()
            .flatten()
            .map(|&c| self.nodes.externalize(c).cloned())
            .collect()
    }

    fn intern_triple(&mut self, triple: &Triple) -> Result<Ids, TriplexError> {
        Ok([
            self.nodes.internalize(&triple.subject)?,
            self.nodes.internalize(&triple.predicate)?,
            self.nodes.internalize(&triple.object)?,
        ])
    }

    fn register(&mut self, context: &Term, quoted: bool) -> Result<NodeId, TriplexError> {
        if !context.is_resource() {
            return Err(TriplexError::InvalidTerm(format!(
                "context must be an IRI or blank node, got {}",
                context.n3()
            )));
        }
        if quoted && !self.config.formula_aware {
            return Err(TriplexError::CapabilityMismatch(
                "store is not formula aware".to_string(),
            ));
        }
        let context = self.effective(context).clone();
        let c = self.nodes.internalize(&context)?;
        self.contexts.insert(c);
        if quoted {
            self.quoted.insert(c);
        }
        Ok(c)
    }

    /// Delete one fully bound (triple, context) pair and fix the aggregate.
    fn remove_bound(&mut self, c: NodeId, [s, p, o]: Ids) {
        let partition = Partition::Context(c);
        if !unindex(&mut self.cspo, partition, s, p, o) {
            return;
        }
        unindex(&mut self.cpos, partition, p, o, s);
        unindex(&mut self.cosp, partition, o, s, p);
        self.count = self.count.saturating_sub(1);

        let emptied = match self.asserted_in.get_mut(&[s, p, o]) {
            Some(asserting) => asserting.remove(&c) && asserting.is_empty(),
            None => false,
        };
        if emptied {
            self.asserted_in.remove(&[s, p, o]);
            unindex(&mut self.cspo, Partition::Aggregate, s, p, o);
            unindex(&mut self.cpos, Partition::Aggregate, p, o, s);
            unindex(&mut self.cosp, Partition::Aggregate, o, s, p);
        }
    }

    fn clear(&mut self) {
        self.cspo.clear();
        self.cpos.clear();
        self.cosp.clear();
        self.asserted_in.clear();
        self.contexts.clear();
        self.quoted.clear();
        self.namespaces.clear();
        self.count = 0;
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Term-level image of the store, sorted for stable encoding.
    pub fn to_snapshot(&self) -> Result<StoreSnapshot, TriplexError> {
        let term = |id: NodeId| self.nodes.externalize(id).map(TermRecord::from);
        let mut quads = Vec::with_capacity(self.count);
        for &c in &self.contexts {
            for ids in self.scan(Partition::Context(c), [None, None, None]) {
                let [s, p, o] = ids;
                quads.push(QuadRecord {
                    subject: term(s)?,
                    predicate: term(p)?,
                    object: term(o)?,
                    context: term(c)?,
                    asserted: self.asserted_in.get(&ids).is_some_and(|set| set.contains(&c)),
                });
            }
        }
        quads.sort();
        let mut contexts = self.contexts.iter().map(|&c| term(c)).collect::<Result<Vec<_>, _>>()?;
        contexts.sort();
        let mut quoted = self.quoted.iter().map(|&c| term(c)).collect::<Result<Vec<_>, _>>()?;
        quoted.sort();
        Ok(StoreSnapshot {
            default_context: TermRecord::from(&self.default_context),
            quads,
            contexts,
            quoted,
            namespaces: self.namespaces(),
        })
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(
        snapshot: StoreSnapshot,
        config: StoreConfig,
    ) -> Result<Self, TriplexError> {
        let default_context = Term::try_from(snapshot.default_context)?;
        let mut store = Self::with_parts(config, NodeTable::new(), default_context);
        store.load(snapshot.quads, snapshot.contexts, snapshot.quoted, snapshot.namespaces)?;
        Ok(store)
    }

    fn load(
        &mut self,
        quads: Vec<QuadRecord>,
        contexts: Vec<TermRecord>,
        quoted: Vec<TermRecord>,
        namespaces: Vec<(String, String)>,
    ) -> Result<(), TriplexError> {
        for record in contexts {
            self.add_context(&Term::try_from(record)?, false)?;
        }
        for record in quoted {
            self.add_context(&Term::try_from(record)?, true)?;
        }
        for record in quads {
            let triple = Triple::new(
                Term::try_from(record.subject)?,
                Term::try_from(record.predicate)?,
                Term::try_from(record.object)?,
            );
            self.add(&triple, &Term::try_from(record.context)?, !record.asserted)?;
        }
        for (prefix, namespace) in namespaces {
            self.bind(&prefix, &namespace)?;
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), TriplexError> {
        let Some(path) = self.config.snapshot_path.clone() else {
            return Ok(());
        };
        let bytes = std::fs::read(&path)
            .map_err(|e| TriplexError::IoError(format!("{}: {}", path.display(), e)))?;
        let image = snapshot::snapshot_from_bytes(&bytes)?;
        self.restore(image.clone())?;
        self.committed = Some(image);
        tracing::debug!("Loaded snapshot {} ({} quads)", path.display(), self.count);
        Ok(())
    }

    /// Replace the whole content with `image`.
    fn restore(&mut self, image: StoreSnapshot) -> Result<(), TriplexError> {
        self.clear();
        self.default_context = Term::try_from(image.default_context)?;
        self.load(image.quads, image.contexts, image.quoted, image.namespaces)
    }

    /// Record the current content as committed, writing it out when a
    /// snapshot path is configured.
    fn persist(&mut self) -> Result<(), TriplexError> {
        let image = self.to_snapshot()?;
        if let Some(path) = &self.config.snapshot_path {
            let bytes = snapshot::snapshot_to_bytes(&image)?;
            std::fs::write(path, bytes)
                .map_err(|e| TriplexError::IoError(format!("{}: {}", path.display(), e)))?;
            tracing::debug!("Wrote snapshot {} ({} quads)", path.display(), self.count);
        }
        self.committed = Some(image);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// STORE IMPLEMENTATION
// =============================================================================

impl Store for MemoryStore {
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities {
            context_aware: self.config.context_aware,
            formula_aware: self.config.formula_aware,
            transaction_aware: false,
        }
    }

    fn add(&mut self, triple: &Triple, context: &Term, quoted: bool) -> Result<(), TriplexError> {
        triple.validate()?;
        let c = self.register(context, quoted)?;
        let [s, p, o] = self.intern_triple(triple)?;

        let partition = Partition::Context(c);
        if !insert(&mut self.cspo, partition, s, p, o) {
            return Ok(());
        }
        insert(&mut self.cpos, partition, p, o, s);
        insert(&mut self.cosp, partition, o, s, p);
        self.count = self.count.saturating_add(1);

        if !quoted {
            insert(&mut self.cspo, Partition::Aggregate, s, p, o);
            insert(&mut self.cpos, Partition::Aggregate, p, o, s);
            insert(&mut self.cosp, Partition::Aggregate, o, s, p);
            self.asserted_in.entry([s, p, o]).or_default().insert(c);
        }
        Ok(())
    }

    fn add_context(&mut self, context: &Term, quoted: bool) -> Result<(), TriplexError> {
        self.register(context, quoted).map(|_| ())
    }

    fn remove(
        &mut self,
        pattern: &TriplePattern,
        context: Option<&Term>,
    ) -> Result<(), TriplexError> {
        let Some(ids) = self.resolve(pattern) else {
            return Ok(());
        };
        let targets: Vec<NodeId> = match context {
            Some(context) => match self.nodes.lookup(self.effective(context)) {
                Some(c) => vec![c],
                None => return Ok(()),
            },
            None => self.contexts.iter().copied().collect(),
        };
        let whole_context = ids == [None, None, None];

        for c in targets {
            let found: Vec<Ids> = self.scan(Partition::Context(c), ids).collect();
            for ids in found {
                self.remove_bound(c, ids);
            }
            if whole_context {
                self.contexts.remove(&c);
                self.quoted.remove(&c);
                tracing::trace!("Context {:?} removed", c);
            }
        }
        Ok(())
    }

    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&Term>,
    ) -> Result<TripleMatches<'_>, TriplexError> {
        let Some(ids) = self.resolve(pattern) else {
            return Ok(Box::new(iter::empty()));
        };
        match context {
            Some(context) => {
                let context = self.effective(context).clone();
                let Some(c) = self.nodes.lookup(&context) else {
                    return Ok(Box::new(iter::empty()));
                };
                Ok(Box::new(self.scan(Partition::Context(c), ids).map(
                    move |found| -> Result<(Triple, Vec<Term>), TriplexError> {
                        Ok((self.triple_of(found)?, vec![context.clone()]))
                    },
                )))
            }
            None => Ok(Box::new(self.scan(Partition::Aggregate, ids).map(
                move |found| -> Result<(Triple, Vec<Term>), TriplexError> {
                    Ok((self.triple_of(found)?, self.asserting_contexts(&found)?))
                },
            ))),
        }
    }

    fn len(&self, context: Option<&Term>) -> Result<usize, TriplexError> {
        let Some(context) = context else {
            return Ok(self.count);
        };
        Ok(match self.nodes.lookup(self.effective(context)) {
            Some(c) => self.scan(Partition::Context(c), [None, None, None]).count(),
            None => 0,
        })
    }

    fn contexts(&self, triple: Option<&Triple>) -> Result<Vec<Term>, TriplexError> {
        match triple {
            None => self
                .contexts
                .iter()
                .map(|&c| self.nodes.externalize(c).cloned())
                .collect(),
            Some(triple) => match self.resolve(&triple.to_pattern()) {
                Some([Some(s), Some(p), Some(o)]) => self.asserting_contexts(&[s, p, o]),
                _ => Ok(Vec::new()),
            },
        }
    }

    fn bind(&mut self, prefix: &str, namespace: &str) -> Result<(), TriplexError> {
        self.namespaces
            .insert(prefix.to_string(), namespace.to_string());
        Ok(())
    }

    fn namespace(&self, prefix: &str) -> Option<String> {
        self.namespaces.get_by_left(prefix).cloned()
    }

    fn prefix(&self, namespace: &str) -> Option<String> {
        self.namespaces.get_by_right(namespace).cloned()
    }

    fn namespaces(&self) -> Vec<(String, String)> {
        self.namespaces
            .iter()
            .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
            .collect()
    }

    fn open(&mut self, config: &StoreConfig, create: bool) -> Result<(), TriplexError> {
        self.config.snapshot_path = config.snapshot_path.clone();
        match &config.snapshot_path {
            Some(path) if path.exists() => self.reload(),
            Some(path) if !create => Err(TriplexError::IoError(format!(
                "no store at {}",
                path.display()
            ))),
            _ => {
                self.committed = Some(self.to_snapshot()?);
                Ok(())
            }
        }
    }

    fn close(&mut self, commit_pending: bool) -> Result<(), TriplexError> {
        if commit_pending {
            self.commit()
        } else {
            self.rollback()
        }
    }

    fn commit(&mut self) -> Result<(), TriplexError> {
        self.persist()
    }

    /// Back to the image of the last `open` or `commit`; empty if there was neither.
    fn rollback(&mut self) -> Result<(), TriplexError> {
        match self.committed.clone() {
            Some(image) => self.restore(image),
            None => {
                self.clear();
                Ok(())
            }
        }
    }

    fn destroy(&mut self, config: &StoreConfig) -> Result<(), TriplexError> {
        if let Some(path) = config.snapshot_path.as_ref().filter(|p| p.exists()) {
            std::fs::remove_file(path)
                .map_err(|e| TriplexError::IoError(format!("{}: {}", path.display(), e)))?;
        }
        self.clear();
        self.committed = None;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
