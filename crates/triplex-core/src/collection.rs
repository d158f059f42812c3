//! # Collections
//!
//! Ordered list semantics over an RDF list (`rdf:first` / `rdf:rest` chain
//! ending in `rdf:nil`), edited in place in the owning graph.
//!
//! The head node is stable: removing the first item copies the successor's
//! links into the head instead of re-pointing references to the list.

use crate::graph::GraphOps;
use crate::namespace::rdf;
use crate::term::Term;
use crate::{Triple, TriplePattern, TriplexError};
use std::collections::BTreeSet;

/// A list view rooted at `head`.
pub struct Collection<'g> {
    graph: &'g dyn GraphOps,
    head: Term,
}

impl<'g> Collection<'g> {
    pub fn new(graph: &'g dyn GraphOps, head: Term) -> Self {
        Self { graph, head }
    }

    /// Build a list at `head` (fresh blank node when `None`) holding `items`.
    pub fn from_items(
        graph: &'g dyn GraphOps,
        head: Option<Term>,
        items: impl IntoIterator<Item = Term>,
    ) -> Result<Self, TriplexError> {
        let collection = Self::new(graph, head.unwrap_or_else(Term::fresh_blank));
        for item in items {
            collection.append(item)?;
        }
        Ok(collection)
    }

    pub fn head(&self) -> &Term {
        &self.head
    }

    pub fn items(&self) -> Result<Vec<Term>, TriplexError> {
        self.graph.items(&self.head)
    }

    pub fn len(&self) -> Result<usize, TriplexError> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TriplexError> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, index: usize) -> Result<Term, TriplexError> {
        let node = self.container(index)?;
        self.first_of(&node)?
            .ok_or(TriplexError::IndexOutOfRange(index))
    }

    /// Replace the item at `index`.
    pub fn set(&self, index: usize, item: Term) -> Result<(), TriplexError> {
        let node = self.container(index)?;
        if self.first_of(&node)?.is_none() {
            return Err(TriplexError::IndexOutOfRange(index));
        }
        self.graph.set(Triple::new(node, rdf::first(), item))
    }

    /// Position of the first occurrence of `item`.
    pub fn index(&self, item: &Term) -> Result<usize, TriplexError> {
        let nil = rdf::nil();
        let mut visited = BTreeSet::new();
        let mut node = self.head.clone();
        let mut position = 0usize;
        loop {
            if !visited.insert(node.key()) {
                return Err(TriplexError::CyclicList(node.n3()));
            }
            if self.first_of(&node)?.as_ref() == Some(item) {
                return Ok(position);
            }
            let mut links = self.graph.objects(Some(&node), Some(&rdf::rest()))?;
            let next = match links.len() {
                0 => {
                    return Err(TriplexError::MalformedList(format!(
                        "{} has no rdf:rest",
                        node.n3()
                    )));
                }
                1 => links.swap_remove(0),
                _ => {
                    return Err(TriplexError::MalformedList(format!(
                        "{} has {} rdf:rest links",
                        node.n3(),
                        links.len()
                    )));
                }
            };
            if next == nil {
                return Err(TriplexError::NotInList(item.n3()));
            }
            node = next;
            position += 1;
        }
    }

    pub fn contains(&self, item: &Term) -> Result<bool, TriplexError> {
        Ok(self.items()?.contains(item))
    }

    /// Delete the item at `index`, keeping the head node in place.
    pub fn remove_at(&self, index: usize) -> Result<(), TriplexError> {
        let node = self.container(index)?;
        if self.first_of(&node)?.is_none() {
            return Err(TriplexError::IndexOutOfRange(index));
        }
        let next = self.rest_of(&node)?.ok_or_else(|| {
            TriplexError::MalformedList(format!("{} has no rdf:rest", node.n3()))
        })?;

        if index == 0 {
            if next == rdf::nil() {
                self.unlink(&node)?;
            } else {
                let malformed =
                    || TriplexError::MalformedList(format!("{} is not a list node", next.n3()));
                let next_first = self.first_of(&next)?.ok_or_else(malformed)?;
                let next_rest = self.rest_of(&next)?.ok_or_else(malformed)?;
                self.graph.set(Triple::new(node.clone(), rdf::first(), next_first))?;
                self.graph.set(Triple::new(node, rdf::rest(), next_rest))?;
                self.unlink(&next)?;
            }
        } else {
            let prior = self.container(index - 1)?;
            self.graph.set(Triple::new(prior, rdf::rest(), next))?;
            self.unlink(&node)?;
        }
        Ok(())
    }

    /// Add `item` at the end.
    ///
    /// A list rooted at `rdf:nil` is the shared empty list and cannot grow.
    pub fn append(&self, item: Term) -> Result<(), TriplexError> {
        let nil = rdf::nil();
        if self.head == nil {
            return Err(TriplexError::MalformedList(
                "rdf:nil cannot hold items".to_string(),
            ));
        }
        let mut visited = BTreeSet::new();
        let mut tail = self.head.clone();
        loop {
            if !visited.insert(tail.key()) {
                return Err(TriplexError::CyclicList(tail.n3()));
            }
            match self.rest_of(&tail)? {
                None => {
                    if self.first_of(&tail)?.is_some() {
                        return Err(TriplexError::MalformedList(format!(
                            "{} has no rdf:rest",
                            tail.n3()
                        )));
                    }
                    break;
                }
                Some(next) if next == nil => {
                    let node = Term::fresh_blank();
                    self.graph.set(Triple::new(tail, rdf::rest(), node.clone()))?;
                    tail = node;
                    break;
                }
                Some(next) => tail = next,
            }
        }
        self.graph.add(Triple::new(tail.clone(), rdf::first(), item))?;
        self.graph.add(Triple::new(tail, rdf::rest(), nil))
    }

    /// Remove every `first`/`rest` triple of the chain, leaving an empty list.
    pub fn clear(&self) -> Result<(), TriplexError> {
        let nil = rdf::nil();
        let mut node = self.head.clone();
        // Each step unlinks the node it leaves, so a cycle ends at the
        // first revisited node.
        while node != nil {
            let next = self.rest_of(&node)?;
            self.unlink(&node)?;
            match next {
                Some(next) => node = next,
                None => break,
            }
        }
        Ok(())
    }

    /// `( a b c )`
    pub fn n3(&self) -> Result<String, TriplexError> {
        let items: Vec<String> = self.items()?.iter().map(Term::n3).collect();
        Ok(format!("( {} )", items.join(" ")))
    }

    /// The list node holding position `index`.
    fn container(&self, index: usize) -> Result<Term, TriplexError> {
        let nil = rdf::nil();
        let mut node = self.head.clone();
        for _ in 0..index {
            match self.rest_of(&node)? {
                Some(next) if next != nil => node = next,
                _ => return Err(TriplexError::IndexOutOfRange(index)),
            }
        }
        Ok(node)
    }

    fn first_of(&self, node: &Term) -> Result<Option<Term>, TriplexError> {
        self.graph.value(Some(node), Some(&rdf::first()), None, None, true)
    }

    fn rest_of(&self, node: &Term) -> Result<Option<Term>, TriplexError> {
        self.graph.value(Some(node), Some(&rdf::rest()), None, None, true)
    }

    fn unlink(&self, node: &Term) -> Result<(), TriplexError> {
        self.graph
            .remove(&TriplePattern::new(Some(node.clone()), Some(rdf::first()), None))?;
        self.graph
            .remove(&TriplePattern::new(Some(node.clone()), Some(rdf::rest()), None))
    }
}

impl std::fmt::Debug for Collection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
