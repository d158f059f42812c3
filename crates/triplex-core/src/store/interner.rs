//! # Node Interning Table
//!
//! Bidirectional map between terms and compact [`NodeId`]s.
//!
//! Terms are keyed by their structural identity ([`TermKey`]). Ids are drawn
//! at random from the 64-bit space and redrawn on collision; an id is never
//! reassigned for the lifetime of the table.

use crate::primitives::MAX_ID_ATTEMPTS;
use crate::term::{Term, TermKey};
use crate::{NodeId, TriplexError};
use bimap::BiBTreeMap;
use rand::Rng;
use std::fmt;

/// Source of candidate ids.
pub type IdSource = Box<dyn FnMut() -> u64 + Send + Sync>;

pub struct NodeTable {
    nodes: BiBTreeMap<NodeId, TermKey>,
    draw: IdSource,
}

impl NodeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_source(Box::new(|| rand::rng().random()))
    }

    /// Table drawing candidate ids from `draw` instead of the thread RNG.
    #[must_use]
    pub fn with_id_source(draw: IdSource) -> Self {
        Self {
            nodes: BiBTreeMap::new(),
            draw,
        }
    }

    /// Id of `term`, minting one if the term is new.
    pub fn internalize(&mut self, term: &Term) -> Result<NodeId, TriplexError> {
        let key = term.key();
        if let Some(id) = self.nodes.get_by_right(&key) {
            return Ok(*id);
        }
        for attempt in 0..MAX_ID_ATTEMPTS {
            let id = NodeId((self.draw)());
            if !self.nodes.contains_left(&id) {
                self.nodes.insert(id, key);
                return Ok(id);
            }
            tracing::debug!("Node id {:?} collided (attempt {}), redrawing", id, attempt);
        }
        Err(TriplexError::IdSpaceExhausted)
    }

    /// Id of `term` without interning it.
    #[must_use]
    pub fn lookup(&self, term: &Term) -> Option<NodeId> {
        self.nodes.get_by_right(&term.key()).copied()
    }

    /// Term for `id`. An unknown id means an index outlived its table.
    pub fn externalize(&self, id: NodeId) -> Result<&Term, TriplexError> {
        self.nodes
            .get_by_left(&id)
            .map(TermKey::term)
            .ok_or(TriplexError::UnknownNode(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTable")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
