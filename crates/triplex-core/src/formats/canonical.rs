//! # Canonical Graph Encoding
//!
//! Deterministic byte form of a set of triples, used to give a
//! [`GraphValue`](crate::graph::GraphValue) its content-addressed identity.
//!
//! Triples are rendered in N3, sorted and deduplicated, then encoded with
//! postcard. Two graphs with the same triples always produce the same bytes,
//! whatever store or insertion order they came from.

use crate::primitives::CONTENT_HASH_SCHEME;
use crate::term::Term;
use crate::{Triple, TriplexError};
use serde::{Deserialize, Serialize};

/// One triple in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl From<&Triple> for CanonicalTriple {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: triple.subject.n3(),
            predicate: triple.predicate.n3(),
            object: triple.object.n3(),
        }
    }
}

/// Sorted, deduplicated triples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGraph {
    pub triples: Vec<CanonicalTriple>,
}

impl CanonicalGraph {
    #[must_use]
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> Self {
        let mut triples: Vec<CanonicalTriple> =
            triples.into_iter().map(CanonicalTriple::from).collect();
        triples.sort();
        triples.dedup();
        Self { triples }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TriplexError> {
        postcard::to_stdvec(self).map_err(|e| TriplexError::SerializationError(e.to_string()))
    }

    /// BLAKE3 hash of the canonical bytes, as 64 hex characters.
    pub fn content_hash(&self) -> Result<String, TriplexError> {
        Ok(blake3::hash(&self.to_bytes()?).to_hex().to_string())
    }

    /// `data:<hash>` identifier.
    pub fn identifier(&self) -> Result<Term, TriplexError> {
        Ok(Term::iri(format!(
            "{}{}",
            CONTENT_HASH_SCHEME,
            self.content_hash()?
        )))
    }
}
