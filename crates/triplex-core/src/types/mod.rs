//! # Core Type Definitions
//!
//! This module contains the statement-level types shared by every layer:
//! - Interned identifiers (`NodeId`)
//! - Statements (`Triple`, `Quad`)
//! - Query patterns (`TriplePattern`, `TripleChoices`)
//! - Error types (`TriplexError`)
//!
//! Term values themselves live in [`crate::term`].

use crate::term::Term;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Compact key assigned to a term by the interning table.
///
/// Ids are drawn at random from the full 64-bit space and are only
/// meaningful inside the store that minted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

// =============================================================================
// STATEMENTS
// =============================================================================

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    #[must_use]
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Check that every position holds a term kind allowed in stored data.
    ///
    /// - subject: IRI or blank node
    /// - predicate: IRI
    /// - object: IRI, blank node or literal
    pub fn validate(&self) -> Result<(), TriplexError> {
        if !self.subject.is_resource() {
            return Err(TriplexError::InvalidTerm(format!(
                "subject must be an IRI or blank node, got {}",
                self.subject.n3()
            )));
        }
        if !self.predicate.is_iri() {
            return Err(TriplexError::InvalidTerm(format!(
                "predicate must be an IRI, got {}",
                self.predicate.n3()
            )));
        }
        if self.object.is_variable() {
            return Err(TriplexError::InvalidTerm(format!(
                "variables cannot be asserted, got {}",
                self.object.n3()
            )));
        }
        Ok(())
    }

    /// N3 rendering without the terminating dot.
    #[must_use]
    pub fn n3(&self) -> String {
        format!(
            "{} {} {}",
            self.subject.n3(),
            self.predicate.n3(),
            self.object.n3()
        )
    }

    /// Fully bound pattern matching exactly this triple.
    #[must_use]
    pub fn to_pattern(&self) -> TriplePattern {
        TriplePattern::new(
            Some(self.subject.clone()),
            Some(self.predicate.clone()),
            Some(self.object.clone()),
        )
    }
}

/// A triple together with the context asserting it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub triple: Triple,
    pub context: Term,
}

// =============================================================================
// PATTERNS
// =============================================================================

/// A partially bound triple. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl TriplePattern {
    #[must_use]
    pub fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The pattern matching every triple.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// True when no position is bound.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        self.subject.is_none() && self.predicate.is_none() && self.object.is_none()
    }

    /// Number of bound positions.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Brute-force match used by stores without an index for a position.
    #[must_use]
    pub fn matches(&self, triple: &Triple) -> bool {
        fn slot(bound: &Option<Term>, term: &Term) -> bool {
            bound.as_ref().is_none_or(|b| b == term)
        }
        slot(&self.subject, &triple.subject)
            && slot(&self.predicate, &triple.predicate)
            && slot(&self.object, &triple.object)
    }
}

/// Position inside a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Subject,
    Predicate,
    Object,
}

/// A pattern where one position takes any of several alternatives (an OR filter).
///
/// The value bound in `pattern` at `position` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleChoices {
    pub pattern: TriplePattern,
    pub position: Position,
    pub alternatives: Vec<Term>,
}

impl TripleChoices {
    #[must_use]
    pub fn new(pattern: TriplePattern, position: Position, alternatives: Vec<Term>) -> Self {
        Self {
            pattern,
            position,
            alternatives,
        }
    }

    /// One concrete pattern per alternative, in the given order.
    pub fn patterns(&self) -> impl Iterator<Item = TriplePattern> + '_ {
        self.alternatives.iter().map(|alt| {
            let mut pattern = self.pattern.clone();
            let slot = match self.position {
                Position::Subject => &mut pattern.subject,
                Position::Predicate => &mut pattern.predicate,
                Position::Object => &mut pattern.object,
            };
            *slot = Some(alt.clone());
            pattern
        })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the triplex store.
///
/// - Missing data is never an error: queries return nothing, removals are no-ops
/// - Use `Result<T, TriplexError>` for fallible operations
/// - The library never panics; invariant breaks surface as `UnknownNode`
#[derive(Debug, Error)]
pub enum TriplexError {
    /// A term appeared in a position it may not occupy.
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// An interned id has no term (interning invariant violated).
    #[error("Unknown node id: {0:?}")]
    UnknownNode(NodeId),

    /// An RDF list is missing a `first`/`rest` link or has extra ones.
    #[error("Malformed list: {0}")]
    MalformedList(String),

    /// An RDF list revisits one of its own nodes.
    #[error("Cyclic list: node {0} visited twice")]
    CyclicList(String),

    /// `Collection::index` did not find the item.
    #[error("Item not in list: {0}")]
    NotInList(String),

    /// A collection position past the end of the list.
    #[error("List index out of range: {0}")]
    IndexOutOfRange(usize),

    /// More than one binding matched where exactly one was required.
    #[error("Uniqueness violation: {0}")]
    Uniqueness(String),

    /// Mutation attempted on a GraphValue or a read-only aggregate.
    #[error("Graph is immutable: {0}")]
    Immutable(&'static str),

    /// The operation has no meaning on this kind of graph.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// The store lacks a capability the caller requires.
    #[error("Store capability mismatch: {0}")]
    CapabilityMismatch(String),

    /// A read-only aggregate needs at least one member graph.
    #[error("Aggregate requires at least one graph")]
    EmptyAggregate,

    /// No store factory registered under this name.
    #[error("Unknown store kind: {0}")]
    UnknownStore(String),

    /// A closed namespace does not define the requested local name.
    #[error("Term {name} not in namespace {namespace}")]
    UnknownNamespaceTerm { namespace: String, name: String },

    /// Random id generation kept colliding with existing ids.
    #[error("Node id space exhausted")]
    IdSpaceExhausted,

    /// Invalid store configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
