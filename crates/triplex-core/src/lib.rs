//! # triplex-core
//!
//! Context-aware triple store for RDF-style data.
//!
//! The store keeps every triple under a context (a named graph) and maintains
//! a context-free aggregate of asserted triples next to it. Graph views are
//! cheap handles that scope queries and mutations to one context, to the
//! aggregate, or to a union of graphs.
//!
//! ## Layers
//!
//! - `term`: IRIs, blank nodes, literals (with datatype conversion) and variables
//! - `store`: node interning, CSPO/CPOS/COSP indices, snapshots
//! - `namespace`: prefix bindings and qualified names
//! - `graph`: Graph, ConjunctiveGraph, QuotedGraph, GraphValue, ReadOnlyGraphAggregate
//! - `collection`: RDF lists with in-place editing
//!
//! ## Constraints
//!
//! - BTreeMap/BTreeSet only, so iteration order is reproducible within a run
//! - No async, no network dependencies
//! - Missing data is never an error: queries come back empty, removals are no-ops

// =============================================================================
// MODULES
// =============================================================================

pub mod collection;
pub mod config;
pub mod formats;
pub mod graph;
pub mod namespace;
pub mod primitives;
pub mod store;
pub mod term;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{NodeId, Position, Quad, Triple, TripleChoices, TriplePattern, TriplexError};

// =============================================================================
// RE-EXPORTS: Terms
// =============================================================================

pub use term::{BlankNode, Iri, Literal, LiteralValue, Term, TermKey, TermKind, Variable};

// =============================================================================
// RE-EXPORTS: Store and Graphs
// =============================================================================

pub use collection::Collection;
pub use config::StoreConfig;
pub use graph::{
    ConjunctiveGraph, Graph, GraphOps, GraphValue, QuotedGraph, ReadOnlyGraphAggregate,
    transitive_closure,
};
pub use namespace::{ClosedNamespace, Namespace, NamespaceManager, QualifiedName};
pub use store::{
    MemoryStore, SharedStore, Store, StoreCapabilities, StoreRegistry, StoreSource, shared,
};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{NTriplesSerializer, Parser, Serializer, store_from_bytes, store_to_bytes};
