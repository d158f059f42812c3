//! # Formats
//!
//! - `snapshot`: binary store image (header + postcard payload)
//! - `canonical`: deterministic triple encoding behind GraphValue identities
//! - `Serializer`/`Parser`: text-format extension points, plus N-Triples output

pub mod canonical;
pub mod snapshot;

pub use canonical::{CanonicalGraph, CanonicalTriple};
pub use snapshot::{
    QuadRecord, SnapshotHeader, StoreSnapshot, TermRecord, snapshot_from_bytes,
    snapshot_to_bytes, store_from_bytes, store_to_bytes,
};

use crate::TriplexError;
use crate::graph::GraphOps;
use crate::types::TriplePattern;
use std::io::{Read, Write};

// =============================================================================
// TEXT FORMAT CONTRACTS
// =============================================================================

/// Writes a graph in some text format.
///
/// Output must end with a newline.
pub trait Serializer {
    fn serialize(&self, graph: &dyn GraphOps, out: &mut dyn Write) -> Result<(), TriplexError>;
}

/// Reads triples from a source into a target graph.
///
/// Malformed input fails the whole call; implementations must not leave a
/// partial graph behind silently.
pub trait Parser {
    fn parse(&self, source: &mut dyn Read, target: &dyn GraphOps) -> Result<(), TriplexError>;
}

/// N-Triples: one `<s> <p> <o> .` line per triple.
#[derive(Debug, Clone, Copy, Default)]
pub struct NTriplesSerializer;

impl Serializer for NTriplesSerializer {
    fn serialize(&self, graph: &dyn GraphOps, out: &mut dyn Write) -> Result<(), TriplexError> {
        let io = |e: std::io::Error| TriplexError::IoError(e.to_string());
        let triples = graph.triples(&TriplePattern::any())?;
        if triples.is_empty() {
            return out.write_all(b"\n").map_err(io);
        }
        for triple in triples {
            writeln!(out, "{} .", triple.n3()).map_err(io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::term::Term;
    use crate::Triple;

    #[test]
    fn ntriples_lines_end_with_newline() {
        let graph = Graph::memory();
        graph
            .add(Triple::new(
                Term::iri("http://e/s"),
                Term::iri("http://e/p"),
                Term::lang_literal("hi", "en"),
            ))
            .expect("add");
        let mut out = Vec::new();
        NTriplesSerializer.serialize(&graph, &mut out).expect("serialize");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "<http://e/s> <http://e/p> \"hi\"@en .\n");
    }

    #[test]
    fn empty_graph_still_ends_with_newline() {
        let mut out = Vec::new();
        NTriplesSerializer
            .serialize(&Graph::memory(), &mut out)
            .expect("serialize");
        assert_eq!(out, b"\n");
    }
}
