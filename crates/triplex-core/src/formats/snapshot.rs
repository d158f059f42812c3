//! # Snapshot Format
//!
//! Binary image of a [`MemoryStore`], used by `open`/`close`/`commit`.
//!
//! Format: Header (5 bytes) + postcard-serialized [`StoreSnapshot`].
//! - 4 bytes: Magic ("TPLX")
//! - 1 byte: Version
//!
//! The snapshot stores terms, not interned ids, so ids are re-drawn on load.
//! Size and header are validated before the payload is decoded.

use crate::config::StoreConfig;
use crate::primitives::{FORMAT_VERSION, HEADER_SIZE, MAGIC_BYTES, MAX_SNAPSHOT_PAYLOAD_SIZE};
use crate::store::MemoryStore;
use crate::term::{Iri, Literal, Term};
use crate::TriplexError;
use serde::{Deserialize, Serialize};

// =============================================================================
// RECORDS
// =============================================================================

/// Serializable form of a storable term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermRecord {
    Iri(String),
    Blank(String),
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<String>,
    },
    Variable(String),
}

impl From<&Term> for TermRecord {
    fn from(term: &Term) -> Self {
        match term {
            Term::Iri(iri) => TermRecord::Iri(iri.as_str().to_string()),
            Term::BlankNode(b) => TermRecord::Blank(b.label().to_string()),
            Term::Literal(lit) => TermRecord::Literal {
                lexical: lit.lexical().to_string(),
                language: lit.language().map(str::to_string),
                datatype: lit.datatype().map(|dt| dt.as_str().to_string()),
            },
            Term::Variable(v) => TermRecord::Variable(v.name().to_string()),
        }
    }
}

impl TryFrom<TermRecord> for Term {
    type Error = TriplexError;

    fn try_from(record: TermRecord) -> Result<Self, Self::Error> {
        match record {
            TermRecord::Iri(iri) => Ok(Term::iri(iri)),
            TermRecord::Blank(label) => Ok(Term::blank(label)),
            TermRecord::Literal {
                lexical,
                language,
                datatype,
            } => Ok(Term::Literal(Literal::new(
                lexical,
                language,
                datatype.map(Iri::from),
            ))),
            TermRecord::Variable(name) => Err(TriplexError::InvalidTerm(format!(
                "snapshot contains variable ?{}",
                name
            ))),
        }
    }
}

/// One (triple, context) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuadRecord {
    pub subject: TermRecord,
    pub predicate: TermRecord,
    pub object: TermRecord,
    pub context: TermRecord,
    /// False for quoted triples.
    pub asserted: bool,
}

/// Everything needed to rebuild a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub default_context: TermRecord,
    pub quads: Vec<QuadRecord>,
    pub contexts: Vec<TermRecord>,
    pub quoted: Vec<TermRecord>,
    pub namespaces: Vec<(String, String)>,
}

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes all store data.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), TriplexError> {
        if &self.magic != MAGIC_BYTES {
            return Err(TriplexError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(TriplexError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TriplexError> {
        if bytes.len() < HEADER_SIZE {
            return Err(TriplexError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

pub fn snapshot_to_bytes(snapshot: &StoreSnapshot) -> Result<Vec<u8>, TriplexError> {
    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| TriplexError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&SnapshotHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a snapshot. Size and header are checked before the payload.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<StoreSnapshot, TriplexError> {
    if bytes.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(TriplexError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }
    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        TriplexError::DeserializationError(format!("Failed to decode snapshot: {}", e))
    })
}

/// Encode a whole store.
pub fn store_to_bytes(store: &MemoryStore) -> Result<Vec<u8>, TriplexError> {
    snapshot_to_bytes(&store.to_snapshot()?)
}

/// Rebuild a store from bytes produced by [`store_to_bytes`].
pub fn store_from_bytes(bytes: &[u8], config: StoreConfig) -> Result<MemoryStore, TriplexError> {
    MemoryStore::from_snapshot(snapshot_from_bytes(bytes)?, config)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::Triple;

    fn sample_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let ctx = Term::iri("http://e/ctx");
        store
            .add(
                &Triple::new(
                    Term::iri("http://e/a"),
                    Term::iri("http://e/p"),
                    Term::lang_literal("bonjour", "fr"),
                ),
                &ctx,
                false,
            )
            .expect("add");
        store
            .add(
                &Triple::new(Term::blank("b1"), Term::iri("http://e/p"), Term::iri("http://e/o")),
                &Term::blank("formula"),
                true,
            )
            .expect("add");
        store
    }

    #[test]
    fn header_roundtrip() {
        let bytes = SnapshotHeader::new().to_bytes();
        let restored = SnapshotHeader::from_bytes(&bytes).expect("parse header");
        assert_eq!(restored.magic, *MAGIC_BYTES);
        assert_eq!(restored.version, FORMAT_VERSION);
    }

    #[test]
    fn bytes_are_stable_across_reload() {
        let bytes1 = store_to_bytes(&sample_store()).expect("first");
        let restored = store_from_bytes(&bytes1, StoreConfig::default()).expect("load");
        let bytes2 = store_to_bytes(&restored).expect("second");
        assert_eq!(bytes1, bytes2, "save -> load -> save must produce identical bytes");
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(snapshot_from_bytes(&bytes).is_err());
    }

    #[test]
    fn truncated_data_rejected() {
        assert!(snapshot_from_bytes(b"TPL").is_err());
        let mut bytes = store_to_bytes(&sample_store()).expect("encode");
        bytes.truncate(HEADER_SIZE + 2);
        assert!(snapshot_from_bytes(&bytes).is_err());
    }

    #[test]
    fn variables_do_not_load() {
        let result = Term::try_from(TermRecord::Variable("x".to_string()));
        assert!(matches!(result, Err(TriplexError::InvalidTerm(_))));
    }
}
