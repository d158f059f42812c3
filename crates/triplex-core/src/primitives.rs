//! # Store Primitives
//!
//! Hardcoded constants for the triplex store.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Anything an operator may want to change at runtime lives in
//! [`StoreConfig`](crate::config::StoreConfig) instead.

// =============================================================================
// WELL-KNOWN NAMESPACES
// =============================================================================

/// The RDF syntax namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The RDF Schema namespace.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// The XML Schema datatypes namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// The reserved XML namespace, bound to `xml` by every namespace manager.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Scheme prepended to the hex content hash that identifies a GraphValue.
pub const CONTENT_HASH_SCHEME: &str = "data:";

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Number of random ASCII letters in the per-process blank node prefix.
pub const BNODE_PREFIX_LEN: usize = 8;

/// How many random node ids the interning table draws before giving up.
///
/// With a 64-bit id space a single collision is already unlikely;
/// exhausting this bound means the random source is broken.
pub const MAX_ID_ATTEMPTS: usize = 64;

/// Prefixes starting with this marker were generated by the namespace
/// manager and may be overwritten by an explicit binding.
pub const GENERATED_PREFIX_MARKER: char = '_';

/// Base used for collision-renamed prefixes when the requested prefix is empty.
pub const DEFAULT_PREFIX_BASE: &str = "default";

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the triplex snapshot header.
///
/// - File Header = Magic Bytes ("TPLX") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TPLX";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot layout.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the snapshot header in bytes.
pub const HEADER_SIZE: usize = 5;

/// Maximum allowed snapshot size, validated before decoding.
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 500 * 1024 * 1024; // 500 MB
