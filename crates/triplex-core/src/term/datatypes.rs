//! # Datatype Registry
//!
//! Process-wide table mapping a datatype IRI to the function that derives
//! a native value from a lexical form. Seeded with the XSD defaults on first
//! use; [`bind`] and [`lookup`] are the only operations.
//!
//! Datatypes without an entry (xsd:string, xsd:anyURI, ...) have no derived
//! value, so their literals compare by lexical components.

use super::LiteralValue;
use crate::primitives::XSD_NS;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jiff::civil;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

/// Derives a native value from a lexical form; `None` means the form did not parse.
pub type Conversion = Arc<dyn Fn(&str) -> Option<LiteralValue> + Send + Sync>;

static REGISTRY: LazyLock<RwLock<BTreeMap<String, Conversion>>> =
    LazyLock::new(|| RwLock::new(default_conversions()));

// =============================================================================
// REGISTRY OPERATIONS
// =============================================================================

/// Register a conversion for `datatype`, replacing any previous one.
///
/// Literals built before the call keep the value they were built with.
pub fn bind(datatype: &str, conversion: Conversion) {
    let previous = REGISTRY.write().insert(datatype.to_string(), conversion);
    if previous.is_some() {
        tracing::warn!("Conversion for {} rebound, previous function replaced", datatype);
    }
}

/// The conversion registered for `datatype`, if any.
pub fn lookup(datatype: &str) -> Option<Conversion> {
    REGISTRY.read().get(datatype).cloned()
}

/// Convert a lexical form. Failures are logged and yield no value.
pub(crate) fn convert(datatype: &str, lexical: &str) -> Option<LiteralValue> {
    // Called outside the lock so a conversion may itself consult the registry.
    let conversion = lookup(datatype)?;
    let value = conversion(lexical);
    if value.is_none() {
        tracing::warn!("Cannot convert {:?} to {}, keeping lexical form", lexical, datatype);
    }
    value
}

// =============================================================================
// XSD DEFAULTS
// =============================================================================

const INTEGER_TYPES: &[&str] = &[
    "integer",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "nonPositiveInteger",
    "negativeInteger",
    "positiveInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
];

const FLOAT_TYPES: &[&str] = &["decimal", "float", "double"];

fn default_conversions() -> BTreeMap<String, Conversion> {
    let mut table: BTreeMap<String, Conversion> = BTreeMap::new();
    let mut put = |name: &str, conversion: Conversion| {
        table.insert(format!("{XSD_NS}{name}"), conversion);
    };

    for name in INTEGER_TYPES.iter().copied() {
        put(name, Arc::new(parse_integer));
    }
    for name in FLOAT_TYPES.iter().copied() {
        put(name, Arc::new(parse_float));
    }
    put("boolean", Arc::new(parse_boolean));
    put("date", Arc::new(parse_date));
    put("time", Arc::new(parse_time));
    put("dateTime", Arc::new(parse_date_time));
    put("base64Binary", Arc::new(parse_base64));
    table
}

fn parse_integer(lexical: &str) -> Option<LiteralValue> {
    lexical.trim().parse().ok().map(LiteralValue::Integer)
}

fn parse_float(lexical: &str) -> Option<LiteralValue> {
    let value = match lexical.trim() {
        "INF" | "+INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        other => other.parse().ok()?,
    };
    Some(LiteralValue::Float(value))
}

fn parse_boolean(lexical: &str) -> Option<LiteralValue> {
    match lexical.trim() {
        "true" | "1" => Some(LiteralValue::Boolean(true)),
        "false" | "0" => Some(LiteralValue::Boolean(false)),
        _ => None,
    }
}

fn parse_date(lexical: &str) -> Option<LiteralValue> {
    lexical
        .trim()
        .parse::<civil::Date>()
        .ok()
        .map(LiteralValue::Date)
}

fn parse_time(lexical: &str) -> Option<LiteralValue> {
    let lexical = lexical.trim();
    lexical
        .strip_suffix('Z')
        .unwrap_or(lexical)
        .parse::<civil::Time>()
        .ok()
        .map(LiteralValue::Time)
}

fn parse_date_time(lexical: &str) -> Option<LiteralValue> {
    let lexical = lexical.trim();
    lexical
        .strip_suffix('Z')
        .unwrap_or(lexical)
        .parse::<civil::DateTime>()
        .ok()
        .map(LiteralValue::DateTime)
}

fn parse_base64(lexical: &str) -> Option<LiteralValue> {
    let compact: String = lexical.split_whitespace().collect();
    STANDARD.decode(compact).ok().map(LiteralValue::Bytes)
}

// =============================================================================
// TESTS
// =============================================================================
