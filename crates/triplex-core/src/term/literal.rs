//! # Literals
//!
//! A literal is a lexical form with an optional language tag or datatype.
//! When the datatype has a registered conversion, the derived value is
//! computed once at construction and drives equality, hashing and ordering.

use super::Iri;
use super::datatypes;
use crate::primitives::XSD_NS;
use jiff::civil;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

// =============================================================================
// DERIVED VALUES
// =============================================================================

/// Native value of a typed literal.
#[derive(Debug, Clone)]
pub enum LiteralValue {
    Integer(i128),
    Float(f64),
    Boolean(bool),
    Date(civil::Date),
    Time(civil::Time),
    DateTime(civil::DateTime),
    Bytes(Vec<u8>),
    Text(String),
}

/// `value` as an integer when it is integral and fits in `i128`.
fn exact_integer(value: f64) -> Option<i128> {
    let in_range = value >= i128::MIN as f64 && value < i128::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as i128)
}

/// Integer against float, without rounding the integer.
fn compare_mixed(integer: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    match exact_integer(float) {
        Some(n) => Some(integer.cmp(&n)),
        None if float >= i128::MAX as f64 => Some(Ordering::Less),
        None if float < i128::MIN as f64 => Some(Ordering::Greater),
        // Non-integral floats are below 2^53 in magnitude, so rounding the
        // integer cannot cross them.
        None => (integer as f64).partial_cmp(&float),
    }
}

/// NaN compares equal to itself so that `Eq` stays reflexive.
fn compare_floats(a: f64, b: f64) -> Option<Ordering> {
    if a.is_nan() && b.is_nan() {
        Some(Ordering::Equal)
    } else {
        a.partial_cmp(&b)
    }
}

impl LiteralValue {
    fn compare_numbers(&self, other: &Self) -> Option<Ordering> {
        use LiteralValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Integer(a), Float(b)) => compare_mixed(*a, *b),
            (Float(a), Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
            (Float(a), Float(b)) => compare_floats(*a, *b),
            _ => None,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        use LiteralValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            _ => self.compare_numbers(other) == Some(Ordering::Equal),
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use LiteralValue::*;
        match self {
            Integer(i) => (0u8, i).hash(state),
            Float(f) => match exact_integer(*f) {
                // Integral floats hash like the integer they equal.
                Some(i) => (0u8, i).hash(state),
                None if f.is_nan() => (7u8, f64::NAN.to_bits()).hash(state),
                None => (7u8, f.to_bits()).hash(state),
            },
            Boolean(b) => (1u8, b).hash(state),
            Date(d) => (2u8, d).hash(state),
            Time(t) => (3u8, t).hash(state),
            DateTime(dt) => (4u8, dt).hash(state),
            Bytes(bytes) => (5u8, bytes).hash(state),
            Text(text) => (6u8, text).hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use LiteralValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Time(a), Time(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            _ => self.compare_numbers(other),
        }
    }
}

// =============================================================================
// LITERAL
// =============================================================================

/// An RDF literal.
#[derive(Debug, Clone)]
pub struct Literal {
    lexical: String,
    language: Option<String>,
    datatype: Option<Iri>,
    value: Option<LiteralValue>,
}

impl Literal {
    /// Build a literal. A datatype suppresses the language tag.
    #[must_use]
    pub fn new(lexical: impl Into<String>, language: Option<String>, datatype: Option<Iri>) -> Self {
        let lexical = lexical.into();
        let language = if datatype.is_some() { None } else { language };
        let value = datatype
            .as_ref()
            .and_then(|dt| datatypes::convert(dt.as_str(), &lexical));
        Self {
            lexical,
            language,
            datatype,
            value,
        }
    }

    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self::new(lexical, None, None)
    }

    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self::new(lexical, None, Some(datatype.into()))
    }

    #[must_use]
    pub fn with_language(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(lexical, Some(language.into()), None)
    }

    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    /// The derived value, if the datatype converted.
    #[must_use]
    pub fn value(&self) -> Option<&LiteralValue> {
        self.value.as_ref()
    }

    /// N3 notation. Lexical forms containing a newline use triple quotes.
    #[must_use]
    pub fn n3(&self) -> String {
        let escaped = self.lexical.replace('\\', "\\\\");
        let quoted = if self.lexical.contains('\n') {
            format!("\"\"\"{}\"\"\"", escaped.replace("\"\"\"", "\\\"\\\"\\\""))
        } else {
            format!("\"{}\"", escaped.replace('"', "\\\""))
        };
        match (&self.language, &self.datatype) {
            (Some(language), _) => format!("{}@{}", quoted, language),
            (None, Some(datatype)) => format!("{}^^<{}>", quoted, datatype.as_str()),
            (None, None) => quoted,
        }
    }

    fn components(&self) -> (&str, Option<&str>, Option<&str>) {
        (
            &self.lexical,
            self.language.as_deref(),
            self.datatype.as_ref().map(Iri::as_str),
        )
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (&self.value, &other.value) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.components() == other.components(),
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.value {
            Some(value) => {
                1u8.hash(state);
                value.hash(state);
            }
            None => {
                0u8.hash(state);
                self.components().hash(state);
            }
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        let by_value = match (&self.value, &other.value) {
            (Some(a), Some(b)) => a.partial_cmp(b),
            _ => None,
        };
        if let Some(ordering) = by_value.filter(|o| *o != Ordering::Equal) {
            return Some(ordering);
        }
        Some(self.components().cmp(&other.components()))
    }
}

// =============================================================================
// NATIVE CONVERSIONS
// =============================================================================

fn xsd(name: &str) -> Iri {
    Iri::new(format!("{XSD_NS}{name}"))
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::typed(value.to_string(), xsd("integer"))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::typed(value.to_string(), xsd("double"))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::typed(value.to_string(), xsd("boolean"))
    }
}

impl From<civil::Date> for Literal {
    fn from(value: civil::Date) -> Self {
        Literal::typed(value.to_string(), xsd("date"))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::plain(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::plain(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
