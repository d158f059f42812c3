//! # Term Model
//!
//! Immutable value types for RDF terms.
//!
//! A [`Term`] is a closed union of four variants:
//! - [`Iri`]: an absolute IRI
//! - [`BlankNode`]: a locally scoped label
//! - [`Literal`]: lexical form + language tag or datatype, with a cached derived value
//! - [`Variable`]: a query placeholder, never stored
//!
//! ## Two notions of identity
//!
//! `PartialEq`/`Hash` on `Term` are *value* based: `"1"^^xsd:integer` equals
//! `"1.0"^^xsd:float`. The store, however, interns terms by their *structural*
//! identity ([`TermKey`]), so those two literals stay distinct nodes.

mod bnode;
pub mod datatypes;
mod literal;

pub use literal::{Literal, LiteralValue};

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// IRI
// =============================================================================

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the fragment form to the path form: the last `#` becomes `/`.
    #[must_use]
    pub fn to_concrete(&self) -> Iri {
        match self.0.rfind('#') {
            Some(i) => Iri(format!("{}/{}", &self.0[..i], &self.0[i + 1..])),
            None => self.clone(),
        }
    }

    /// Map the path form to the fragment form: the last `/` becomes `#`.
    ///
    /// IRIs that already carry a fragment are returned unchanged; IRIs
    /// without a path get an empty fragment appended.
    #[must_use]
    pub fn to_abstract(&self) -> Iri {
        if self.0.contains('#') {
            return self.clone();
        }
        if !has_path(&self.0) {
            return Iri(format!("{}#", self.0));
        }
        match self.0.rfind('/') {
            Some(i) => Iri(format!("{}#{}", &self.0[..i], &self.0[i + 1..])),
            None => self.clone(),
        }
    }

    /// The IRI with any fragment removed.
    #[must_use]
    pub fn defrag(&self) -> Iri {
        match self.0.split_once('#') {
            Some((base, _)) => Iri(base.to_string()),
            None => self.clone(),
        }
    }
}

fn has_path(iri: &str) -> bool {
    match iri.split_once("://") {
        Some((_, rest)) => rest
            .find(['/', '?'])
            .is_some_and(|i| rest[i..].starts_with('/')),
        None => iri.split_once(':').is_some_and(|(_, path)| !path.is_empty()),
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Iri::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Iri(value)
    }
}

// =============================================================================
// BLANK NODES & VARIABLES
// =============================================================================

/// A blank node. Two blank nodes are equal iff their labels are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlankNode(String);

impl BlankNode {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Mint a label unique within this process.
    ///
    /// Labels are a random per-process prefix plus a shared counter, so
    /// nothing stops a different process from minting the same label.
    #[must_use]
    pub fn fresh() -> Self {
        Self(bnode::next_label())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

/// A query variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(String);

impl Variable {
    /// Create a variable; one leading `?` is stripped.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.strip_prefix('?').unwrap_or(name).to_string())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// TERM
// =============================================================================

/// Kind tag of a term. Ordered so that literals sort first and variables last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermKind {
    Literal,
    BlankNode,
    Iri,
    Variable,
}

impl TermKind {
    /// Byte distinguishing kinds inside fingerprints.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            TermKind::Iri => b'U',
            TermKind::BlankNode => b'B',
            TermKind::Literal => b'L',
            TermKind::Variable => b'V',
        }
    }
}

/// An RDF term.
#[derive(Debug, Clone)]
pub enum Term {
    Iri(Iri),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
}

impl Term {
    #[must_use]
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(Iri::new(value))
    }

    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(BlankNode::new(label))
    }

    /// A blank node with a freshly minted label.
    #[must_use]
    pub fn fresh_blank() -> Self {
        Term::BlankNode(BlankNode::fresh())
    }

    /// A plain literal (no language, no datatype).
    #[must_use]
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(lexical))
    }

    #[must_use]
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    #[must_use]
    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal::with_language(lexical, language))
    }

    #[must_use]
    pub fn variable(name: &str) -> Self {
        Term::Variable(Variable::new(name))
    }

    #[must_use]
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Iri(_) => TermKind::Iri,
            Term::BlankNode(_) => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
            Term::Variable(_) => TermKind::Variable,
        }
    }

    #[must_use]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// IRI or blank node: the kinds allowed as subject or context.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::BlankNode(_))
    }

    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The main string of the term: IRI text, blank label, lexical form or variable name.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::BlankNode(b) => b.label(),
            Term::Literal(lit) => lit.lexical(),
            Term::Variable(v) => v.name(),
        }
    }

    /// Canonical N3 notation.
    #[must_use]
    pub fn n3(&self) -> String {
        match self {
            Term::Iri(iri) => format!("<{}>", iri.as_str()),
            Term::BlankNode(b) => format!("_:{}", b.label()),
            Term::Literal(lit) => lit.n3(),
            Term::Variable(v) => format!("?{}", v.name()),
        }
    }

    /// Keyed structural hash: kind tag plus every lexical component.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.kind().tag()]);
        hasher.update(self.lexical().as_bytes());
        if let Term::Literal(lit) = self {
            hasher.update(&[0]);
            if let Some(language) = lit.language() {
                hasher.update(b"@");
                hasher.update(language.as_bytes());
            }
            hasher.update(&[0]);
            if let Some(datatype) = lit.datatype() {
                hasher.update(b"^");
                hasher.update(datatype.as_str().as_bytes());
            }
        }
        Fingerprint(*hasher.finalize().as_bytes())
    }

    /// Structural identity key, usable in ordered collections.
    #[must_use]
    pub fn key(&self) -> TermKey {
        TermKey(self.clone())
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a == b,
            (Term::BlankNode(a), Term::BlankNode(b)) => a == b,
            (Term::Literal(a), Term::Literal(b)) => a == b,
            (Term::Variable(a), Term::Variable(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Term::Iri(iri) => iri.hash(state),
            Term::BlankNode(b) => b.hash(state),
            Term::Literal(lit) => lit.hash(state),
            Term::Variable(v) => v.hash(state),
        }
    }
}

/// Terms of different kinds order by kind (literal < blank node < IRI < variable).
/// Literals compare by derived value when both convert, else lexically.
///
/// `Option<Term>` inherits the rule that absence sorts before everything.
impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => Some(a.cmp(b)),
            (Term::BlankNode(a), Term::BlankNode(b)) => Some(a.cmp(b)),
            (Term::Literal(a), Term::Literal(b)) => a.partial_cmp(b),
            (Term::Variable(a), Term::Variable(b)) => Some(a.cmp(b)),
            _ => Some(self.kind().cmp(&other.kind())),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.n3())
    }
}

impl From<Iri> for Term {
    fn from(value: Iri) -> Self {
        Term::Iri(value)
    }
}

impl From<BlankNode> for Term {
    fn from(value: BlankNode) -> Self {
        Term::BlankNode(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

// =============================================================================
// STRUCTURAL IDENTITY
// =============================================================================

/// 32-byte BLAKE3 fingerprint of a term's structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// A term compared by kind and lexical components only.
///
/// This is the identity the store interns on. Unlike `Term`'s own
/// equality, `"1"^^xsd:integer` and `"01"^^xsd:integer` are different keys.
#[derive(Debug, Clone)]
pub struct TermKey(Term);

impl TermKey {
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0
    }

    #[must_use]
    pub fn into_term(self) -> Term {
        self.0
    }

    fn parts(&self) -> (TermKind, &str, Option<&str>, Option<&str>) {
        let (language, datatype) = match &self.0 {
            Term::Literal(lit) => (lit.language(), lit.datatype().map(Iri::as_str)),
            _ => (None, None),
        };
        (self.0.kind(), self.0.lexical(), language, datatype)
    }
}

impl PartialEq for TermKey {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for TermKey {}

impl PartialOrd for TermKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TermKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts().cmp(&other.parts())
    }
}

impl Hash for TermKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

impl From<Term> for TermKey {
    fn from(value: Term) -> Self {
        TermKey(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::XSD_NS;
    use std::collections::BTreeSet;

    #[test]
    fn n3_forms() {
        assert_eq!(Term::iri("http://e/a").n3(), "<http://e/a>");
        assert_eq!(Term::blank("b0").n3(), "_:b0");
        assert_eq!(Term::variable("?x").n3(), "?x");
        assert_eq!(Term::lang_literal("chat", "fr").n3(), "\"chat\"@fr");
    }

    #[test]
    fn variable_strips_one_question_mark() {
        assert_eq!(Variable::new("?x").name(), "x");
        assert_eq!(Variable::new("??x").name(), "?x");
        assert_eq!(Variable::new("x").name(), "x");
    }

    #[test]
    fn concrete_and_abstract_forms() {
        let hash = Iri::new("http://e.org/vocab#Thing");
        assert_eq!(hash.to_concrete().as_str(), "http://e.org/vocab/Thing");
        assert_eq!(hash.to_concrete().to_abstract(), hash);

        let bare = Iri::new("http://e.org");
        assert_eq!(bare.to_abstract().as_str(), "http://e.org#");
        assert_eq!(hash.defrag().as_str(), "http://e.org/vocab");
    }

    #[test]
    fn kinds_never_equal_across_variants() {
        assert_ne!(Term::iri("x"), Term::blank("x"));
        assert_ne!(Term::literal("x"), Term::variable("x"));
    }

    #[test]
    fn kind_ordering() {
        let lit = Term::literal("z");
        let blank = Term::blank("a");
        let iri = Term::iri("a");
        assert!(lit < blank);
        assert!(blank < iri);
        assert!(iri < Term::variable("a"));
        assert!(None < Some(lit));
    }

    #[test]
    fn fingerprint_distinguishes_kinds() {
        assert_ne!(
            Term::iri("x").fingerprint(),
            Term::blank("x").fingerprint()
        );
        assert_ne!(
            Term::literal("x").fingerprint(),
            Term::lang_literal("x", "en").fingerprint()
        );
        assert_eq!(Term::iri("x").fingerprint(), Term::iri("x").fingerprint());
        assert_eq!(Term::iri("x").fingerprint().to_hex().len(), 64);
    }

    #[test]
    fn term_key_is_structural() {
        let one = Term::typed_literal("1", format!("{XSD_NS}integer"));
        let one_float = Term::typed_literal("1.0", format!("{XSD_NS}float"));
        assert_eq!(one, one_float);
        assert_ne!(one.key(), one_float.key());

        let keys: BTreeSet<TermKey> = [one.key(), one_float.key(), one.key()].into();
        assert_eq!(keys.len(), 2);
    }
}
