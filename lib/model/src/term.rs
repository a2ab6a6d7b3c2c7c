use crate::PatternError;
use oxrdf::{NamedNode, NamedNodeRef, Variable, VariableRef};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A term of a pattern or a target graph.
///
/// A term is either a constant (an IRI) or a variable. A constant and a variable are never equal,
/// even if the IRI and the variable name are the same string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// An opaque, IRI-like atom.
    Constant(NamedNode),
    /// A named placeholder.
    Variable(Variable),
}

impl Term {
    /// Parses a term from its textual form.
    ///
    /// `<...>` denotes a constant and `?...` denotes a variable. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self, PatternError> {
        let value = value.trim();
        if let Some(iri) = value.strip_prefix('<') {
            let iri = iri
                .strip_suffix('>')
                .ok_or_else(|| PatternError::UnrecognisedTerm(value.to_owned()))?;
            return Ok(Self::Constant(parse_iri(iri)?));
        }
        if let Some(name) = value.strip_prefix('?') {
            return Variable::new(name)
                .map(Self::Variable)
                .map_err(|_| PatternError::InvalidVariable(name.to_owned()));
        }
        Err(PatternError::UnrecognisedTerm(value.to_owned()))
    }

    /// Creates a constant from an IRI without validating it.
    pub fn constant(iri: impl Into<String>) -> Self {
        Self::Constant(NamedNode::new_unchecked(iri))
    }

    /// Creates a variable from a name without validating it.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new_unchecked(name))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns the constant if this term is one.
    pub fn as_constant(&self) -> Option<NamedNodeRef<'_>> {
        match self {
            Self::Constant(nn) => Some(nn.as_ref()),
            Self::Variable(_) => None,
        }
    }

    /// Returns the variable if this term is one.
    pub fn as_variable(&self) -> Option<VariableRef<'_>> {
        match self {
            Self::Constant(_) => None,
            Self::Variable(var) => Some(var.as_ref()),
        }
    }

    /// Returns the IRI or the variable name, without any delimiters.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Constant(nn) => nn.as_str(),
            Self::Variable(var) => var.as_str(),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(nn) => nn.fmt(f),
            Self::Variable(var) => var.fmt(f),
        }
    }
}

/// Constants sort before variables, then by their string value.
impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Constant(lhs), Self::Constant(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Self::Variable(lhs), Self::Variable(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Self::Constant(_), Self::Variable(_)) => Ordering::Less,
            (Self::Variable(_), Self::Constant(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<NamedNode> for Term {
    fn from(value: NamedNode) -> Self {
        Self::Constant(value)
    }
}

impl From<NamedNodeRef<'_>> for Term {
    fn from(value: NamedNodeRef<'_>) -> Self {
        Self::Constant(value.into_owned())
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

/// Validates the body of an IRI (without the angle brackets).
///
/// Only the characters that can never occur in an IRI are rejected. Relative IRIs are accepted as
/// mined corpora and hand-written patterns frequently use them.
pub fn parse_iri(iri: &str) -> Result<NamedNode, PatternError> {
    let is_invalid = |c: char| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    };
    if iri.is_empty() || iri.chars().any(is_invalid) {
        return Err(PatternError::InvalidIri(iri.to_owned()));
    }
    Ok(NamedNode::new_unchecked(iri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_constant() {
        let term = Term::parse(" <http://example.com/a> ").unwrap();
        assert_eq!(term, Term::constant("http://example.com/a"));
        assert!(term.is_constant());
    }

    #[test]
    fn parse_variable() {
        let term = Term::parse("?v1").unwrap();
        assert_eq!(term, Term::variable("v1"));
        assert_eq!(term.to_string(), "?v1");
    }

    #[test]
    fn parse_rejects_bare_strings() {
        assert_eq!(
            Term::parse("a"),
            Err(PatternError::UnrecognisedTerm("a".to_owned()))
        );
        assert_eq!(Term::parse("<>"), Err(PatternError::InvalidIri(String::new())));
        assert!(matches!(
            Term::parse("<a b>"),
            Err(PatternError::InvalidIri(_))
        ));
    }

    #[test]
    fn constant_and_variable_never_equal() {
        assert_ne!(Term::constant("x"), Term::variable("x"));
        assert!(Term::constant("z") < Term::variable("a"));
    }
}
