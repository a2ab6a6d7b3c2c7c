use crate::{PatternError, Term};
use oxrdf::NamedNode;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A `(subject, predicate, object)` triple.
///
/// The predicate is always a constant. Variable predicates are not supported, so the type does not
/// allow them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: NamedNode,
    pub object: Term,
}

impl Triple {
    /// Creates a new [Triple].
    pub fn new(subject: impl Into<Term>, predicate: NamedNode, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Creates a triple from three terms, rejecting a variable in the predicate position.
    pub fn try_from_terms(subject: Term, predicate: Term, object: Term) -> Result<Self, PatternError> {
        match predicate {
            Term::Constant(predicate) => Ok(Self {
                subject,
                predicate,
                object,
            }),
            Term::Variable(var) => Err(PatternError::VariablePredicate(var.to_string())),
        }
    }

    /// Parses a triple from the textual forms of its terms (see [Term::parse]).
    pub fn parse(subject: &str, predicate: &str, object: &str) -> Result<Self, PatternError> {
        Self::try_from_terms(
            Term::parse(subject)?,
            Term::parse(predicate)?,
            Term::parse(object)?,
        )
    }

    /// Parses a triple from a slice that must hold exactly three terms.
    pub fn from_parts(parts: &[&str]) -> Result<Self, PatternError> {
        match parts {
            [subject, predicate, object] => Self::parse(subject, predicate, object),
            _ => Err(PatternError::WrongArity(parts.len())),
        }
    }

    /// Returns true if neither the subject nor the object is a variable.
    pub fn is_ground(&self) -> bool {
        self.subject.is_constant() && self.object.is_constant()
    }

    /// Iterates over the subject, the predicate and the object.
    pub fn terms(&self) -> impl Iterator<Item = Term> + '_ {
        [
            self.subject.clone(),
            Term::Constant(self.predicate.clone()),
            self.object.clone(),
        ]
        .into_iter()
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl Ord for Triple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.subject
            .cmp(&other.subject)
            .then_with(|| self.predicate.as_str().cmp(other.predicate.as_str()))
            .then_with(|| self.object.cmp(&other.object))
    }
}

impl PartialOrd for Triple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
