use std::io;
use thiserror::Error;

/// An error raised when a term or a triple does not have the shape required by a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A term is neither an IRI (`<...>`) nor a variable (`?...`).
    #[error("Unrecognised term '{0}': terms must be IRIs (<...>) or variables (?...)")]
    UnrecognisedTerm(String),
    /// The IRI of a term is empty or contains characters that are not allowed in an IRI.
    #[error("Invalid IRI '{0}'")]
    InvalidIri(String),
    /// The name of a variable is not a valid SPARQL variable name.
    #[error("Invalid variable name '{0}'")]
    InvalidVariable(String),
    /// A triple was given with more or less than three terms.
    #[error("Triples must consist of exactly three terms, {0} found")]
    WrongArity(usize),
    /// The predicate of a triple is a variable.
    #[error("The predicate of a triple must be a constant, found variable {0}")]
    VariablePredicate(String),
}

impl From<PatternError> for io::Error {
    #[inline]
    fn from(error: PatternError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
