use std::io;
use thiserror::Error;

/// An error raised when a pattern cannot be compiled into a conjunctive query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QueryCompilationError {
    /// The evaluator tracks bound variables in a 64-bit mask.
    #[error("Patterns may use at most {max} variables, found {found}")]
    TooManyVariables { found: usize, max: usize },
    /// A triple uses a variable that is not declared as a variable of the query.
    #[error("The variable {0} is not declared in the query")]
    UndeclaredVariable(String),
}

/// An error raised while evaluating a pattern against a target graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The pattern could not be compiled.
    #[error(transparent)]
    Compilation(#[from] QueryCompilationError),
    /// The search exceeded the configured step budget before completing.
    #[error("The match search was aborted after {steps} steps")]
    BudgetExhausted { steps: u64 },
}

impl MatchError {
    /// Returns true if the error only reflects the configured budget and not the pattern itself.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(self, Self::BudgetExhausted { .. })
    }
}

impl From<QueryCompilationError> for io::Error {
    #[inline]
    fn from(error: QueryCompilationError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, error)
    }
}

impl From<MatchError> for io::Error {
    #[inline]
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::Compilation(error) => error.into(),
            MatchError::BudgetExhausted { .. } => Self::new(io::ErrorKind::TimedOut, error),
        }
    }
}
