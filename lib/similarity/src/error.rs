use std::io;
use thiserror::Error;

/// An error raised while computing, reading or writing label weights.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WeightError {
    /// A weight is negative or not a finite number.
    #[error("The weight of '{label}' must be a finite non-negative number, found {weight}")]
    NegativeWeight { label: String, weight: f64 },
    /// Inverse document frequencies need at least one graph.
    #[error("Cannot compute label weights from an empty corpus")]
    EmptyCorpus,
    /// The weight file is not a flat JSON object of numbers.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<WeightError> for io::Error {
    #[inline]
    fn from(error: WeightError) -> Self {
        match error {
            WeightError::Io(error) => error,
            WeightError::NegativeWeight { .. } | WeightError::Json(_) => {
                Self::new(io::ErrorKind::InvalidData, error)
            }
            WeightError::EmptyCorpus => Self::new(io::ErrorKind::InvalidInput, error),
        }
    }
}

/// An error raised while computing or writing a distance matrix.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DistanceError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The worker pool could not be created.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The number of row labels differs from the number of graphs.
    #[error("Expected {expected} labels, found {found}")]
    LabelCount { expected: usize, found: usize },
}

impl From<DistanceError> for io::Error {
    #[inline]
    fn from(error: DistanceError) -> Self {
        match error {
            DistanceError::LabelCount { .. } => Self::new(io::ErrorKind::InvalidInput, error),
            _ => Self::other(error),
        }
    }
}
