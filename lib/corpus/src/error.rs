use motif_engine::MatchError;
use motif_model::PatternError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while reading a pattern corpus or running a batch operation over it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CorpusError {
    /// Error from the underlying file system.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A triple line holds a term that is not a valid IRI or variable.
    #[error("Line {line}: {source}")]
    InvalidTriple {
        line: usize,
        #[source]
        source: PatternError,
    },
    /// A line does not have the shape required by its tag.
    #[error("Line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    /// A requested pattern size has no corpus file.
    #[error("No corpus file for patterns of size {size} in {}", directory.display())]
    MissingSizeFile { size: usize, directory: PathBuf },
    /// The file name template does not contain the size placeholder exactly once.
    #[error("The file name template '{0}' must contain '{{size}}' exactly once")]
    InvalidTemplate(String),
    /// A content rule could not be evaluated.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Error while writing a table.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The worker pool could not be created.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CorpusError {
    pub(crate) fn malformed<T>(line: usize, reason: impl Into<String>) -> Result<T, Self> {
        Err(Self::MalformedLine {
            line,
            reason: reason.into(),
        })
    }
}

impl From<CorpusError> for io::Error {
    #[inline]
    fn from(error: CorpusError) -> Self {
        match error {
            CorpusError::Io(error) => error,
            CorpusError::InvalidTriple { .. } | CorpusError::MalformedLine { .. } => {
                Self::new(io::ErrorKind::InvalidData, error)
            }
            CorpusError::MissingSizeFile { .. } => Self::new(io::ErrorKind::NotFound, error),
            CorpusError::InvalidTemplate(_) => Self::new(io::ErrorKind::InvalidInput, error),
            _ => Self::other(error),
        }
    }
}
