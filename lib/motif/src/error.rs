use oxrdfio::RdfParseError;
use std::io;
use std::path::PathBuf;

/// An error raised while loading a target graph from an RDF file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoaderError {
    /// An error raised while reading the file.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The RDF format cannot be derived from the file name.
    #[error("Not able to guess the RDF format of {}", .0.display())]
    UnknownFormat(PathBuf),
}

impl From<LoaderError> for io::Error {
    #[inline]
    fn from(error: LoaderError) -> Self {
        match error {
            LoaderError::Parsing(error) => error.into(),
            LoaderError::Io(error) => error,
            LoaderError::UnknownFormat(_) => Self::new(io::ErrorKind::InvalidInput, error.to_string()),
        }
    }
}
