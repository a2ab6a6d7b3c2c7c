use crate::CorpusError;
use flate2::read::MultiGzDecoder;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// The placeholder of the pattern size in a [CorpusLayout] template.
pub const SIZE_PLACEHOLDER: &str = "{size}";

const GZIP_EXTENSION: &str = ".gz";

/// Describes how the corpus files of a directory are named.
///
/// There is one file per pattern size. The file name is derived from a template containing the
/// [SIZE_PLACEHOLDER]. A gzip-compressed variant (`<file name>.gz`) is preferred over the plain
/// file if both exist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CorpusLayout {
    template: String,
}

impl CorpusLayout {
    /// Creates a new [CorpusLayout] from a file name template such as `output-size-{size}.dat`.
    pub fn new(template: impl Into<String>) -> Result<Self, CorpusError> {
        let template = template.into();
        if template.matches(SIZE_PLACEHOLDER).count() != 1 {
            return Err(CorpusError::InvalidTemplate(template));
        }
        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the (uncompressed) file name of the corpus file for `size`.
    pub fn file_name(&self, size: usize) -> String {
        self.template.replace(SIZE_PLACEHOLDER, &size.to_string())
    }

    /// Returns the path of the corpus file for `size` in `directory`, if any.
    pub fn locate(&self, directory: &Path, size: usize) -> Option<PathBuf> {
        let plain = directory.join(self.file_name(size));
        let compressed = directory.join(format!("{}{GZIP_EXTENSION}", self.file_name(size)));
        [compressed, plain].into_iter().find(|path| path.is_file())
    }

    /// Returns the sorted pattern sizes for which `directory` contains a corpus file.
    pub fn discover_sizes(&self, directory: &Path) -> Result<Vec<usize>, CorpusError> {
        let regex = self.file_name_regex();
        let mut sizes = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let size = regex
                .captures(&name)
                .and_then(|captures| captures.get(1))
                .and_then(|size| size.as_str().parse::<usize>().ok());
            if let Some(size) = size {
                sizes.push(size);
            }
        }
        sizes.sort_unstable();
        sizes.dedup();
        Ok(sizes)
    }

    #[allow(clippy::expect_used, reason = "Escaped input always forms a valid regex")]
    fn file_name_regex(&self) -> Regex {
        let (prefix, suffix) = self
            .template
            .split_once(SIZE_PLACEHOLDER)
            .unwrap_or((self.template.as_str(), ""));
        let pattern = format!(
            r"^{}(\d+){}(?:\.gz)?$",
            regex::escape(prefix),
            regex::escape(suffix)
        );
        Regex::new(&pattern).expect("escaped file name template is a valid regex")
    }
}

impl Default for CorpusLayout {
    fn default() -> Self {
        Self {
            template: format!("output-size-{SIZE_PLACEHOLDER}.dat"),
        }
    }
}

/// Opens a corpus file, transparently decompressing it if its name ends in `.gz`.
pub fn open_corpus_file(path: &Path) -> Result<Box<dyn BufRead>, CorpusError> {
    let file = File::open(path)?;
    if is_compressed(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub(crate) fn is_compressed(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|path| path.ends_with(GZIP_EXTENSION))
}
