use crate::layout::{is_compressed, open_corpus_file};
use crate::CorpusError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Rewrites a corpus file, keeping only the lines that describe patterns (tags `0` and `6`).
///
/// Corpus files produced by the miner also list every match of every pattern, which makes them
/// large and slow to read. The destination is gzip-compressed if its name ends in `.gz`. `source`
/// and `destination` must be different files. Returns the number of lines kept.
pub fn clean_corpus_file(source: &Path, destination: &Path) -> Result<usize, CorpusError> {
    let reader = open_corpus_file(source)?;
    let file = BufWriter::new(File::create(destination)?);
    let kept = if is_compressed(destination) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        let kept = filter_pattern_lines(reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        kept
    } else {
        let mut file = file;
        let kept = filter_pattern_lines(reader, &mut file)?;
        file.flush()?;
        kept
    };
    info!(
        "Kept {kept} pattern lines of {} in {}",
        source.display(),
        destination.display()
    );
    Ok(kept)
}

fn filter_pattern_lines(reader: impl BufRead, writer: &mut impl Write) -> Result<usize, CorpusError> {
    let mut kept = 0;
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('0') || line.starts_with('6') {
            writeln!(writer, "{line}")?;
            kept += 1;
        }
    }
    Ok(kept)
}
