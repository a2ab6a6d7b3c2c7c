//! Loading target graphs from RDF files.
//!
//! Only the skeleton of an RDF graph is matched against: triples whose subject and object are both
//! IRIs. Triples with literal or blank node endpoints are dropped while loading.

use crate::error::LoaderError;
use motif_model::{TargetGraph, Term, Triple};
use oxrdf::{Subject, Term as RdfTerm};
pub use oxrdfio::RdfFormat;
use oxrdfio::RdfParser;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Guesses the RDF format of a file from its extension.
pub fn rdf_format_from_path(path: &Path) -> Option<RdfFormat> {
    path.extension()
        .and_then(OsStr::to_str)
        .and_then(RdfFormat::from_extension)
}

/// Reads the skeleton of an RDF document. All graphs of a dataset are merged.
pub fn read_target_graph(reader: impl Read, format: RdfFormat) -> Result<TargetGraph, LoaderError> {
    let mut triples = Vec::new();
    let mut dropped = 0_usize;
    for quad in RdfParser::from_format(format).for_reader(reader) {
        let quad = quad?;
        match (quad.subject, quad.object) {
            (Subject::NamedNode(subject), RdfTerm::NamedNode(object)) => {
                triples.push(Triple::new(
                    Term::Constant(subject),
                    quad.predicate,
                    Term::Constant(object),
                ));
            }
            _ => dropped += 1,
        }
    }
    let graph = TargetGraph::new(triples);
    debug!(
        "Read {} skeleton triples, dropped {dropped} triples with non-IRI endpoints",
        graph.len()
    );
    Ok(graph)
}

/// Reads the skeleton of an RDF file. The format is derived from the file extension.
pub fn load_target_graph(path: &Path) -> Result<TargetGraph, LoaderError> {
    let format = rdf_format_from_path(path).ok_or_else(|| LoaderError::UnknownFormat(path.to_owned()))?;
    debug!("Loading {} as {format}", path.display());
    read_target_graph(BufReader::new(File::open(path)?), format)
}
