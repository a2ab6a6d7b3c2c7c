//! Mined pattern corpora and the batch operations over them.
//!
//! A corpus directory holds one file per pattern size (see [CorpusLayout]). Each file is read into
//! a [PatternSet], and all sets of a directory form a [PatternCollection].

mod batch;
mod clean;
mod collection;
mod curation;
mod error;
mod layout;
mod pattern_set;

pub use batch::{
    count_matches, partition, BatchOptions, MatchCount, MatchRow, MatchTable, RowOutcome,
    MISSING_VALUE,
};
pub use clean::clean_corpus_file;
pub use collection::PatternCollection;
pub use curation::{
    check_content, domination_parents, select_candidates, CandidateSelection, ContentReports,
    DominationParents, FailedPattern,
};
pub use error::CorpusError;
pub use layout::{open_corpus_file, CorpusLayout, SIZE_PLACEHOLDER};
pub use pattern_set::{PatternSet, RejectedPattern};
