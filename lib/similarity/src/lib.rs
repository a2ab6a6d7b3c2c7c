//! Structural similarity of patterns.
//!
//! Patterns are first compressed into [CompressedPatternGraph]s: class assignments become node
//! labels and the remaining triples become labelled edges. Two compressed graphs are compared by a
//! label-weighted maximum common structure search ([similarity]). The label weights are either
//! fixed or derived from the inverse document frequency of the labels in a corpus
//! ([LabelWeights::idf]).

mod compression;
mod error;
mod matrix;
mod rules;
mod search;
mod weights;

pub use compression::{CompressedPatternGraph, UNTYPED_LABEL};
pub use error::{DistanceError, WeightError};
pub use matrix::DistanceMatrix;
pub use rules::{CompressionRules, PredicateRule};
pub use search::{align, distance, similarity, Alignment, SearchBudget};
pub use weights::{LabelHierarchy, LabelWeights, DEFAULT_WEIGHT};
