mod error;
mod graph;
mod term;
mod triple;
pub mod vocab;

pub use error::*;
pub use graph::{PredicateIndex, TargetGraph, TermDictionary, TermId};
pub use term::*;
pub use triple::*;

// Re-export the oxrdf atoms used by this data model.
pub use oxrdf::{NamedNode, NamedNodeRef, Variable, VariableNameParseError, VariableRef};
