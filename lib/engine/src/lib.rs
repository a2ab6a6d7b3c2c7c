//! Matching of patterns against target graphs under the No Repeated Anything (NRA) semantics.
//!
//! A [Pattern] is compiled into a [ConjunctiveQuery](query::ConjunctiveQuery) and evaluated by a
//! [QueryEvaluator]. Under NRA, distinct variables are bound to distinct terms and no variable is
//! bound to a constant that occurs in the pattern. The number of matches of a pattern is the
//! number of distinct variable groundings.
//!
//! ```
//! use motif_engine::{MatchBudget, Matcher, Pattern};
//! use motif_model::{TargetGraph, Triple};
//!
//! let pattern = Pattern::parse([("<a>", "<b>", "?v1")]).unwrap();
//! let graph = TargetGraph::new([Triple::parse("<a>", "<b>", "<x>").unwrap()]);
//! let matcher = Matcher::new(MatchBudget::unlimited());
//! assert_eq!(matcher.count(&pattern, &graph).unwrap(), 1);
//! ```

mod content;
mod domination;
mod error;
mod eval;
mod pattern;
pub mod query;

pub use content::{ContentReport, ContentRule, ContentRules};
pub use error::*;
pub use eval::{BacktrackingEvaluator, Match, MatchBudget, Matcher, QueryEvaluator};
pub use pattern::Pattern;
pub use query::QueryForm;
