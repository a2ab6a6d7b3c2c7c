mod backtracking;

pub use backtracking::BacktrackingEvaluator;

use crate::query::ConjunctiveQuery;
use crate::{MatchError, Pattern};
use motif_model::{TargetGraph, Term, TermId, Variable, VariableRef};
use std::ops::ControlFlow;
use tracing::debug;

/// Limits the work of a single evaluation.
///
/// A step is a single candidate binding examined by the evaluator. NRA matching is exponential
/// in the number of variables in the worst case, so batch operations should set a limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatchBudget {
    /// The maximum number of steps, or `None` for an unlimited search.
    pub max_steps: Option<u64>,
}

impl MatchBudget {
    /// Creates a budget without a limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Creates a budget that allows at most `max_steps` steps.
    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
        }
    }
}

/// Evaluates a [ConjunctiveQuery] against a [TargetGraph].
///
/// Implementations must enumerate every solution exactly once: every assignment of graph terms to
/// the query variables that satisfies all atoms and all constraints. For each solution, the
/// visitor is called with the bound term of every variable, indexed like
/// [ConjunctiveQuery::variables]. The evaluation stops early if the visitor returns
/// [ControlFlow::Break].
pub trait QueryEvaluator: Send + Sync {
    fn evaluate(
        &self,
        query: &ConjunctiveQuery,
        graph: &TargetGraph,
        budget: MatchBudget,
        visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>,
    ) -> Result<(), MatchError>;
}

/// A solution of a pattern: the terms bound to its variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    /// Sorted by variable name.
    bindings: Vec<(Variable, Term)>,
}

impl Match {
    /// Returns the term bound to `variable`.
    pub fn get(&self, variable: VariableRef<'_>) -> Option<&Term> {
        self.bindings
            .binary_search_by(|(var, _)| var.as_str().cmp(variable.as_str()))
            .ok()
            .map(|index| &self.bindings[index].1)
    }

    /// Iterates over the bindings, sorted by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter().map(|(var, term)| (var, term))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns true if every variable is bound to a variable of the target graph.
    pub fn binds_only_variables(&self) -> bool {
        self.bindings.iter().all(|(_, term)| term.is_variable())
    }

    fn from_ids(query: &ConjunctiveQuery, graph: &TargetGraph, ids: &[TermId]) -> Self {
        let bindings = query
            .variables()
            .iter()
            .zip(ids)
            .filter_map(|(var, id)| Some((var.clone(), graph.term(*id)?.clone())))
            .collect();
        Self { bindings }
    }
}

/// Matches patterns against target graphs using a [QueryEvaluator] and a [MatchBudget].
#[derive(Clone, Debug, Default)]
pub struct Matcher<E = BacktrackingEvaluator> {
    evaluator: E,
    budget: MatchBudget,
}

impl Matcher {
    /// Creates a new [Matcher] using the [BacktrackingEvaluator].
    pub fn new(budget: MatchBudget) -> Self {
        Self::with_evaluator(BacktrackingEvaluator, budget)
    }
}

impl<E: QueryEvaluator> Matcher<E> {
    /// Creates a new [Matcher] using a custom evaluation backend.
    pub fn with_evaluator(evaluator: E, budget: MatchBudget) -> Self {
        Self { evaluator, budget }
    }

    pub fn budget(&self) -> MatchBudget {
        self.budget
    }

    /// Returns all matches of `pattern` in `graph`.
    pub fn matches(&self, pattern: &Pattern, graph: &TargetGraph) -> Result<Vec<Match>, MatchError> {
        let query = pattern.compile()?;
        let mut result = Vec::new();
        self.evaluator
            .evaluate(&query, graph, self.budget, &mut |ids| {
                result.push(Match::from_ids(&query, graph, ids));
                ControlFlow::Continue(())
            })?;
        Ok(result)
    }

    /// Returns the number of matches of `pattern` in `graph`.
    pub fn count(&self, pattern: &Pattern, graph: &TargetGraph) -> Result<u64, MatchError> {
        let query = pattern.compile()?;
        let mut count = 0;
        self.evaluator
            .evaluate(&query, graph, self.budget, &mut |_| {
                count += 1;
                ControlFlow::Continue(())
            })
            .inspect_err(|error| debug!("Counting matches of {pattern} failed: {error}"))?;
        Ok(count)
    }

    /// Returns true if `pattern` has at least one match in `graph`.
    pub fn has_match(&self, pattern: &Pattern, graph: &TargetGraph) -> Result<bool, MatchError> {
        self.find(pattern, graph, |_| true)
    }

    /// Returns true if `pattern` has a match in `graph` that satisfies `predicate`.
    ///
    /// The evaluation stops at the first such match.
    pub fn find(
        &self,
        pattern: &Pattern,
        graph: &TargetGraph,
        mut predicate: impl FnMut(&Match) -> bool,
    ) -> Result<bool, MatchError> {
        let query = pattern.compile()?;
        let mut found = false;
        self.evaluator
            .evaluate(&query, graph, self.budget, &mut |ids| {
                if predicate(&Match::from_ids(&query, graph, ids)) {
                    found = true;
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })?;
        Ok(found)
    }
}
