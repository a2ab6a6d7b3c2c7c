//! Domination between patterns.
//!
//! A pattern `A` dominates a pattern `B` (written `B ≤ A`) if `A` matches the triples of `B`,
//! read as a graph in which the variables of `B` are ordinary terms. If `B ≤ A` and `A` has no
//! match in some graph, then `B` has no match in that graph either.
//!
//! `A` strictly dominates `B` (written `B < A`) if, in addition, `A` is a proper subpattern of `B`
//! up to a renaming of variables: there is a match that binds every variable of `A` to a variable
//! of `B` and `A` has fewer triples than `B`. Consequently, no pattern strictly dominates itself.

use crate::eval::{BacktrackingEvaluator, MatchBudget, Matcher, QueryEvaluator};
use crate::{MatchError, Pattern};
use motif_model::Triple;

impl<E: QueryEvaluator> Matcher<E> {
    /// Checks `dominated ≤ dominating`.
    pub fn dominates(&self, dominating: &Pattern, dominated: &Pattern) -> Result<bool, MatchError> {
        self.has_match(dominating, &dominated.to_graph())
    }

    /// Checks `dominated < dominating`.
    pub fn strictly_dominates(
        &self,
        dominating: &Pattern,
        dominated: &Pattern,
    ) -> Result<bool, MatchError> {
        if dominating.len() >= dominated.len() {
            return Ok(false);
        }
        self.find(dominating, &dominated.to_graph(), |m| {
            m.binds_only_variables()
        })
    }
}

impl Pattern {
    /// Returns true if this pattern dominates `other` (`other ≤ self`).
    pub fn dominates(&self, other: &Self) -> Result<bool, MatchError> {
        unbounded().dominates(self, other)
    }

    /// Returns true if this pattern strictly dominates `other` (`other < self`).
    pub fn strictly_dominates(&self, other: &Self) -> Result<bool, MatchError> {
        unbounded().strictly_dominates(self, other)
    }

    /// Returns true if this pattern is dominated by `other` (`self ≤ other`).
    pub fn is_dominated_by(&self, other: &Self) -> Result<bool, MatchError> {
        other.dominates(self)
    }

    /// Returns true if the single-triple pattern `{triple}` dominates this pattern, i.e., if some
    /// triple of this pattern is `triple` up to a renaming of variables.
    pub fn contains_triple(&self, triple: &Triple) -> Result<bool, MatchError> {
        Self::new([triple.clone()]).dominates(self)
    }
}

fn unbounded() -> Matcher<BacktrackingEvaluator> {
    Matcher::new(MatchBudget::unlimited())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(triples: &[(&str, &str, &str)]) -> Pattern {
        Pattern::parse(triples.iter().copied()).unwrap()
    }

    #[test]
    fn budget_applies_to_domination() {
        let a = pattern(&[("?a", "<p>", "?b"), ("?b", "<p>", "?c"), ("?c", "<p>", "?d")]);
        let b = pattern(&[
            ("?w", "<p>", "?x"),
            ("?x", "<p>", "?y"),
            ("?y", "<p>", "?z"),
            ("?z", "<p>", "?w"),
        ]);
        let matcher = Matcher::new(MatchBudget::steps(1));
        assert!(matches!(
            matcher.dominates(&a, &b),
            Err(MatchError::BudgetExhausted { steps: 1 })
        ));
        assert!(a.dominates(&b).unwrap());
        assert!(a.strictly_dominates(&b).unwrap());
    }
}
