use crate::eval::{MatchBudget, QueryEvaluator};
use crate::query::{ConjunctiveQuery, Constraint, QueryTerm};
use crate::MatchError;
use motif_model::{PredicateIndex, TargetGraph, Term, TermId};
use std::ops::ControlFlow;
use tracing::trace;

/// A depth-first evaluator that joins the atoms of a query in planned order.
///
/// Candidate bindings come from the predicate index of the target graph. A binding is rejected as
/// soon as it violates a [Constraint], so the NRA constraints prune the search instead of
/// filtering complete solutions.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktrackingEvaluator;

impl QueryEvaluator for BacktrackingEvaluator {
    fn evaluate(
        &self,
        query: &ConjunctiveQuery,
        graph: &TargetGraph,
        budget: MatchBudget,
        visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>,
    ) -> Result<(), MatchError> {
        let Some(mut search) = Search::new(query, graph, budget) else {
            // Some constant or predicate does not occur in the graph.
            return Ok(());
        };
        if search.extend(0, visitor)?.is_break() {
            trace!(steps = search.steps, "Evaluation stopped by the visitor");
        } else {
            trace!(steps = search.steps, "Evaluation finished");
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Fixed(TermId),
    Variable(usize),
}

struct ResolvedAtom<'graph> {
    subject: Slot,
    index: &'graph PredicateIndex,
    object: Slot,
}

struct Search<'graph> {
    atoms: Vec<ResolvedAtom<'graph>>,
    bindings: Vec<Option<TermId>>,
    /// For each variable, the variables it must differ from.
    distinct: Vec<Vec<usize>>,
    /// For each variable, the graph terms it must not be bound to.
    excluded: Vec<Vec<TermId>>,
    solution: Vec<TermId>,
    steps: u64,
    max_steps: Option<u64>,
}

impl<'graph> Search<'graph> {
    fn new(query: &ConjunctiveQuery, graph: &'graph TargetGraph, budget: MatchBudget) -> Option<Self> {
        let resolve = |term: &QueryTerm| match term {
            QueryTerm::Constant(nn) => graph
                .term_id(&Term::Constant(nn.clone()))
                .map(Slot::Fixed),
            QueryTerm::Variable(var) => Some(Slot::Variable(*var)),
        };

        let atoms = query
            .planned_atoms()
            .map(|atom| {
                let predicate = graph.term_id(&Term::Constant(atom.predicate.clone()))?;
                Some(ResolvedAtom {
                    subject: resolve(&atom.subject)?,
                    index: graph.predicate(predicate)?,
                    object: resolve(&atom.object)?,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let variable_count = query.variables().len();
        let mut distinct = vec![Vec::new(); variable_count];
        let mut excluded = vec![Vec::new(); variable_count];
        for constraint in query.constraints() {
            match constraint {
                Constraint::DistinctVariables(a, b) => {
                    distinct[*a].push(*b);
                    distinct[*b].push(*a);
                }
                Constraint::ExcludeConstant(var, constant) => {
                    // Constants that do not occur in the graph cannot be bound anyway.
                    if let Some(id) = graph.term_id(&Term::Constant(constant.clone())) {
                        excluded[*var].push(id);
                    }
                }
            }
        }

        Some(Self {
            atoms,
            bindings: vec![None; variable_count],
            distinct,
            excluded,
            solution: Vec::with_capacity(variable_count),
            steps: 0,
            max_steps: budget.max_steps,
        })
    }

    fn extend(
        &mut self,
        depth: usize,
        visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, MatchError> {
        let Some(atom) = self.atoms.get(depth) else {
            return Ok(self.emit(visitor));
        };
        let index = atom.index;
        let (subject, object) = (atom.subject, atom.object);

        match (self.value(subject), self.value(object)) {
            (Some(s), Some(o)) => {
                self.step()?;
                if index.contains(s, o) {
                    return self.extend(depth + 1, visitor);
                }
            }
            (Some(s), None) => {
                for &o in index.objects(s) {
                    if self.try_bind(object, o, depth, visitor)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
            (None, Some(o)) => {
                for &s in index.subjects(o) {
                    if self.try_bind(subject, s, depth, visitor)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
            (None, None) => {
                for &(s, o) in index.pairs() {
                    if self.try_bind_pair(subject, s, object, o, depth, visitor)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Binds a single free variable and descends.
    fn try_bind(
        &mut self,
        slot: Slot,
        value: TermId,
        depth: usize,
        visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, MatchError> {
        self.step()?;
        let Slot::Variable(var) = slot else {
            return Ok(ControlFlow::Continue(()));
        };
        if !self.can_bind(var, value) {
            return Ok(ControlFlow::Continue(()));
        }
        self.bindings[var] = Some(value);
        let result = self.extend(depth + 1, visitor);
        self.bindings[var] = None;
        result
    }

    /// Binds the free subject and object variables of an atom and descends.
    fn try_bind_pair(
        &mut self,
        subject: Slot,
        s: TermId,
        object: Slot,
        o: TermId,
        depth: usize,
        visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, MatchError> {
        self.step()?;
        let (Slot::Variable(sv), Slot::Variable(ov)) = (subject, object) else {
            return Ok(ControlFlow::Continue(()));
        };

        if sv == ov {
            if s != o || !self.can_bind(sv, s) {
                return Ok(ControlFlow::Continue(()));
            }
            self.bindings[sv] = Some(s);
            let result = self.extend(depth + 1, visitor);
            self.bindings[sv] = None;
            return result;
        }

        if !self.can_bind(sv, s) {
            return Ok(ControlFlow::Continue(()));
        }
        self.bindings[sv] = Some(s);
        let result = if self.can_bind(ov, o) {
            self.bindings[ov] = Some(o);
            let result = self.extend(depth + 1, visitor);
            self.bindings[ov] = None;
            result
        } else {
            Ok(ControlFlow::Continue(()))
        };
        self.bindings[sv] = None;
        result
    }

    fn value(&self, slot: Slot) -> Option<TermId> {
        match slot {
            Slot::Fixed(id) => Some(id),
            Slot::Variable(var) => self.bindings[var],
        }
    }

    /// Checks the NRA constraints of `var` against the current bindings.
    fn can_bind(&self, var: usize, value: TermId) -> bool {
        !self.excluded[var].contains(&value)
            && self.distinct[var]
                .iter()
                .all(|other| self.bindings[*other] != Some(value))
    }

    fn step(&mut self) -> Result<(), MatchError> {
        self.steps += 1;
        match self.max_steps {
            Some(max_steps) if self.steps > max_steps => Err(MatchError::BudgetExhausted {
                steps: max_steps,
            }),
            _ => Ok(()),
        }
    }

    fn emit(&mut self, visitor: &mut dyn FnMut(&[TermId]) -> ControlFlow<()>) -> ControlFlow<()> {
        self.solution.clear();
        self.solution.extend(self.bindings.iter().flatten());
        visitor(&self.solution)
    }
}
