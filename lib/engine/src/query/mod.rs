//! The conjunctive-query representation of a pattern.
//!
//! A [ConjunctiveQuery] consists of one [QueryAtom] per triple of the pattern and a set of
//! [Constraint]s that encode the No Repeated Anything (NRA) semantics:
//!
//! - every pair of distinct variables must be bound to distinct terms, and
//! - no variable may be bound to a constant that occurs in the pattern.
//!
//! Any [QueryEvaluator](crate::QueryEvaluator) must honour these constraints exactly.

mod planner;
mod sparql;

pub use sparql::QueryForm;

use crate::QueryCompilationError;
use itertools::Itertools;
use motif_model::{NamedNode, Term, Triple, Variable};
use rustc_hash::FxHashMap;

/// The maximum number of variables of a single query.
pub const MAX_VARIABLES: usize = 64;

/// A subject or object position of a [QueryAtom].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryTerm {
    Constant(NamedNode),
    /// Index into [ConjunctiveQuery::variables].
    Variable(usize),
}

impl QueryTerm {
    pub fn as_variable(&self) -> Option<usize> {
        match self {
            Self::Constant(_) => None,
            Self::Variable(index) => Some(*index),
        }
    }
}

/// A single triple pattern of a query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryAtom {
    pub subject: QueryTerm,
    pub predicate: NamedNode,
    pub object: QueryTerm,
}

impl QueryAtom {
    /// Iterates over the distinct variables of this atom.
    pub fn variables(&self) -> impl Iterator<Item = usize> {
        let subject = self.subject.as_variable();
        let object = self.object.as_variable().filter(|o| Some(*o) != subject);
        subject.into_iter().chain(object)
    }
}

/// A filter that every solution of a [ConjunctiveQuery] must satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// The two variables must be bound to different terms.
    DistinctVariables(usize, usize),
    /// The variable must not be bound to the constant.
    ExcludeConstant(usize, NamedNode),
}

/// A pattern compiled into atoms, NRA constraints and an evaluation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConjunctiveQuery {
    variables: Vec<Variable>,
    constants: Vec<NamedNode>,
    atoms: Vec<QueryAtom>,
    constraints: Vec<Constraint>,
    plan: Vec<usize>,
}

impl ConjunctiveQuery {
    /// Compiles a query from the triples of a pattern.
    ///
    /// `variables` and `constants` must contain every variable (resp. constant) occurring in
    /// `triples` exactly once. The order of the variables defines the variable indices.
    pub fn compile(
        triples: &[Triple],
        variables: &[Variable],
        constants: &[NamedNode],
    ) -> Result<Self, QueryCompilationError> {
        if variables.len() > MAX_VARIABLES {
            return Err(QueryCompilationError::TooManyVariables {
                found: variables.len(),
                max: MAX_VARIABLES,
            });
        }

        let indices = variables
            .iter()
            .enumerate()
            .map(|(index, var)| (var, index))
            .collect::<FxHashMap<_, _>>();
        let to_query_term = |term: &Term| match term {
            Term::Constant(nn) => Ok(QueryTerm::Constant(nn.clone())),
            Term::Variable(var) => indices
                .get(var)
                .copied()
                .map(QueryTerm::Variable)
                .ok_or_else(|| QueryCompilationError::UndeclaredVariable(var.to_string())),
        };
        let atoms = triples
            .iter()
            .map(|triple| {
                Ok(QueryAtom {
                    subject: to_query_term(&triple.subject)?,
                    predicate: triple.predicate.clone(),
                    object: to_query_term(&triple.object)?,
                })
            })
            .collect::<Result<Vec<_>, QueryCompilationError>>()?;

        let distinct = (0..variables.len())
            .tuple_combinations()
            .map(|(a, b)| Constraint::DistinctVariables(a, b));
        let excluded = (0..variables.len())
            .cartesian_product(constants.iter())
            .map(|(var, constant)| Constraint::ExcludeConstant(var, constant.clone()));
        let constraints = distinct.chain(excluded).collect();

        let plan = planner::plan(&atoms);
        Ok(Self {
            variables: variables.to_vec(),
            constants: constants.to_vec(),
            atoms,
            constraints,
            plan,
        })
    }

    /// The variables of the query, sorted by name.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The constants of the query, sorted.
    pub fn constants(&self) -> &[NamedNode] {
        &self.constants
    }

    /// The atoms of the query in the canonical order of the pattern's triples.
    pub fn atoms(&self) -> &[QueryAtom] {
        &self.atoms
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The atoms in the order in which an evaluator should join them.
    pub fn planned_atoms(&self) -> impl Iterator<Item = &QueryAtom> {
        self.plan.iter().map(|index| &self.atoms[*index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(triples: &[(&str, &str, &str)]) -> ConjunctiveQuery {
        let triples = triples
            .iter()
            .map(|(s, p, o)| Triple::parse(s, p, o).unwrap())
            .collect::<Vec<_>>();
        let mut variables = triples
            .iter()
            .flat_map(Triple::terms)
            .filter_map(|t| match t {
                Term::Variable(v) => Some(v),
                Term::Constant(_) => None,
            })
            .collect::<Vec<_>>();
        variables.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        variables.dedup();
        let mut constants = triples
            .iter()
            .flat_map(|t| [t.subject.clone(), t.object.clone()])
            .filter_map(|t| match t {
                Term::Constant(c) => Some(c),
                Term::Variable(_) => None,
            })
            .collect::<Vec<_>>();
        constants.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        constants.dedup();
        ConjunctiveQuery::compile(&triples, &variables, &constants).unwrap()
    }

    #[test]
    fn constraints_cover_all_pairs_and_constants() {
        let query = compile(&[("?x", "<p>", "?y"), ("?y", "<q>", "<c>")]);
        assert_eq!(
            query.constraints(),
            &[
                Constraint::DistinctVariables(0, 1),
                Constraint::ExcludeConstant(0, NamedNode::new_unchecked("c")),
                Constraint::ExcludeConstant(1, NamedNode::new_unchecked("c")),
            ]
        );
    }

    #[test]
    fn ground_atoms_are_planned_first() {
        let query = compile(&[("?x", "<p>", "?y"), ("<a>", "<q>", "<b>"), ("?y", "<q>", "<c>")]);
        let planned = query.planned_atoms().cloned().collect::<Vec<_>>();
        assert_eq!(planned[0], query.atoms()[1].clone());
        assert_eq!(planned[1].object, QueryTerm::Constant(NamedNode::new_unchecked("c")));
    }

    #[test]
    fn too_many_variables() {
        let triples = (0..=MAX_VARIABLES)
            .map(|i| Triple::parse("<a>", "<p>", &format!("?v{i}")).unwrap())
            .collect::<Vec<_>>();
        let variables = triples
            .iter()
            .filter_map(|t| t.object.as_variable().map(|v| v.into_owned()))
            .collect::<Vec<_>>();
        let result = ConjunctiveQuery::compile(&triples, &variables, &[]);
        assert_eq!(
            result,
            Err(QueryCompilationError::TooManyVariables {
                found: MAX_VARIABLES + 1,
                max: MAX_VARIABLES
            })
        );
    }
}
