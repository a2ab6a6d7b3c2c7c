use crate::eval::{Matcher, QueryEvaluator};
use crate::{MatchError, Pattern};
use motif_model::vocab::{atomic, ligand};
use motif_model::{Triple, Variable};

/// Checks what a pattern specifies about its subject.
///
/// A rule holds for a pattern if its query pattern matches the pattern (used as a graph) such that
/// every one of the `grounded` variables is bound to a constant of the pattern.
#[derive(Clone, Debug)]
pub struct ContentRule {
    name: String,
    query: Pattern,
    grounded: Vec<Variable>,
}

impl ContentRule {
    /// Creates a new [ContentRule].
    pub fn new(name: impl Into<String>, query: Pattern, grounded: Vec<Variable>) -> Self {
        Self {
            name: name.into(),
            query,
            grounded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &Pattern {
        &self.query
    }

    /// Returns true if the rule holds for `pattern`.
    pub fn is_satisfied_by<E: QueryEvaluator>(
        &self,
        matcher: &Matcher<E>,
        pattern: &Pattern,
    ) -> Result<bool, MatchError> {
        matcher.find(&self.query, &pattern.to_graph(), |m| {
            self.grounded
                .iter()
                .all(|var| m.get(var.as_ref()).is_some_and(|term| term.is_constant()))
        })
    }

    /// The pattern assigns a ligand class to some ligand.
    pub fn specifies_ligand() -> Self {
        Self::new("specifies_ligand", ligand_query(), vec![var("x2")])
    }

    /// The pattern assigns an element to the binding atom of some ligand bond.
    pub fn specifies_binding_atom() -> Self {
        Self::new("specifies_binding_atom", binding_atom_query(), vec![var("y3")])
    }

    /// The pattern specifies both the class of a ligand and the element of the atom binding that
    /// same ligand, which is redundant.
    pub fn specifies_both_redundant() -> Self {
        let mut query = ligand_query();
        query += &binding_atom_query();
        query.insert(Triple::new(
            var("x1"),
            ligand::BOND_TO_LIGAND.into_owned(),
            var("y1"),
        ));
        Self::new(
            "specifies_both_redundant",
            query,
            vec![var("x2"), var("y3")],
        )
    }
}

/// The content rules used to curate mined TMC patterns.
#[derive(Clone, Debug)]
pub struct ContentRules {
    pub ligand: ContentRule,
    pub binding_atom: ContentRule,
    pub redundant: ContentRule,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            ligand: ContentRule::specifies_ligand(),
            binding_atom: ContentRule::specifies_binding_atom(),
            redundant: ContentRule::specifies_both_redundant(),
        }
    }
}

/// The outcome of [ContentRules] for a single pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContentReport {
    pub specifies_ligand: bool,
    pub specifies_binding_atom: bool,
    pub specifies_both_redundant: bool,
}

impl ContentReport {
    /// A pattern is a curation candidate if it specifies a binding atom without redundancy.
    pub fn is_candidate(&self) -> bool {
        self.specifies_binding_atom && !self.specifies_both_redundant
    }
}

impl ContentRules {
    /// Applies all rules to `pattern`.
    pub fn check<E: QueryEvaluator>(
        &self,
        matcher: &Matcher<E>,
        pattern: &Pattern,
    ) -> Result<ContentReport, MatchError> {
        Ok(ContentReport {
            specifies_ligand: self.ligand.is_satisfied_by(matcher, pattern)?,
            specifies_binding_atom: self.binding_atom.is_satisfied_by(matcher, pattern)?,
            specifies_both_redundant: self.redundant.is_satisfied_by(matcher, pattern)?,
        })
    }
}

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn ligand_query() -> Pattern {
    Pattern::new([Triple::new(var("x1"), ligand::IS_LIGAND.into_owned(), var("x2"))])
}

fn binding_atom_query() -> Pattern {
    Pattern::new([
        Triple::new(var("y1"), ligand::HAS_BINDING_ATOM.into_owned(), var("y2")),
        Triple::new(var("y2"), atomic::IS_ATOM.into_owned(), var("y3")),
    ])
}
