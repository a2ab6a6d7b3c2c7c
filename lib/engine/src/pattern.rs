use crate::query::{ConjunctiveQuery, QueryForm};
use crate::QueryCompilationError;
use motif_model::{NamedNode, PatternError, TargetGraph, Term, Triple, Variable};
use spargebra::Query;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};
use std::sync::{Arc, OnceLock};

/// A small labelled graph with variables, i.e., a set of triples.
///
/// The triples are kept in canonical order (see [Triple]'s [Ord] implementation), so iterating
/// over a pattern, displaying it and compiling it are deterministic.
///
/// The compiled query of a pattern is cached. The cache starts out empty, is filled on first use
/// and is reset by every mutation of the triple set. Once filled, it can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Pattern {
    triples: BTreeSet<Triple>,
    /// The variables of the triples, sorted by name.
    variables: Vec<Variable>,
    /// The constants of the triples (including predicates), sorted.
    constants: Vec<NamedNode>,
    query: CompiledQueryCell,
}

impl Pattern {
    /// Creates a new [Pattern] from `triples`. Duplicate triples are ignored.
    pub fn new(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut pattern = Self::default();
        pattern.extend(triples);
        pattern
    }

    /// Parses a pattern from triples in textual form (see [Term::parse]).
    pub fn parse<'a>(
        triples: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Result<Self, PatternError> {
        let triples = triples
            .into_iter()
            .map(|(s, p, o)| Triple::parse(s, p, o))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(triples))
    }

    /// Adds a single triple. Returns false if the pattern already contained the triple.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let inserted = self.triples.insert(triple);
        if inserted {
            self.refresh();
        }
        inserted
    }

    /// Returns a new pattern holding the triples of both patterns.
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result += other;
        result
    }

    /// The number of distinct triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates over the triples in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Returns true if `triple` is one of the triples of this pattern (literally, without any
    /// renaming of variables).
    pub fn has_triple(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// The variables of the pattern, sorted by name.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The constants of the pattern (including predicates), sorted.
    pub fn constants(&self) -> &[NamedNode] {
        &self.constants
    }

    /// Returns the compiled query of this pattern, compiling it if necessary.
    pub fn compile(&self) -> Result<Arc<ConjunctiveQuery>, QueryCompilationError> {
        self.query.get_or_compile(|| {
            let triples = self.triples.iter().cloned().collect::<Vec<_>>();
            ConjunctiveQuery::compile(&triples, &self.variables, &self.constants)
        })
    }

    /// Returns true if the compiled query is currently cached.
    pub fn is_compiled(&self) -> bool {
        self.query.is_compiled()
    }

    /// Renders the NRA query of this pattern as SPARQL.
    pub fn to_sparql(&self, form: QueryForm) -> Result<Query, QueryCompilationError> {
        Ok(self.compile()?.to_sparql(form))
    }

    /// Uses the triples of this pattern as a target graph. Variables are treated like any other
    /// term.
    pub fn to_graph(&self) -> TargetGraph {
        TargetGraph::new(self.triples.iter().cloned())
    }

    /// Replaces every variable `?name` with the constant `<{base}name>`.
    ///
    /// The result is a ground version of the pattern that can be stored as RDF.
    pub fn skolemize(&self, base: &str) -> Vec<Triple> {
        let ground = |term: &Term| match term {
            Term::Constant(_) => term.clone(),
            Term::Variable(var) => Term::constant(format!("{base}{}", var.as_str())),
        };
        self.triples
            .iter()
            .map(|triple| Triple {
                subject: ground(&triple.subject),
                predicate: triple.predicate.clone(),
                object: ground(&triple.object),
            })
            .collect()
    }

    fn refresh(&mut self) {
        let mut variables = BTreeSet::new();
        let mut constants = BTreeSet::new();
        for term in self.triples.iter().flat_map(Triple::terms) {
            match term {
                Term::Constant(nn) => constants.insert(nn.into_string()),
                Term::Variable(var) => variables.insert(var.into_string()),
            };
        }
        self.variables = variables.into_iter().map(Variable::new_unchecked).collect();
        self.constants = constants.into_iter().map(NamedNode::new_unchecked).collect();
        self.query.invalidate();
    }
}

impl Extend<Triple> for Pattern {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        let before = self.triples.len();
        self.triples.extend(iter);
        if self.triples.len() != before {
            self.refresh();
        }
    }
}

impl FromIterator<Triple> for Pattern {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl AddAssign<&Pattern> for Pattern {
    fn add_assign(&mut self, rhs: &Pattern) {
        self.extend(rhs.triples.iter().cloned());
    }
}

impl Add<&Pattern> for &Pattern {
    type Output = Pattern;

    fn add(self, rhs: &Pattern) -> Pattern {
        self.union(rhs)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triples.hash(state);
    }
}

/// Triples in N-Triples-like form (`s p o .`), separated by a single space.
impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, triple) in self.triples.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            triple.fmt(f)?;
        }
        Ok(())
    }
}

/// Caches the compiled query of a [Pattern].
///
/// The cell is either uncompiled (empty) or compiled (holding the result of the compilation).
/// [CompiledQueryCell::invalidate] returns it to the uncompiled state.
#[derive(Clone, Debug, Default)]
struct CompiledQueryCell(OnceLock<Result<Arc<ConjunctiveQuery>, QueryCompilationError>>);

impl CompiledQueryCell {
    fn get_or_compile(
        &self,
        compile: impl FnOnce() -> Result<ConjunctiveQuery, QueryCompilationError>,
    ) -> Result<Arc<ConjunctiveQuery>, QueryCompilationError> {
        self.0.get_or_init(|| compile().map(Arc::new)).clone()
    }

    fn is_compiled(&self) -> bool {
        self.0.get().is_some()
    }

    fn invalidate(&mut self) {
        self.0 = OnceLock::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(triples: &[(&str, &str, &str)]) -> Pattern {
        Pattern::parse(triples.iter().copied()).unwrap()
    }

    #[test]
    fn display_is_canonical() {
        let p = pattern(&[("?v1", "<c>", "<d>"), ("<a>", "<b>", "?v2")]);
        assert_eq!(p.to_string(), "<a> <b> ?v2 . ?v1 <c> <d> .");
    }

    #[test]
    fn variables_and_constants() {
        let p = pattern(&[("?y", "<p>", "?x"), ("?x", "<q>", "<c>")]);
        let variables = p.variables().iter().map(Variable::as_str).collect::<Vec<_>>();
        let constants = p.constants().iter().map(NamedNode::as_str).collect::<Vec<_>>();
        assert_eq!(variables, ["x", "y"]);
        assert_eq!(constants, ["c", "p", "q"]);
    }

    #[test]
    fn mutation_invalidates_the_compiled_query() {
        let mut p = pattern(&[("<a>", "<b>", "?v1")]);
        assert!(!p.is_compiled());
        assert_eq!(p.compile().unwrap().atoms().len(), 1);
        assert!(p.is_compiled());

        assert!(!p.insert(Triple::parse("<a>", "<b>", "?v1").unwrap()));
        assert!(p.is_compiled());

        p += &pattern(&[("?v1", "<c>", "<d>")]);
        assert!(!p.is_compiled());
        assert_eq!(p.compile().unwrap().atoms().len(), 2);
    }

    #[test]
    fn union_does_not_modify_operands() {
        let a = pattern(&[("<a>", "<b>", "?v1")]);
        let b = pattern(&[("?v1", "<c>", "<d>"), ("<a>", "<b>", "?v1")]);
        let union = &a + &b;
        assert_eq!(union.len(), 2);
        assert_eq!(a.len(), 1);
        assert_eq!(union, b);
    }

    #[test]
    fn skolemize_replaces_variables() {
        let p = pattern(&[("<a>", "<b>", "?v1")]);
        let ground = p.skolemize("http://example.com/var/");
        assert_eq!(
            ground,
            vec![Triple::parse("<a>", "<b>", "<http://example.com/var/v1>").unwrap()]
        );
        assert!(ground.iter().all(Triple::is_ground));
    }
}
