use crate::query::{ConjunctiveQuery, Constraint, QueryAtom, QueryTerm};
use motif_model::Variable;
use spargebra::algebra::{Expression, GraphPattern};
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;

/// The shape of a rendered SPARQL query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueryForm {
    /// Matches the default graph.
    #[default]
    Plain,
    /// Matches every named graph and additionally projects the graph name.
    NamedGraphs,
}

impl ConjunctiveQuery {
    /// Renders the query as a SPARQL `SELECT` query.
    ///
    /// The NRA constraints become a single `FILTER` of pairwise inequalities. The graph name of
    /// [QueryForm::NamedGraphs] is bound to `?graph` (or a variant of it that does not clash with
    /// a variable of the query).
    pub fn to_sparql(&self, form: QueryForm) -> Query {
        let patterns = self.atoms().iter().map(|atom| self.triple_pattern(atom));
        let mut pattern = GraphPattern::Bgp {
            patterns: patterns.collect(),
        };
        let mut projection = self.variables().to_vec();

        if form == QueryForm::NamedGraphs {
            let graph = self.fresh_variable("graph");
            pattern = GraphPattern::Graph {
                name: NamedNodePattern::Variable(graph.clone()),
                inner: Box::new(pattern),
            };
            projection.push(graph);
        }

        let filter = self
            .constraints()
            .iter()
            .map(|constraint| self.filter_expression(constraint))
            .reduce(|lhs, rhs| Expression::And(Box::new(lhs), Box::new(rhs)));
        if let Some(expr) = filter {
            pattern = GraphPattern::Filter {
                expr,
                inner: Box::new(pattern),
            };
        }

        Query::Select {
            dataset: None,
            pattern: GraphPattern::Project {
                inner: Box::new(pattern),
                variables: projection,
            },
            base_iri: None,
        }
    }

    fn triple_pattern(&self, atom: &QueryAtom) -> TriplePattern {
        TriplePattern {
            subject: self.term_pattern(&atom.subject),
            predicate: NamedNodePattern::NamedNode(atom.predicate.clone()),
            object: self.term_pattern(&atom.object),
        }
    }

    fn term_pattern(&self, term: &QueryTerm) -> TermPattern {
        match term {
            QueryTerm::Constant(nn) => TermPattern::NamedNode(nn.clone()),
            QueryTerm::Variable(var) => TermPattern::Variable(self.variables()[*var].clone()),
        }
    }

    fn filter_expression(&self, constraint: &Constraint) -> Expression {
        let (lhs, rhs) = match constraint {
            Constraint::DistinctVariables(a, b) => (
                Expression::Variable(self.variables()[*a].clone()),
                Expression::Variable(self.variables()[*b].clone()),
            ),
            Constraint::ExcludeConstant(var, constant) => (
                Expression::Variable(self.variables()[*var].clone()),
                Expression::NamedNode(constant.clone()),
            ),
        };
        Expression::Not(Box::new(Expression::Equal(Box::new(lhs), Box::new(rhs))))
    }

    fn fresh_variable(&self, base: &str) -> Variable {
        let mut name = base.to_owned();
        while self.variables().iter().any(|var| var.as_str() == name) {
            name.push('_');
        }
        Variable::new_unchecked(name)
    }
}
