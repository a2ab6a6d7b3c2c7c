use crate::rules::{CompressionRules, PredicateRule};
use motif_engine::Pattern;
use motif_model::Term;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// The label of a variable node that received neither a class nor a default label.
pub const UNTYPED_LABEL: &str = "untyped";

/// A pattern re-expressed as a labelled directed graph.
///
/// Nodes are labelled with semantic classes and edges with predicate IRIs. Parallel edges are
/// kept. Compressed graphs are only used for similarity computations, never for matching.
#[derive(Clone, Debug, Default)]
pub struct CompressedPatternGraph {
    graph: DiGraph<String, String>,
}

impl CompressedPatternGraph {
    /// Compresses `pattern` according to `rules`.
    ///
    /// Class assignments are absorbed into the label of their subject. Any other triple becomes an
    /// edge. A node label is, by decreasing priority, the class assigned to the node, the last
    /// default label proposed by an edge (in canonical triple order), the IRI of a constant, or
    /// [UNTYPED_LABEL]. Nodes without edges are dropped.
    pub fn compress(pattern: &Pattern, rules: &CompressionRules) -> Self {
        let mut classes = FxHashMap::<&Term, &str>::default();
        let mut defaults = FxHashMap::<&Term, &str>::default();
        let mut edges = Vec::new();

        for triple in pattern {
            match rules.rule(triple.predicate.as_str()) {
                Some(PredicateRule::Classify) => {
                    if let Term::Constant(class) = &triple.object {
                        classes.insert(&triple.subject, class.as_str());
                    }
                }
                Some(PredicateRule::Relate {
                    subject_default,
                    object_default,
                }) => {
                    if let Some(label) = subject_default {
                        defaults.insert(&triple.subject, label);
                    }
                    if let Some(label) = object_default {
                        defaults.insert(&triple.object, label);
                    }
                    edges.push(triple);
                }
                None => edges.push(triple),
            }
        }

        let mut graph = DiGraph::new();
        let mut nodes = FxHashMap::<&Term, NodeIndex>::default();
        let mut node = |graph: &mut DiGraph<String, String>, term| {
            *nodes.entry(term).or_insert_with(|| {
                let label = classes
                    .get(term)
                    .or_else(|| defaults.get(term))
                    .copied()
                    .or_else(|| term.as_constant().map(|iri| iri.as_str()))
                    .unwrap_or(UNTYPED_LABEL);
                graph.add_node(label.to_owned())
            })
        };
        for triple in edges {
            let subject = node(&mut graph, &triple.subject);
            let object = node(&mut graph, &triple.object);
            graph.add_edge(subject, object, triple.predicate.as_str().to_owned());
        }
        Self { graph }
    }

    pub fn graph(&self) -> &DiGraph<String, String> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_label(&self, node: NodeIndex) -> Option<&str> {
        self.graph.node_weight(node).map(String::as_str)
    }

    /// The node labels, in node order.
    pub fn node_labels(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// The edge labels, in edge order.
    pub fn edge_labels(&self) -> impl Iterator<Item = &str> {
        self.graph.edge_weights().map(String::as_str)
    }

    /// Iterates over `(source, target, label)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &str)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight().as_str()))
    }
}

impl From<DiGraph<String, String>> for CompressedPatternGraph {
    fn from(graph: DiGraph<String, String>) -> Self {
        Self { graph }
    }
}

/// One line per node (`n0 label`) followed by one line per edge (`n0 -label-> n1`).
impl Display for CompressedPatternGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for node in self.graph.node_indices() {
            writeln!(f, "n{} {}", node.index(), self.graph[node])?;
        }
        for (source, target, label) in self.edges() {
            writeln!(f, "n{} -{label}-> n{}", source.index(), target.index())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    const IS_ATOM: &str = "<resource://integreat/p5/atomic/atom/isAtom>";
    const BINDING_ATOM: &str = "<resource://integreat/p5/ligand/bond/hasBindingAtom>";
    const IS_LIGAND: &str = "<resource://integreat/p5/ligand/ligand/isLigand>";
    const BOND_TO_LIGAND: &str = "<resource://integreat/p5/ligand/structure/bLl>";

    fn compress(triples: &[(&str, &str, &str)]) -> CompressedPatternGraph {
        let pattern = Pattern::parse(triples.iter().copied()).unwrap();
        CompressedPatternGraph::compress(&pattern, &CompressionRules::tmc())
    }

    #[test]
    fn classes_win_over_defaults() {
        let graph = compress(&[
            ("?l", BOND_TO_LIGAND, "?b"),
            ("?b", BINDING_ATOM, "?a"),
            ("?a", IS_ATOM, "<resource://integreat/p5/atomic/element/N>"),
            ("?l", IS_LIGAND, "<resource://integreat/p5/ligand/reference/L7>"),
        ]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_snapshot!(graph.to_string().trim_end(), @r"
n0 resource://integreat/p5/ligand/bond/LigandBond
n1 resource://integreat/p5/atomic/element/N
n2 resource://integreat/p5/ligand/reference/L7
n0 -resource://integreat/p5/ligand/bond/hasBindingAtom-> n1
n2 -resource://integreat/p5/ligand/structure/bLl-> n0
");
    }

    #[test]
    fn defaults_apply_to_unclassified_nodes() {
        let graph = compress(&[("?b", BINDING_ATOM, "?a"), ("?a", IS_ATOM, "?e")]);
        let labels = graph.node_labels().collect::<Vec<_>>();
        assert_eq!(
            labels,
            [
                "resource://integreat/p5/ligand/bond/LigandBond",
                "resource://integreat/p5/atomic/atom/Atom"
            ]
        );
    }

    #[test]
    fn unknown_predicates_keep_plain_labels() {
        let graph = compress(&[("?x", "<http://example.com/p>", "<http://example.com/o>")]);
        let labels = graph.node_labels().collect::<Vec<_>>();
        assert_eq!(labels, [UNTYPED_LABEL, "http://example.com/o"]);
        assert_eq!(graph.edge_labels().collect::<Vec<_>>(), ["http://example.com/p"]);
    }

    #[test]
    fn classification_only_patterns_are_empty() {
        let graph = compress(&[("?a", IS_ATOM, "<resource://integreat/p5/atomic/element/C>")]);
        assert!(graph.is_empty());
    }
}
