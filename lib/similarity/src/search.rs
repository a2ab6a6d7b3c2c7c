//! Label-weighted maximum common structure of two compressed pattern graphs.
//!
//! The search enumerates injective, label-preserving partial maps from the nodes of one graph to
//! the nodes of the other with a branch and bound. A mapped node contributes the weight of its
//! label. An edge contributes the weight of its label if both endpoints are mapped and the image
//! graph has an edge with the same label between the images (parallel edges are matched as
//! multisets). With `M` the best matched weight and `W(g)` the sum of all node and edge weights of
//! `g`, the similarity is `2M / (W(a) + W(b))`.

use crate::{CompressedPatternGraph, LabelWeights};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use std::cmp::{Ordering, Reverse};
use std::ops::ControlFlow;
use tracing::debug;

/// Limits the number of search steps of a single similarity computation.
///
/// When the budget is exhausted, the best alignment found so far is used. Its similarity is a
/// lower bound of the exact one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchBudget {
    /// The maximum number of steps, or `None` for an exhaustive search.
    pub max_steps: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
        }
    }
}

/// The result of aligning two compressed graphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    /// The similarity in `[0, 1]`.
    pub similarity: f64,
    /// The weight of the matched structure, counted once.
    pub matched_weight: f64,
    /// The summed weight of both graphs.
    pub total_weight: f64,
    /// Whether the search ran to completion.
    pub complete: bool,
}

impl Alignment {
    fn empty(total_weight: f64) -> Self {
        Self {
            similarity: 0.0,
            matched_weight: 0.0,
            total_weight,
            complete: true,
        }
    }
}

/// Computes the similarity of `a` and `b` in `[0, 1]`.
///
/// The result does not depend on the order of the operands. It is `1` if the graphs are equal and
/// `0` if either of them has no node or if both have a total weight of zero.
pub fn similarity(
    a: &CompressedPatternGraph,
    b: &CompressedPatternGraph,
    weights: &LabelWeights,
    budget: &SearchBudget,
) -> f64 {
    align(a, b, weights, budget).similarity
}

/// `1 - similarity`, clamped to `[0, 1]`.
pub fn distance(
    a: &CompressedPatternGraph,
    b: &CompressedPatternGraph,
    weights: &LabelWeights,
    budget: &SearchBudget,
) -> f64 {
    (1.0 - similarity(a, b, weights, budget)).clamp(0.0, 1.0)
}

/// Aligns `a` and `b` and reports the matched weight along with the similarity.
pub fn align(
    a: &CompressedPatternGraph,
    b: &CompressedPatternGraph,
    weights: &LabelWeights,
    budget: &SearchBudget,
) -> Alignment {
    let total_weight = total_weight(a.graph(), weights) + total_weight(b.graph(), weights);
    if a.is_empty() || b.is_empty() || total_weight <= 0.0 {
        return Alignment::empty(total_weight);
    }

    let (matched_weight, complete) = match canonical_key(a).cmp(&canonical_key(b)) {
        Ordering::Less => Search::new(a.graph(), b.graph(), weights, budget).run(),
        Ordering::Greater => Search::new(b.graph(), a.graph(), weights, budget).run(),
        Ordering::Equal => {
            let forward = Search::new(a.graph(), b.graph(), weights, budget).run();
            let backward = Search::new(b.graph(), a.graph(), weights, budget).run();
            (forward.0.max(backward.0), forward.1 && backward.1)
        }
    };

    Alignment {
        similarity: (2.0 * matched_weight / total_weight).clamp(0.0, 1.0),
        matched_weight,
        total_weight,
        complete,
    }
}

/// The weights of all nodes in node order, then of all edges in edge order.
fn total_weight(graph: &DiGraph<String, String>, weights: &LabelWeights) -> f64 {
    graph
        .node_weights()
        .chain(graph.edge_weights())
        .map(|label| weights.weight(label))
        .sum()
}

type CanonicalKey<'a> = (usize, usize, Vec<&'a str>, Vec<(&'a str, &'a str, &'a str)>);

/// An order on graphs that only depends on their labelled structure, used to orient the search.
fn canonical_key(graph: &CompressedPatternGraph) -> CanonicalKey<'_> {
    let mut nodes = graph.node_labels().collect::<Vec<_>>();
    nodes.sort_unstable();
    let mut edges = graph
        .edges()
        .filter_map(|(source, target, label)| {
            Some((graph.node_label(source)?, label, graph.node_label(target)?))
        })
        .collect::<Vec<_>>();
    edges.sort_unstable();
    (graph.node_count(), graph.edge_count(), nodes, edges)
}

/// Edge labels between an ordered pair of nodes, sorted.
type PairLabels<'a> = FxHashMap<(NodeIndex, NodeIndex), Vec<&'a str>>;

fn pair_labels(graph: &DiGraph<String, String>) -> PairLabels<'_> {
    let mut pairs = PairLabels::default();
    for edge in graph.edge_references() {
        pairs
            .entry((edge.source(), edge.target()))
            .or_default()
            .push(edge.weight().as_str());
    }
    for labels in pairs.values_mut() {
        labels.sort_unstable();
    }
    pairs
}

struct Search<'a> {
    query: &'a DiGraph<String, String>,
    target: &'a DiGraph<String, String>,
    weights: &'a LabelWeights,
    query_pairs: PairLabels<'a>,
    target_pairs: PairLabels<'a>,
    /// Query nodes in search order.
    order: Vec<NodeIndex>,
    /// For every search position, the earlier query neighbours of the node at that position.
    back_neighbours: Vec<Vec<NodeIndex>>,
    /// For every search position, the target nodes carrying the same label.
    candidates: Vec<Vec<NodeIndex>>,
    /// For every search position, the weight that can still be gained from there on.
    remaining: Vec<f64>,
    mapping: Vec<Option<NodeIndex>>,
    used: Vec<bool>,
    best_weight: f64,
    best_mapping: Vec<Option<NodeIndex>>,
    steps: u64,
    max_steps: Option<u64>,
}

impl<'a> Search<'a> {
    fn new(
        query: &'a DiGraph<String, String>,
        target: &'a DiGraph<String, String>,
        weights: &'a LabelWeights,
        budget: &SearchBudget,
    ) -> Self {
        let mut order = query.node_indices().collect::<Vec<_>>();
        order.sort_by_key(|node| Reverse(query.neighbors_undirected(*node).count()));
        let mut position = vec![0; query.node_count()];
        for (index, node) in order.iter().enumerate() {
            position[node.index()] = index;
        }

        let mut target_by_label = FxHashMap::<&str, Vec<NodeIndex>>::default();
        for node in target.node_indices() {
            target_by_label.entry(target[node].as_str()).or_default().push(node);
        }
        let candidates = order
            .iter()
            .map(|node| {
                target_by_label
                    .get(query[*node].as_str())
                    .cloned()
                    .unwrap_or_default()
            })
            .collect::<Vec<Vec<_>>>();

        let back_neighbours = order
            .iter()
            .map(|node| {
                let mut neighbours = query
                    .neighbors_undirected(*node)
                    .filter(|other| position[other.index()] < position[node.index()])
                    .collect::<Vec<_>>();
                neighbours.sort_unstable();
                neighbours.dedup();
                neighbours
            })
            .collect();

        let mut gains = vec![0.0; order.len() + 1];
        for (index, node) in order.iter().enumerate() {
            if !candidates[index].is_empty() {
                gains[index] += weights.weight(&query[*node]);
            }
        }
        for edge in query.edge_references() {
            let decided = position[edge.source().index()].max(position[edge.target().index()]);
            gains[decided] += weights.weight(edge.weight());
        }
        let mut remaining = gains;
        for index in (0..order.len()).rev() {
            remaining[index] += remaining[index + 1];
        }

        Self {
            query,
            target,
            weights,
            query_pairs: pair_labels(query),
            target_pairs: pair_labels(target),
            back_neighbours,
            candidates,
            remaining,
            mapping: vec![None; query.node_count()],
            used: vec![false; target.node_count()],
            best_weight: 0.0,
            best_mapping: vec![None; query.node_count()],
            order,
            steps: 0,
            max_steps: budget.max_steps,
        }
    }

    /// Returns the best matched weight and whether the search was exhaustive.
    fn run(mut self) -> (f64, bool) {
        let complete = self.extend(0, 0.0).is_continue();
        if !complete {
            debug!(
                steps = self.steps,
                "Similarity search budget exhausted, using the best alignment found"
            );
        }
        (self.matched_weight(&self.best_mapping), complete)
    }

    fn extend(&mut self, depth: usize, current: f64) -> ControlFlow<()> {
        if current + self.remaining[depth] <= self.best_weight {
            return ControlFlow::Continue(());
        }
        let Some(&node) = self.order.get(depth) else {
            self.best_weight = current;
            self.best_mapping.clone_from(&self.mapping);
            return ControlFlow::Continue(());
        };

        let node_weight = self.weights.weight(&self.query[node]);
        for index in 0..self.candidates[depth].len() {
            let image = self.candidates[depth][index];
            if self.used[image.index()] {
                continue;
            }
            self.step()?;
            self.mapping[node.index()] = Some(image);
            self.used[image.index()] = true;
            let gain = node_weight + self.edge_gain(depth, node, image);
            let flow = self.extend(depth + 1, current + gain);
            self.mapping[node.index()] = None;
            self.used[image.index()] = false;
            flow?;
        }

        self.step()?;
        self.extend(depth + 1, current)
    }

    /// The weight of the edges between `node` and earlier mapped nodes that are preserved by
    /// mapping `node` to `image`.
    fn edge_gain(&self, depth: usize, node: NodeIndex, image: NodeIndex) -> f64 {
        let mut gain = self.common_weight((node, node), (image, image));
        for &neighbour in &self.back_neighbours[depth] {
            if let Some(neighbour_image) = self.mapping[neighbour.index()] {
                gain += self.common_weight((node, neighbour), (image, neighbour_image));
                gain += self.common_weight((neighbour, node), (neighbour_image, image));
            }
        }
        gain
    }

    /// The weight of the multiset intersection of the labels of two node pairs.
    fn common_weight(&self, query: (NodeIndex, NodeIndex), target: (NodeIndex, NodeIndex)) -> f64 {
        let (Some(query), Some(target)) = (self.query_pairs.get(&query), self.target_pairs.get(&target))
        else {
            return 0.0;
        };
        let (mut i, mut j, mut weight) = (0, 0, 0.0);
        while let (Some(lhs), Some(rhs)) = (query.get(i), target.get(j)) {
            match lhs.cmp(rhs) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    weight += self.weights.weight(lhs);
                    i += 1;
                    j += 1;
                }
            }
        }
        weight
    }

    /// Recomputes the matched weight of `mapping` in node order, then edge order.
    fn matched_weight(&self, mapping: &[Option<NodeIndex>]) -> f64 {
        let mut weight = 0.0;
        for node in self.query.node_indices() {
            if mapping[node.index()].is_some() {
                weight += self.weights.weight(&self.query[node]);
            }
        }

        let mut consumed = FxHashMap::<(NodeIndex, NodeIndex, &str), usize>::default();
        for edge in self.query.edge_references() {
            let (Some(source), Some(target)) =
                (mapping[edge.source().index()], mapping[edge.target().index()])
            else {
                continue;
            };
            let label = edge.weight().as_str();
            let available = self
                .target_pairs
                .get(&(source, target))
                .map_or(0, |labels| labels.iter().filter(|other| **other == label).count());
            let used = consumed.entry((source, target, label)).or_default();
            if *used < available {
                *used += 1;
                weight += self.weights.weight(label);
            }
        }
        weight
    }

    fn step(&mut self) -> ControlFlow<()> {
        self.steps += 1;
        match self.max_steps {
            Some(max_steps) if self.steps > max_steps => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(usize, usize, &str)]) -> CompressedPatternGraph {
        let mut graph = DiGraph::new();
        let nodes = nodes
            .iter()
            .map(|label| graph.add_node((*label).to_owned()))
            .collect::<Vec<_>>();
        for (source, target, label) in edges {
            graph.add_edge(nodes[*source], nodes[*target], (*label).to_owned());
        }
        graph.into()
    }

    fn unit() -> LabelWeights {
        LabelWeights::default()
    }

    #[test]
    fn identical_graphs_are_fully_similar() {
        let g = graph(&["A", "B", "B"], &[(0, 1, "p"), (0, 2, "p"), (1, 2, "q")]);
        let alignment = align(&g, &g.clone(), &unit(), &SearchBudget::unlimited());
        assert_eq!(alignment.similarity, 1.0);
        assert_eq!(alignment.matched_weight, 6.0);
        assert!(alignment.complete);
    }

    #[test]
    fn node_order_does_not_affect_self_similarity() {
        let weights = LabelWeights::fixed(
            0.3,
            [("A", 0.1), ("B", 0.7), ("C", 0.2), ("p", 0.6), ("q", 0.11)],
        )
        .unwrap();
        let g = graph(
            &["A", "B", "C", "B"],
            &[(0, 1, "p"), (0, 3, "p"), (1, 2, "q"), (3, 2, "r"), (2, 0, "p")],
        );
        // The same graph with nodes and edges inserted in a different order.
        let permuted = graph(
            &["C", "B", "A", "B"],
            &[(0, 2, "p"), (3, 0, "r"), (2, 1, "p"), (1, 0, "q"), (2, 3, "p")],
        );

        for (a, b) in [(&g, &permuted), (&permuted, &g)] {
            let alignment = align(a, b, &weights, &SearchBudget::unlimited());
            assert_eq!(alignment.similarity, 1.0);
            assert!(alignment.complete);
            assert_eq!(distance(a, b, &weights, &SearchBudget::unlimited()), 0.0);
        }
    }

    #[test]
    fn partial_overlap() {
        // A -p-> B and A -p-> C share A, one edge label and nothing else.
        let a = graph(&["A", "B"], &[(0, 1, "p")]);
        let b = graph(&["A", "C"], &[(0, 1, "p")]);
        let alignment = align(&a, &b, &unit(), &SearchBudget::unlimited());
        assert_eq!(alignment.matched_weight, 1.0);
        assert_eq!(alignment.total_weight, 6.0);
        assert!((alignment.similarity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn edges_need_matching_labels_and_directions() {
        let a = graph(&["A", "B"], &[(0, 1, "p")]);
        let reversed = graph(&["A", "B"], &[(1, 0, "p")]);
        let relabelled = graph(&["A", "B"], &[(0, 1, "q")]);
        let budget = SearchBudget::unlimited();
        assert_eq!(align(&a, &reversed, &unit(), &budget).matched_weight, 2.0);
        assert_eq!(align(&a, &relabelled, &unit(), &budget).matched_weight, 2.0);
    }

    #[test]
    fn parallel_edges_match_as_multisets() {
        let double = graph(&["A", "B"], &[(0, 1, "p"), (0, 1, "p")]);
        let single = graph(&["A", "B"], &[(0, 1, "p")]);
        let alignment = align(&double, &single, &unit(), &SearchBudget::unlimited());
        assert_eq!(alignment.matched_weight, 3.0);
        assert!((alignment.similarity - 6.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn weights_change_the_score() {
        let a = graph(&["A", "B"], &[(0, 1, "p")]);
        let b = graph(&["A", "B"], &[(0, 1, "q")]);
        let budget = SearchBudget::unlimited();
        assert!((similarity(&a, &b, &unit(), &budget) - 2.0 / 3.0).abs() < 1e-12);

        let weights = LabelWeights::fixed(1.0, [("p", 0.0), ("q", 0.0)]).unwrap();
        assert_eq!(similarity(&a, &b, &weights, &budget), 1.0);
    }

    #[test]
    fn empty_graphs_have_no_similarity() {
        let empty = CompressedPatternGraph::default();
        let a = graph(&["A", "B"], &[(0, 1, "p")]);
        let budget = SearchBudget::unlimited();
        assert_eq!(similarity(&empty, &a, &unit(), &budget), 0.0);
        assert_eq!(similarity(&empty, &empty, &unit(), &budget), 0.0);
        assert_eq!(distance(&empty, &a, &unit(), &budget), 1.0);
    }

    #[test]
    fn exhausted_budget_gives_a_lower_bound() {
        let a = graph(
            &["A", "A", "A", "A"],
            &[(0, 1, "p"), (1, 2, "p"), (2, 3, "p"), (3, 0, "p")],
        );
        let exact = align(&a, &a, &unit(), &SearchBudget::unlimited());
        let bounded = align(&a, &a, &unit(), &SearchBudget::steps(1));
        assert!(!bounded.complete);
        assert!(bounded.similarity <= exact.similarity);
        assert!(bounded.similarity >= 0.0);
    }
}
