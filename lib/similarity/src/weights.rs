use crate::{CompressedPatternGraph, WeightError};
use motif_model::vocab::{atomic, ligand};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::{debug, info};

/// The weight of labels that are not listed in a weight table.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// The weight of the generic class labels in [LabelWeights::tmc_fixed].
const GENERIC_CLASS_WEIGHT: f64 = 0.5;

/// The labels of the generic classes of the transition-metal-complex vocabulary.
fn tmc_generic_classes() -> [&'static str; 3] {
    [
        atomic::ATOM.as_str(),
        ligand::LIGAND.as_str(),
        ligand::METAL_CENTRE.as_str(),
    ]
}

/// Declares generic labels whose weight is inherited by their more specific labels.
///
/// A label is a child of a root if its third-to-last IRI path segment equals the second-to-last
/// path segment of the root. For example, `.../ligand/ligand/Ligand` has the children
/// `.../ligand/<x>/z`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelHierarchy {
    roots: Vec<String>,
}

impl LabelHierarchy {
    /// A hierarchy without any root.
    pub fn none() -> Self {
        Self::default()
    }

    /// A hierarchy with the given roots, applied in order.
    pub fn by_path_segment(roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The hierarchy rooted at the generic atom, ligand and metal centre classes.
    pub fn tmc() -> Self {
        Self::by_path_segment(tmc_generic_classes())
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Returns whether `label` is a child of `root`.
    pub fn is_child(root: &str, label: &str) -> bool {
        let root_segment = root.rsplit('/').nth(1);
        let label_segment = label.rsplit('/').nth(2);
        root_segment.is_some() && root_segment == label_segment
    }
}

/// A table of non-negative label weights.
///
/// Labels that are not in the table have the default weight. Serialised as a flat JSON object
/// mapping labels to weights.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LabelWeights {
    weights: BTreeMap<String, f64>,
    #[serde(skip)]
    default: f64,
}

impl LabelWeights {
    /// Computes smoothed inverse document frequency weights over a corpus of graphs.
    ///
    /// With `N` graphs of which `c` contain a label, the raw weight of the label is
    /// `1 + ln(N / (1 + c))`. The weight of every hierarchy root that occurs in the corpus is then
    /// added to its children, except to edge labels. Finally all weights are divided by the
    /// largest one.
    pub fn idf(graphs: &[CompressedPatternGraph], hierarchy: &LabelHierarchy) -> Result<Self, WeightError> {
        if graphs.is_empty() {
            return Err(WeightError::EmptyCorpus);
        }

        let mut counts = BTreeMap::<&str, usize>::new();
        let mut edge_labels = FxHashSet::default();
        for graph in graphs {
            let labels = graph
                .node_labels()
                .chain(graph.edge_labels())
                .collect::<FxHashSet<_>>();
            for label in labels {
                *counts.entry(label).or_default() += 1;
            }
            edge_labels.extend(graph.edge_labels());
        }

        #[allow(clippy::cast_precision_loss, reason = "Corpus sizes are far below 2^52")]
        let total = graphs.len() as f64;
        #[allow(clippy::cast_precision_loss, reason = "Corpus sizes are far below 2^52")]
        let mut weights = counts
            .into_iter()
            .map(|(label, count)| (label.to_owned(), 1.0 + (total / (1.0 + count as f64)).ln()))
            .collect::<BTreeMap<_, _>>();

        for root in hierarchy.roots() {
            let Some(root_weight) = weights.get(root).copied() else {
                debug!("Hierarchy root {root} does not occur in the corpus");
                continue;
            };
            for (label, weight) in &mut weights {
                if label != root
                    && !edge_labels.contains(label.as_str())
                    && LabelHierarchy::is_child(root, label)
                {
                    *weight += root_weight;
                }
            }
        }

        let max = weights.values().copied().fold(0.0, f64::max);
        if max > 0.0 {
            for weight in weights.values_mut() {
                *weight /= max;
            }
        }
        info!("Computed the weights of {} labels over {} graphs", weights.len(), graphs.len());
        Self::from_map(weights, DEFAULT_WEIGHT)
    }

    /// A table with the given weights. Every other label has the weight `default`.
    pub fn fixed(
        default: f64,
        overrides: impl IntoIterator<Item = (impl Into<String>, f64)>,
    ) -> Result<Self, WeightError> {
        Self::from_map(
            overrides
                .into_iter()
                .map(|(label, weight)| (label.into(), weight))
                .collect(),
            default,
        )
    }

    /// Weights `0.5` for the generic atom, ligand and metal centre classes and `1` otherwise.
    pub fn tmc_fixed() -> Self {
        Self {
            weights: tmc_generic_classes()
                .into_iter()
                .map(|label| (label.to_owned(), GENERIC_CLASS_WEIGHT))
                .collect(),
            default: DEFAULT_WEIGHT,
        }
    }

    fn from_map(weights: BTreeMap<String, f64>, default: f64) -> Result<Self, WeightError> {
        check_weight("<default>", default)?;
        for (label, weight) in &weights {
            check_weight(label, *weight)?;
        }
        Ok(Self { weights, default })
    }

    /// Reads a flat JSON object mapping labels to weights.
    pub fn from_json(reader: impl Read) -> Result<Self, WeightError> {
        let weights = serde_json::from_reader::<_, BTreeMap<String, f64>>(reader)?;
        Self::from_map(weights, DEFAULT_WEIGHT)
    }

    /// Writes the table as a flat JSON object.
    pub fn to_json(&self, writer: impl Write) -> Result<(), WeightError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Sets the weight of labels that are not in the table.
    pub fn with_default(mut self, default: f64) -> Result<Self, WeightError> {
        check_weight("<default>", default)?;
        self.default = default;
        Ok(self)
    }

    /// The weight of `label`.
    pub fn weight(&self, label: &str) -> f64 {
        self.weights.get(label).copied().unwrap_or(self.default)
    }

    pub fn default_weight(&self) -> f64 {
        self.default
    }

    /// Iterates over the listed labels and their weights, ordered by label.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(label, weight)| (label.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for LabelWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            default: DEFAULT_WEIGHT,
        }
    }
}

fn check_weight(label: &str, weight: f64) -> Result<(), WeightError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(WeightError::NegativeWeight {
            label: label.to_owned(),
            weight,
        })
    }
}
