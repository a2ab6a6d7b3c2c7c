use crate::search::align;
use crate::{CompressedPatternGraph, DistanceError, LabelWeights, SearchBudget};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::io::Write;
use tracing::{info, warn};

/// The pairwise distances of a list of compressed graphs.
///
/// The matrix is symmetric with a zero diagonal and every value lies in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes the distances of all pairs of `graphs` with `workers` threads.
    ///
    /// Every worker computes whole rows of the upper triangle.
    pub fn compute(
        graphs: &[CompressedPatternGraph],
        weights: &LabelWeights,
        budget: &SearchBudget,
        workers: usize,
    ) -> Result<Self, DistanceError> {
        let size = graphs.len();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|index| format!("motif-similarity-{index}"))
            .build()?;

        let rows = pool.install(|| {
            (0..size)
                .into_par_iter()
                .map(|i| {
                    (i + 1..size)
                        .map(|j| align(&graphs[i], &graphs[j], weights, budget))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        });

        let mut values = vec![0.0; size * size];
        let mut incomplete = 0;
        for (i, row) in rows.into_iter().enumerate() {
            for (offset, alignment) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                let distance = (1.0 - alignment.similarity).clamp(0.0, 1.0);
                values[i * size + j] = distance;
                values[j * size + i] = distance;
                if !alignment.complete {
                    incomplete += 1;
                }
            }
        }
        if incomplete > 0 {
            warn!("{incomplete} similarity searches exhausted their budget");
        }
        info!("Computed the distances of {size} graphs");
        Ok(Self { size, values })
    }

    /// The number of graphs.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            self.values.get(i * self.size + j).copied()
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.values.get(i * self.size..(i + 1) * self.size)
    }

    /// Writes the matrix as CSV with a header row and a label column.
    pub fn write_csv(&self, writer: impl Write, labels: &[String]) -> Result<(), DistanceError> {
        if labels.len() != self.size {
            return Err(DistanceError::LabelCount {
                expected: self.size,
                found: labels.len(),
            });
        }
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(std::iter::once("pattern").chain(labels.iter().map(String::as_str)))?;
        for (label, row) in labels.iter().zip(self.values.chunks(self.size.max(1))) {
            writer.write_record(
                std::iter::once(label.clone()).chain(row.iter().map(ToString::to_string)),
            )?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::DiGraph;

    fn chain(labels: &[&str]) -> CompressedPatternGraph {
        let mut graph = DiGraph::new();
        let nodes = labels
            .iter()
            .map(|label| graph.add_node((*label).to_owned()))
            .collect::<Vec<_>>();
        for pair in nodes.windows(2) {
            graph.add_edge(pair[0], pair[1], "p".to_owned());
        }
        graph.into()
    }

    #[test]
    fn symmetric_with_zero_diagonal() {
        let graphs = [chain(&["A", "B"]), chain(&["A", "C"]), chain(&["A", "B", "C"])];
        let matrix = DistanceMatrix::compute(
            &graphs,
            &LabelWeights::default(),
            &SearchBudget::unlimited(),
            2,
        )
        .unwrap();

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(0.0));
            for j in 0..3 {
                let distance = matrix.get(i, j).unwrap();
                assert_eq!(Some(distance), matrix.get(j, i));
                assert!((0.0..=1.0).contains(&distance));
            }
        }
        assert!(matrix.get(0, 2).unwrap() < matrix.get(1, 2).unwrap());
        assert_eq!(matrix.get(3, 0), None);
    }

    #[test]
    fn csv_has_labelled_rows() {
        let graphs = [chain(&["A", "B"]), chain(&["A", "B"])];
        let matrix = DistanceMatrix::compute(
            &graphs,
            &LabelWeights::default(),
            &SearchBudget::unlimited(),
            1,
        )
        .unwrap();
        let mut csv = Vec::new();
        matrix
            .write_csv(&mut csv, &["x".to_owned(), "y".to_owned()])
            .unwrap();
        insta::assert_snapshot!(String::from_utf8(csv).unwrap().trim_end(), @r"
pattern,x,y
x,0,0
y,0,0
");
        assert!(matches!(
            matrix.write_csv(Vec::new(), &[]),
            Err(DistanceError::LabelCount { expected: 2, found: 0 })
        ));
    }
}
