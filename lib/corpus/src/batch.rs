//! Counting the matches of many patterns in many target graphs.
//!
//! The pattern list is partitioned into disjoint chunks and every chunk is processed by one
//! worker of a dedicated thread pool. Workers share no mutable state; the rows they produce are
//! concatenated in the original pattern order.

use crate::CorpusError;
use motif_engine::{MatchBudget, MatchError, Matcher, Pattern};
use motif_model::TargetGraph;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::thread::available_parallelism;
use tracing::{debug, info, warn};

/// Written for cells whose match count is unknown.
pub const MISSING_VALUE: &str = "NA";

/// Configures a batch operation.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// The number of workers. Zero is treated as one.
    pub workers: usize,
    /// The budget of every single match attempt.
    pub budget: MatchBudget,
    /// Pattern/graph pairs that are known not to match. Their count is 0 without evaluation.
    pub inactive: FxHashMap<String, FxHashSet<usize>>,
}

impl BatchOptions {
    /// Marks the pattern `pattern_id` as not matching the graph `graph_index`.
    pub fn mark_inactive(&mut self, pattern_id: impl Into<String>, graph_index: usize) {
        self.inactive
            .entry(pattern_id.into())
            .or_default()
            .insert(graph_index);
    }

    fn is_inactive(&self, pattern_id: &str, graph_index: usize) -> bool {
        self.inactive
            .get(pattern_id)
            .is_some_and(|graphs| graphs.contains(&graph_index))
    }

    pub(crate) fn thread_pool(&self) -> Result<ThreadPool, CorpusError> {
        Ok(ThreadPoolBuilder::new()
            .num_threads(self.workers.max(1))
            .thread_name(|index| format!("motif-worker-{index}"))
            .build()?)
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: available_parallelism().map_or(1, usize::from),
            budget: MatchBudget::default(),
            inactive: FxHashMap::default(),
        }
    }
}

/// Splits `items` into `parts` contiguous chunks.
///
/// The chunks are as even as possible and the first chunk receives the remainder. If there are
/// fewer items than parts, every item becomes its own chunk.
pub fn partition<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let parts = parts.max(1);
    if items.len() < parts {
        return items.chunks(1).collect();
    }

    let chunk_size = items.len() / parts;
    let remainder = items.len() % parts;
    let mut chunks = Vec::with_capacity(parts);
    let (first, mut rest) = items.split_at(chunk_size + remainder);
    chunks.push(first);
    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(chunk_size);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// The number of matches of a pattern in a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchCount {
    Exact(u64),
    /// The match budget was exhausted.
    Unknown,
}

impl MatchCount {
    pub fn exact(self) -> Option<u64> {
        match self {
            Self::Exact(count) => Some(count),
            Self::Unknown => None,
        }
    }
}

impl Display for MatchCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(count) => write!(f, "{count}"),
            Self::Unknown => f.write_str(MISSING_VALUE),
        }
    }
}

/// The result for a single pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    /// One count per target graph.
    Counted(Vec<MatchCount>),
    /// The pattern could not be compiled. No graph was evaluated.
    Unparseable(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRow {
    pub pattern_id: String,
    pub outcome: RowOutcome,
}

/// The match counts of a list of patterns in a list of target graphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchTable {
    graph_count: usize,
    rows: Vec<MatchRow>,
}

impl MatchTable {
    /// The number of target graphs.
    pub fn graph_count(&self) -> usize {
        self.graph_count
    }

    /// The rows in the order of the input patterns.
    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn row(&self, pattern_id: &str) -> Option<&MatchRow> {
        self.rows.iter().find(|row| row.pattern_id == pattern_id)
    }

    /// Returns the count of `pattern_id` in the graph `graph_index`, if the pattern was counted.
    pub fn count(&self, pattern_id: &str, graph_index: usize) -> Option<MatchCount> {
        match &self.row(pattern_id)?.outcome {
            RowOutcome::Counted(counts) => counts.get(graph_index).copied(),
            RowOutcome::Unparseable(_) => None,
        }
    }

    /// The patterns that could not be counted, with the reason.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .filter_map(|row| match &row.outcome {
                RowOutcome::Unparseable(reason) => Some((row.pattern_id.as_str(), reason.as_str())),
                RowOutcome::Counted(_) => None,
            })
            .collect()
    }

    /// The number of cells whose count is unknown.
    pub fn unknown_count(&self) -> usize {
        self.counted_rows()
            .flat_map(|(_, counts)| counts)
            .filter(|count| **count == MatchCount::Unknown)
            .count()
    }

    /// Writes the table as CSV, with one row per graph and one column per counted pattern.
    ///
    /// The first column holds the graph name, or the graph index if no names are given.
    /// Unparseable patterns have no column. Unknown counts are written as [MISSING_VALUE].
    pub fn write_csv(&self, writer: impl Write, graph_names: Option<&[String]>) -> Result<(), CorpusError> {
        let mut writer = csv::Writer::from_writer(writer);
        let columns = self.counted_rows().collect::<Vec<_>>();

        writer.write_record(
            std::iter::once("graph").chain(columns.iter().map(|(id, _)| *id)),
        )?;
        for graph_index in 0..self.graph_count {
            let name = graph_names
                .and_then(|names| names.get(graph_index).cloned())
                .unwrap_or_else(|| graph_index.to_string());
            let cells = columns
                .iter()
                .map(|(_, counts)| counts.get(graph_index).map_or_else(|| MISSING_VALUE.to_owned(), ToString::to_string));
            writer.write_record(std::iter::once(name).chain(cells))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn counted_rows(&self) -> impl Iterator<Item = (&str, &[MatchCount])> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            RowOutcome::Counted(counts) => Some((row.pattern_id.as_str(), counts.as_slice())),
            RowOutcome::Unparseable(_) => None,
        })
    }
}

/// Counts the matches of every pattern in `entries` in every graph of `graphs`.
///
/// A pattern that cannot be compiled yields an [RowOutcome::Unparseable] row. A match attempt that
/// exceeds the budget yields [MatchCount::Unknown]. Neither aborts the batch.
pub fn count_matches(
    entries: &[(&str, &Pattern)],
    graphs: &[TargetGraph],
    options: &BatchOptions,
) -> Result<MatchTable, CorpusError> {
    let matcher = Matcher::new(options.budget);
    let chunks = partition(entries, options.workers);
    info!(
        "Counting matches of {} patterns in {} graphs with {} workers",
        entries.len(),
        graphs.len(),
        chunks.len()
    );

    let rows = options.thread_pool()?.install(|| {
        chunks
            .into_par_iter()
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|(id, pattern)| count_row(&matcher, id, pattern, graphs, options))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    });

    let table = MatchTable {
        graph_count: graphs.len(),
        rows: rows.into_iter().flatten().collect(),
    };
    let failures = table.failures().len();
    if failures > 0 {
        warn!("{failures} patterns could not be compiled and were skipped");
    }
    info!(
        "Counted {} patterns ({} cells unknown)",
        table.rows.len() - failures,
        table.unknown_count()
    );
    Ok(table)
}

fn count_row(
    matcher: &Matcher,
    pattern_id: &str,
    pattern: &Pattern,
    graphs: &[TargetGraph],
    options: &BatchOptions,
) -> MatchRow {
    let unparseable = |reason: String| {
        warn!("Skipping pattern {pattern_id}: {reason}");
        MatchRow {
            pattern_id: pattern_id.to_owned(),
            outcome: RowOutcome::Unparseable(reason),
        }
    };
    if let Err(error) = pattern.compile() {
        return unparseable(error.to_string());
    }

    let mut counts = Vec::with_capacity(graphs.len());
    for (graph_index, graph) in graphs.iter().enumerate() {
        if options.is_inactive(pattern_id, graph_index) {
            counts.push(MatchCount::Exact(0));
            continue;
        }
        match matcher.count(pattern, graph) {
            Ok(count) => counts.push(MatchCount::Exact(count)),
            Err(error @ MatchError::BudgetExhausted { .. }) => {
                debug!("Pattern {pattern_id} in graph {graph_index}: {error}");
                counts.push(MatchCount::Unknown);
            }
            Err(error) => return unparseable(error.to_string()),
        }
    }
    MatchRow {
        pattern_id: pattern_id.to_owned(),
        outcome: RowOutcome::Counted(counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_chunk_takes_the_remainder() {
        let items = (0..10).collect::<Vec<_>>();
        let chunks = partition(&items, 3);
        assert_eq!(chunks, vec![&[0, 1, 2, 3][..], &[4, 5, 6], &[7, 8, 9]]);
    }

    #[test]
    fn fewer_items_than_parts_gives_singletons() {
        let items = [1, 2];
        assert_eq!(partition(&items, 4), vec![&[1][..], &[2]]);
        assert!(partition::<u8>(&[], 4).is_empty());
    }

    #[test]
    fn zero_parts_is_one_chunk() {
        let items = [1, 2, 3];
        assert_eq!(partition(&items, 0), vec![&[1, 2, 3][..]]);
    }
}
