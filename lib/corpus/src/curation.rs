use crate::batch::BatchOptions;
use crate::{CorpusError, PatternCollection};
use motif_engine::{ContentReport, ContentRules, MatchError, Matcher};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// For every pattern, the patterns one size smaller that strictly dominate it.
///
/// Keys are `(size, pattern id)`; parent ids refer to patterns of size `size - 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DominationParents {
    parents: BTreeMap<(usize, String), Vec<String>>,
}

impl DominationParents {
    /// The parents of `id` (of size `size`), in file order.
    pub fn parents(&self, size: usize, id: &str) -> &[String] {
        self.parents
            .get(&(size, id.to_owned()))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Iterates over `(size, pattern id, parent ids)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &[String])> {
        self.parents
            .iter()
            .map(|((size, id), parents)| (*size, id.as_str(), parents.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Computes the [DominationParents] of all patterns of the given sizes (all sizes if empty).
///
/// A pair whose check exceeds the match budget is not considered a parent.
pub fn domination_parents(
    collection: &PatternCollection,
    sizes: &[usize],
    options: &BatchOptions,
) -> Result<DominationParents, CorpusError> {
    let matcher = Matcher::new(options.budget);
    let pool = options.thread_pool()?;
    let mut parents = BTreeMap::new();

    for set in collection.iter() {
        let size = set.size();
        if !sizes.is_empty() && !sizes.contains(&size) {
            continue;
        }
        let Some(candidates) = size.checked_sub(1).and_then(|size| collection.get(size)) else {
            debug!("No patterns of size {} to dominate size {size}", size.saturating_sub(1));
            continue;
        };

        let children = set.iter().collect::<Vec<_>>();
        let rows = pool.install(|| {
            children
                .par_iter()
                .map(|(id, child)| {
                    let dominating = candidates
                        .iter()
                        .filter(|(parent_id, parent)| {
                            match matcher.strictly_dominates(parent, child) {
                                Ok(dominates) => dominates,
                                Err(error) => {
                                    warn!("Cannot check whether {parent_id} dominates {id}: {error}");
                                    false
                                }
                            }
                        })
                        .map(|(parent_id, _)| parent_id.to_owned())
                        .collect::<Vec<_>>();
                    ((size, (*id).to_owned()), dominating)
                })
                .collect::<Vec<_>>()
        });
        info!("Computed the parents of {} patterns of size {size}", rows.len());
        parents.extend(rows);
    }

    Ok(DominationParents { parents })
}

/// The content report of every pattern of the collection, keyed by size.
///
/// Each entry holds the report or the error that stopped the check of that pattern.
pub type ContentReports = BTreeMap<usize, Vec<(String, Result<ContentReport, MatchError>)>>;

/// Applies the content rules to every pattern of the collection.
///
/// A failed check is returned in place of the report of that pattern and does not stop the others.
pub fn check_content(
    collection: &PatternCollection,
    rules: &ContentRules,
    options: &BatchOptions,
) -> Result<ContentReports, CorpusError> {
    let matcher = Matcher::new(options.budget);
    let pool = options.thread_pool()?;
    Ok(collection
        .iter()
        .map(|set| {
            let patterns = set.iter().collect::<Vec<_>>();
            let reports = pool.install(|| {
                patterns
                    .par_iter()
                    .map(|(id, pattern)| ((*id).to_owned(), rules.check(&matcher, pattern)))
                    .collect::<Vec<_>>()
            });
            (set.size(), reports)
        })
        .collect())
}

/// A pattern whose content could not be checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedPattern {
    pub size: usize,
    pub pattern_id: String,
    pub reason: String,
}

/// The result of [select_candidates].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSelection {
    /// The selected ids per size.
    pub selected: BTreeMap<usize, BTreeSet<String>>,
    /// Patterns skipped because their content check failed, ordered by size.
    pub failures: Vec<FailedPattern>,
}

impl CandidateSelection {
    /// The total number of selected patterns.
    pub fn selected_count(&self) -> usize {
        self.selected.values().map(BTreeSet::len).sum()
    }
}

/// Selects the patterns worth keeping for clustering.
///
/// Going from the largest size to the smallest, a pattern is selected if it specifies a binding
/// atom without redundancy (see [ContentReport::is_candidate]) or if it is a parent of a pattern
/// selected at the previous size. A pattern whose content check fails is listed in
/// [CandidateSelection::failures] and is only selected as a parent.
pub fn select_candidates(
    collection: &PatternCollection,
    rules: &ContentRules,
    parents: &DominationParents,
    options: &BatchOptions,
) -> Result<CandidateSelection, CorpusError> {
    let reports = check_content(collection, rules, options)?;
    let mut selection = CandidateSelection::default();
    let mut previous: Option<(usize, BTreeSet<String>)> = None;

    for (size, reports) in reports.into_iter().rev() {
        let mut candidates = BTreeSet::new();
        for (id, report) in reports {
            match report {
                Ok(report) if report.is_candidate() => {
                    candidates.insert(id);
                }
                Ok(_) => {}
                Err(error) => {
                    warn!("Cannot check the content of pattern {id} of size {size}: {error}");
                    selection.failures.push(FailedPattern {
                        size,
                        pattern_id: id,
                        reason: error.to_string(),
                    });
                }
            }
        }
        if let Some((previous_size, previous_candidates)) = &previous {
            for id in previous_candidates {
                candidates.extend(parents.parents(*previous_size, id).iter().cloned());
            }
        }
        info!("Selected {} patterns of size {size}", candidates.len());
        selection.selected.insert(size, candidates.clone());
        previous = Some((size, candidates));
    }

    selection.failures.sort_by_key(|failure| failure.size);
    Ok(selection)
}
