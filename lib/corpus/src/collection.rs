use crate::layout::CorpusLayout;
use crate::{CorpusError, PatternSet};
use motif_engine::Pattern;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// All pattern sets of a corpus directory, keyed by pattern size.
#[derive(Clone, Debug, Default)]
pub struct PatternCollection {
    sets: BTreeMap<usize, PatternSet>,
}

impl PatternCollection {
    /// Creates a new [PatternCollection] from already parsed sets.
    pub fn new(sets: impl IntoIterator<Item = PatternSet>) -> Self {
        Self {
            sets: sets.into_iter().map(|set| (set.size(), set)).collect(),
        }
    }

    /// Reads every corpus file in `directory` that matches `layout`.
    pub fn discover(directory: &Path, layout: &CorpusLayout) -> Result<Self, CorpusError> {
        let sizes = layout.discover_sizes(directory)?;
        Self::load(directory, &sizes, layout)
    }

    /// Reads the corpus files of the given sizes. Fails if any of them does not exist.
    pub fn load(
        directory: &Path,
        sizes: &[usize],
        layout: &CorpusLayout,
    ) -> Result<Self, CorpusError> {
        if let Some(size) = sizes
            .iter()
            .find(|size| layout.locate(directory, **size).is_none())
        {
            return Err(CorpusError::MissingSizeFile {
                size: *size,
                directory: directory.to_owned(),
            });
        }

        let sets = sizes
            .par_iter()
            .map(|size| PatternSet::load(directory, *size, layout))
            .collect::<Result<Vec<_>, _>>()?;
        let collection = Self::new(sets);
        info!(
            "Read {} patterns of sizes {:?} from {}",
            collection.pattern_count(),
            collection.sizes(),
            directory.display()
        );
        Ok(collection)
    }

    /// The available sizes in ascending order.
    pub fn sizes(&self) -> Vec<usize> {
        self.sets.keys().copied().collect()
    }

    pub fn get(&self, size: usize) -> Option<&PatternSet> {
        self.sets.get(&size)
    }

    pub fn contains(&self, size: usize) -> bool {
        self.sets.contains_key(&size)
    }

    /// Returns the pattern `id` of size `size`.
    pub fn pattern(&self, size: usize, id: &str) -> Option<&Pattern> {
        self.sets.get(&size)?.get(id)
    }

    /// Iterates over the sets in ascending order of size.
    pub fn iter(&self) -> impl Iterator<Item = &PatternSet> {
        self.sets.values()
    }

    /// The number of sizes.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The total number of patterns over all sizes.
    pub fn pattern_count(&self) -> usize {
        self.sets.values().map(PatternSet::len).sum()
    }

    /// Lists the patterns of the given sizes (or of all sizes if `sizes` is empty), ordered by
    /// size and then by file order.
    pub fn entries(&self, sizes: &[usize]) -> Vec<(&str, &Pattern)> {
        self.sets
            .iter()
            .filter(|(size, _)| sizes.is_empty() || sizes.contains(size))
            .flat_map(|(_, set)| set.iter())
            .collect()
    }
}
