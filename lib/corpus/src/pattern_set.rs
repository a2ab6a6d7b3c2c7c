use crate::layout::{open_corpus_file, CorpusLayout};
use crate::CorpusError;
use motif_engine::Pattern;
use motif_model::{PatternError, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

/// Starts the description of a pattern. The rest of the line is the pattern id.
const TAG_PATTERN_ID: &str = "0";
/// Adds a triple to the current pattern: `6 <s>\t<p>\t<o>\t<n>`.
const TAG_TRIPLE: &str = "6";

/// A pattern that was dropped while reading a corpus file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedPattern {
    pub id: String,
    /// The line that caused the rejection (1-based).
    pub line: usize,
    pub reason: PatternError,
}

/// The patterns of a single size, read from a corpus file.
///
/// A corpus file is line-based and each line starts with a numeric tag. Only two tags are
/// relevant: `0` starts a new pattern and `6` adds a triple to it. The other tags describe the
/// matches found by the miner and are ignored. Patterns are kept in the order in which they first
/// appear in the file.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    size: usize,
    ids: Vec<String>,
    patterns: FxHashMap<String, Pattern>,
    rejected: Vec<RejectedPattern>,
}

impl PatternSet {
    /// Parses a corpus file containing the patterns of size `size`.
    ///
    /// Triple lines appearing before the first pattern id are dropped with a warning. A pattern
    /// that contains a triple with a variable predicate is dropped as a whole and reported by
    /// [PatternSet::rejected]. Any other malformed triple line aborts parsing.
    pub fn parse(size: usize, reader: impl BufRead) -> Result<Self, CorpusError> {
        let mut set = Self {
            size,
            ..Self::default()
        };
        let mut rejected_ids = FxHashSet::default();
        let mut current: Option<String> = None;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            let line = line.trim();
            let (tag, rest) = line
                .split_once(char::is_whitespace)
                .unwrap_or((line, ""));

            match tag {
                TAG_PATTERN_ID => current = Some(rest.trim().to_owned()),
                TAG_TRIPLE => {
                    let Some(id) = &current else {
                        warn!("Line {line_number}: dropping a triple that precedes every pattern id");
                        continue;
                    };
                    if rejected_ids.contains(id) {
                        continue;
                    }
                    match parse_triple(line_number, rest)? {
                        Ok(triple) => set.push(id, triple),
                        Err(reason) => {
                            warn!("Line {line_number}: dropping pattern {id}: {reason}");
                            set.remove(id);
                            rejected_ids.insert(id.clone());
                            set.rejected.push(RejectedPattern {
                                id: id.clone(),
                                line: line_number,
                                reason,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        debug!(
            "Read {} patterns of size {size} ({} rejected)",
            set.len(),
            set.rejected.len()
        );
        Ok(set)
    }

    /// Reads the corpus file of `size` from `directory`.
    pub fn load(directory: &Path, size: usize, layout: &CorpusLayout) -> Result<Self, CorpusError> {
        let path = layout
            .locate(directory, size)
            .ok_or_else(|| CorpusError::MissingSizeFile {
                size,
                directory: directory.to_owned(),
            })?;
        debug!("Reading {}", path.display());
        Self::parse(size, open_corpus_file(&path)?)
    }

    /// The size of the patterns, as declared by the corpus file.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    /// Returns the `index`-th pattern in file order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Pattern)> {
        let id = self.ids.get(index)?;
        Some((id, self.patterns.get(id)?))
    }

    /// The pattern ids in file order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Iterates over the patterns in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.ids
            .iter()
            .filter_map(|id| Some((id.as_str(), self.patterns.get(id)?)))
    }

    /// The patterns that were dropped while parsing.
    pub fn rejected(&self) -> &[RejectedPattern] {
        &self.rejected
    }

    fn push(&mut self, id: &str, triple: Triple) {
        if let Some(pattern) = self.patterns.get_mut(id) {
            pattern.insert(triple);
        } else {
            self.ids.push(id.to_owned());
            self.patterns.insert(id.to_owned(), Pattern::new([triple]));
        }
    }

    fn remove(&mut self, id: &str) {
        if self.patterns.remove(id).is_some() {
            self.ids.retain(|other| other != id);
        }
    }
}

/// Parses the fields of a triple line (without the tag).
///
/// The outer result fails for lines that cannot be read at all. The inner result only fails for a
/// variable predicate, which invalidates the pattern but not the file.
fn parse_triple(line: usize, fields: &str) -> Result<Result<Triple, PatternError>, CorpusError> {
    let fields = fields.split('\t').map(str::trim).collect::<Vec<_>>();
    let terms = match fields.as_slice() {
        [subject, predicate, object] => [*subject, *predicate, *object],
        [subject, predicate, object, count]
            if count.chars().all(|c| c.is_ascii_digit()) =>
        {
            [*subject, *predicate, *object]
        }
        _ => {
            return CorpusError::malformed(
                line,
                format!(
                    "expected three tab-separated terms and a count, found {} fields",
                    fields.len()
                ),
            );
        }
    };

    match Triple::from_parts(&terms) {
        Ok(triple) => Ok(Ok(triple)),
        Err(error @ PatternError::VariablePredicate(_)) => Ok(Err(error)),
        Err(source) => Err(CorpusError::InvalidTriple { line, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_lines() {
        let data = "0 12\n1 4\n6 <a>\t<b>\t?v1\t3\n7 graph\n8 ?v1 <x>\n9\n0 13\n6 <a>\t<b>\t?v2\t1\n6 ?v1\t<c>\t<d>\t1";
        let set = PatternSet::parse(2, data.as_bytes()).unwrap();
        assert_eq!(set.size(), 2);
        assert_eq!(set.ids(), ["12", "13"]);
        assert_eq!(set.get("12").unwrap().to_string(), "<a> <b> ?v1 .");
        assert_eq!(set.get("13").unwrap().len(), 2);
    }

    #[test]
    fn triples_before_any_id_are_dropped() {
        let data = "6 <a>\t<b>\t?v1\t3\n0 1\n6 <a>\t<b>\t<c>\t3\n";
        let set = PatternSet::parse(1, data.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("1").unwrap().to_string(), "<a> <b> <c> .");
    }

    #[test]
    fn variable_predicate_rejects_the_pattern() {
        let data = "0 1\n6 <a>\t<b>\t?v1\t1\n6 ?v1\t?p\t<c>\t1\n6 ?v1\t<q>\t<c>\t1\n0 2\n6 <a>\t<b>\t<c>\t1\n";
        let set = PatternSet::parse(2, data.as_bytes()).unwrap();
        assert_eq!(set.ids(), ["2"]);
        assert_eq!(
            set.rejected(),
            [RejectedPattern {
                id: "1".to_owned(),
                line: 3,
                reason: PatternError::VariablePredicate("?p".to_owned()),
            }]
        );
    }

    #[test]
    fn malformed_lines_fail_with_line_number() {
        let data = "0 1\n6 <a>\t<b>\n";
        let error = PatternSet::parse(1, data.as_bytes()).unwrap_err();
        assert!(matches!(error, CorpusError::MalformedLine { line: 2, .. }));

        let data = "0 1\n6 <a>\tb\t<c>\t1\n";
        let error = PatternSet::parse(1, data.as_bytes()).unwrap_err();
        assert!(matches!(error, CorpusError::InvalidTriple { line: 2, .. }));
    }

    #[test]
    fn parsing_is_deterministic() {
        let data = "0 b\n6 ?x\t<p>\t?y\t1\n0 a\n6 ?y\t<q>\t<c>\t1\n6 <a>\t<p>\t?y\t1\n";
        let first = PatternSet::parse(2, data.as_bytes()).unwrap();
        let second = PatternSet::parse(2, data.as_bytes()).unwrap();
        assert_eq!(first.ids(), ["b", "a"]);
        assert!(first.iter().eq(second.iter()));
        assert_eq!(first.get_index(1).map(|(id, _)| id), Some("a"));
    }
}
