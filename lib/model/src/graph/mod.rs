mod dictionary;

pub use dictionary::{TermDictionary, TermId};

use crate::{Term, Triple};
use rustc_hash::{FxHashMap, FxHashSet};

/// The triples of a [TargetGraph] that share a single predicate.
///
/// All lookups return sorted slices, so that iterating over candidates is deterministic for a
/// given graph.
#[derive(Clone, Debug, Default)]
pub struct PredicateIndex {
    /// Subject -> objects.
    by_subject: FxHashMap<TermId, Vec<TermId>>,
    /// Object -> subjects.
    by_object: FxHashMap<TermId, Vec<TermId>>,
    /// All (subject, object) pairs.
    pairs: Vec<(TermId, TermId)>,
    /// Fast membership test for fully bound lookups.
    pair_set: FxHashSet<(TermId, TermId)>,
}

impl PredicateIndex {
    fn insert(&mut self, subject: TermId, object: TermId) -> bool {
        if !self.pair_set.insert((subject, object)) {
            return false;
        }
        self.by_subject.entry(subject).or_default().push(object);
        self.by_object.entry(object).or_default().push(subject);
        self.pairs.push((subject, object));
        true
    }

    fn finish(&mut self) {
        self.pairs.sort_unstable();
        for objects in self.by_subject.values_mut() {
            objects.sort_unstable();
        }
        for subjects in self.by_object.values_mut() {
            subjects.sort_unstable();
        }
    }

    /// Returns the objects related to `subject`.
    pub fn objects(&self, subject: TermId) -> &[TermId] {
        self.by_subject.get(&subject).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the subjects related to `object`.
    pub fn subjects(&self, object: TermId) -> &[TermId] {
        self.by_object.get(&object).map_or(&[][..], Vec::as_slice)
    }

    /// Returns all (subject, object) pairs.
    pub fn pairs(&self) -> &[(TermId, TermId)] {
        &self.pairs
    }

    pub fn contains(&self, subject: TermId, object: TermId) -> bool {
        self.pair_set.contains(&(subject, object))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// An immutable, indexed set of triples that patterns are matched against.
///
/// Target graphs are usually ground (no variables). For checking the domination between two
/// patterns, the triples of a pattern are used as a target graph. In this case, the variables of
/// the pattern are treated like any other term.
///
/// Terms are interned into a [TermDictionary] and the triples are indexed by predicate. Duplicate
/// triples are ignored.
#[derive(Clone, Debug, Default)]
pub struct TargetGraph {
    dictionary: TermDictionary,
    predicates: FxHashMap<TermId, PredicateIndex>,
    /// The keys of `predicates`, sorted.
    predicate_ids: Vec<TermId>,
    len: usize,
}

impl TargetGraph {
    /// Creates a new [TargetGraph] from `triples`.
    pub fn new(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::default();
        for triple in triples {
            graph.insert(&triple);
        }
        graph.finish();
        graph
    }

    fn insert(&mut self, triple: &Triple) {
        let subject = self.dictionary.intern(&triple.subject);
        let predicate = self
            .dictionary
            .intern(&Term::Constant(triple.predicate.clone()));
        let object = self.dictionary.intern(&triple.object);

        if self
            .predicates
            .entry(predicate)
            .or_default()
            .insert(subject, object)
        {
            self.len += 1;
        }
    }

    fn finish(&mut self) {
        for index in self.predicates.values_mut() {
            index.finish();
        }
        self.predicate_ids = self.predicates.keys().copied().collect();
        self.predicate_ids.sort_unstable();
    }

    /// Returns the number of distinct triples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the dictionary used for interning the terms of this graph.
    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    /// Returns the id of `term`, if the term occurs in this graph.
    pub fn term_id(&self, term: &Term) -> Option<TermId> {
        self.dictionary.get(term)
    }

    /// Returns the term identified by `id`.
    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.dictionary.resolve(id)
    }

    /// Returns the index of all triples with the predicate `predicate`.
    pub fn predicate(&self, predicate: TermId) -> Option<&PredicateIndex> {
        self.predicates.get(&predicate)
    }

    /// Returns true if the graph contains the given triple.
    pub fn contains(&self, triple: &Triple) -> bool {
        let ids = (
            self.term_id(&triple.subject),
            self.term_id(&Term::Constant(triple.predicate.clone())),
            self.term_id(&triple.object),
        );
        match ids {
            (Some(subject), Some(predicate), Some(object)) => self
                .predicate(predicate)
                .is_some_and(|index| index.contains(subject, object)),
            _ => false,
        }
    }

    /// Iterates over all triples, ordered by predicate id and then by (subject id, object id).
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.predicate_ids.iter().flat_map(move |predicate| {
            let index = &self.predicates[predicate];
            index.pairs().iter().filter_map(move |(subject, object)| {
                let predicate = match self.term(*predicate)? {
                    Term::Constant(nn) => nn.clone(),
                    Term::Variable(_) => return None,
                };
                Some(Triple {
                    subject: self.term(*subject)?.clone(),
                    predicate,
                    object: self.term(*object)?.clone(),
                })
            })
        })
    }
}

impl FromIterator<Triple> for TargetGraph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<&[Triple]> for TargetGraph {
    fn from(value: &[Triple]) -> Self {
        Self::new(value.iter().cloned())
    }
}
