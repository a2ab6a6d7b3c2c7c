use crate::Term;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// A dense identifier of a [Term] within a single [TermDictionary].
///
/// Identifiers are allocated in insertion order, starting at zero. They are only meaningful
/// together with the dictionary that allocated them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub u32);

impl TermId {
    /// Returns the identifier as an index into the dictionary.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maintains a bidirectional mapping between terms and [TermId]s.
///
/// Interning the terms of a graph once makes every comparison in the matching loop an integer
/// comparison.
#[derive(Clone, Debug, Default)]
pub struct TermDictionary {
    /// Maps a term id (as index) to its term.
    id2term: Vec<Term>,
    /// Maps a term to its id.
    term2id: FxHashMap<Term, TermId>,
}

impl TermDictionary {
    /// Creates a new empty [TermDictionary].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `term`, allocating a new one if the term is unknown.
    pub fn intern(&mut self, term: &Term) -> TermId {
        if let Some(id) = self.term2id.get(term) {
            return *id;
        }

        let next = u32::try_from(self.id2term.len())
            .unwrap_or_else(|_| unreachable!("more than u32::MAX distinct terms in one graph"));
        let id = TermId(next);
        self.id2term.push(term.clone());
        self.term2id.insert(term.clone(), id);
        id
    }

    /// Returns the id of `term` without allocating one.
    pub fn get(&self, term: &Term) -> Option<TermId> {
        self.term2id.get(term).copied()
    }

    /// Returns the term identified by `id`.
    pub fn resolve(&self, id: TermId) -> Option<&Term> {
        self.id2term.get(id.index())
    }

    /// Returns the number of interned terms.
    pub fn len(&self) -> usize {
        self.id2term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2term.is_empty()
    }
}
