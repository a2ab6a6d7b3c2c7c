use motif_model::vocab::{atomic, complex, ligand};
use rustc_hash::FxHashMap;

/// How a predicate is handled when a pattern is compressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateRule {
    /// The triple assigns a class to its subject. The subject is labelled with the object IRI
    /// and the edge is removed. A variable object classifies nothing.
    Classify,
    /// The triple is kept as an edge labelled with the predicate. Unclassified endpoints receive
    /// the given default labels.
    Relate {
        subject_default: Option<String>,
        object_default: Option<String>,
    },
}

impl PredicateRule {
    /// A [PredicateRule::Relate] without default labels.
    pub fn relate() -> Self {
        Self::Relate {
            subject_default: None,
            object_default: None,
        }
    }

    /// A [PredicateRule::Relate] with default labels for both endpoints.
    pub fn relate_with(subject_default: impl Into<String>, object_default: impl Into<String>) -> Self {
        Self::Relate {
            subject_default: Some(subject_default.into()),
            object_default: Some(object_default.into()),
        }
    }
}

/// Maps predicate IRIs to their [PredicateRule].
///
/// Predicates without a rule are kept as plain edges.
#[derive(Clone, Debug, Default)]
pub struct CompressionRules {
    rules: FxHashMap<String, PredicateRule>,
}

impl CompressionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule of `predicate`, replacing any previous one.
    #[must_use]
    pub fn with_rule(mut self, predicate: impl Into<String>, rule: PredicateRule) -> Self {
        self.rules.insert(predicate.into(), rule);
        self
    }

    /// The rules of the transition-metal-complex vocabulary.
    pub fn tmc() -> Self {
        let tmc = complex::TRANSITION_METAL_COMPLEX.as_str();
        let centre = ligand::METAL_CENTRE.as_str();
        let ligand_class = ligand::LIGAND.as_str();
        let bond = ligand::LIGAND_BOND.as_str();
        Self::new()
            .with_rule(
                complex::HAS_METAL_CENTRE.as_str(),
                PredicateRule::relate_with(tmc, centre),
            )
            .with_rule(
                complex::HAS_LIGAND.as_str(),
                PredicateRule::relate_with(tmc, ligand_class),
            )
            .with_rule(ligand::IS_METAL_CENTRE.as_str(), PredicateRule::Classify)
            .with_rule(
                ligand::BOND_TO_CENTRE.as_str(),
                PredicateRule::relate_with(centre, bond),
            )
            .with_rule(
                ligand::BOND_TO_LIGAND.as_str(),
                PredicateRule::relate_with(ligand_class, bond),
            )
            .with_rule(ligand::IS_LIGAND.as_str(), PredicateRule::Classify)
            .with_rule(
                ligand::HAS_BINDING_ATOM.as_str(),
                PredicateRule::relate_with(bond, atomic::ATOM.as_str()),
            )
            .with_rule(atomic::IS_ATOM.as_str(), PredicateRule::Classify)
    }

    /// The rule of `predicate`.
    pub fn rule(&self, predicate: &str) -> Option<&PredicateRule> {
        self.rules.get(predicate)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_assignments_are_absorbed() {
        let rules = CompressionRules::tmc();
        assert_eq!(rules.len(), 8);
        assert_eq!(
            rules.rule(atomic::IS_ATOM.as_str()),
            Some(&PredicateRule::Classify)
        );
        assert_eq!(
            rules.rule(ligand::BOND_TO_LIGAND.as_str()),
            Some(&PredicateRule::relate_with(
                ligand::LIGAND.as_str(),
                ligand::LIGAND_BOND.as_str()
            ))
        );
        assert_eq!(rules.rule("http://example.com/unknown"), None);
    }
}
