//! Synthetic transition-metal-complex graphs and patterns for the benchmarks.

use motif::engine::Pattern;
use motif::model::vocab::{atomic, complex, ligand};
use motif::model::{TargetGraph, Term, Triple};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ELEMENTS: [&str; 6] = ["C", "N", "O", "P", "S", "Cl"];
const METALS: [&str; 4] = ["Fe", "Co", "Ni", "Cu"];
const LIGAND_CLASSES: usize = 12;

fn iri(value: String) -> Term {
    Term::constant(value)
}

/// Generates the skeleton of a complex with `ligands` ligands. Every ligand binds the metal centre
/// through one to three atoms.
pub fn generate_complex(rng: &mut impl Rng, id: usize, ligands: usize) -> Vec<Triple> {
    let base = format!("resource://integreat/p5/data/c{id}");
    let tmc = iri(base.clone());
    let centre = iri(format!("{base}/centre"));
    let metal = METALS[rng.random_range(0..METALS.len())];

    let mut triples = vec![
        Triple::new(tmc.clone(), complex::HAS_METAL_CENTRE.into_owned(), centre.clone()),
        Triple::new(
            centre.clone(),
            ligand::IS_METAL_CENTRE.into_owned(),
            iri(format!("resource://integreat/p5/ligand/centre/reference/{metal}")),
        ),
    ];
    for l in 0..ligands {
        let ligand_node = iri(format!("{base}/ligand{l}"));
        let class = rng.random_range(0..LIGAND_CLASSES);
        triples.push(Triple::new(tmc.clone(), complex::HAS_LIGAND.into_owned(), ligand_node.clone()));
        triples.push(Triple::new(
            ligand_node.clone(),
            ligand::IS_LIGAND.into_owned(),
            iri(format!("resource://integreat/p5/ligand/reference/L{class}")),
        ));
        for b in 0..rng.random_range(1..=3) {
            let bond = iri(format!("{base}/ligand{l}/bond{b}"));
            let atom = iri(format!("{base}/ligand{l}/atom{b}"));
            let element = ELEMENTS[rng.random_range(0..ELEMENTS.len())];
            triples.push(Triple::new(ligand_node.clone(), ligand::BOND_TO_LIGAND.into_owned(), bond.clone()));
            triples.push(Triple::new(centre.clone(), ligand::BOND_TO_CENTRE.into_owned(), bond.clone()));
            triples.push(Triple::new(bond, ligand::HAS_BINDING_ATOM.into_owned(), atom.clone()));
            triples.push(Triple::new(
                atom,
                atomic::IS_ATOM.into_owned(),
                iri(format!("resource://integreat/p5/atomic/atom/reference/{element}")),
            ));
        }
    }
    triples
}

/// Generates `count` complexes with up to `max_ligands` ligands each, one target graph per complex.
pub fn generate_graphs(seed: u64, count: usize, max_ligands: usize) -> Vec<TargetGraph> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let ligands = rng.random_range(1..=max_ligands.max(1));
            TargetGraph::new(generate_complex(&mut rng, id, ligands))
        })
        .collect()
}

/// Patterns describing how a ligand attaches to the metal centre, with increasing sizes.
pub fn attachment_patterns() -> Vec<(String, Pattern)> {
    let has_ligand = complex::HAS_LIGAND.as_str();
    let bond_to_ligand = ligand::BOND_TO_LIGAND.as_str();
    let bond_to_centre = ligand::BOND_TO_CENTRE.as_str();
    let binding_atom = ligand::HAS_BINDING_ATOM.as_str();
    let is_atom = atomic::IS_ATOM.as_str();
    let nitrogen = "resource://integreat/p5/atomic/atom/reference/N";

    let mut triples = vec![
        format!("?tmc <{has_ligand}> ?l"),
        format!("?l <{bond_to_ligand}> ?b"),
        format!("?m <{bond_to_centre}> ?b"),
        format!("?b <{binding_atom}> ?a"),
        format!("?a <{is_atom}> <{nitrogen}>"),
        format!("?l <{bond_to_ligand}> ?b2"),
        format!("?b2 <{binding_atom}> ?a2"),
    ];
    let mut patterns = Vec::new();
    while !triples.is_empty() {
        let pattern = triples
            .iter()
            .filter_map(|triple| {
                let parts = triple.split_whitespace().collect::<Vec<_>>();
                Triple::from_parts(&parts).ok()
            })
            .collect::<Pattern>();
        patterns.push((format!("s{}", pattern.len()), pattern));
        triples.pop();
    }
    patterns
}
