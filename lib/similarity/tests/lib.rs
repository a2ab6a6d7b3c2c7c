use motif_engine::Pattern;
use motif_similarity::{CompressedPatternGraph, CompressionRules};

mod similarity;

const HAS_LIGAND: &str = "<resource://integreat/p5/complex/TMC/hasLigand>";
const HAS_METAL_CENTRE: &str = "<resource://integreat/p5/complex/TMC/hasMetalCentre>";
const IS_METAL_CENTRE: &str = "<resource://integreat/p5/ligand/centre/isMetalCentre>";
const IS_LIGAND: &str = "<resource://integreat/p5/ligand/ligand/isLigand>";
const BOND_TO_LIGAND: &str = "<resource://integreat/p5/ligand/structure/bLl>";
const BOND_TO_CENTRE: &str = "<resource://integreat/p5/ligand/structure/bLc>";
const HAS_BINDING_ATOM: &str = "<resource://integreat/p5/ligand/bond/hasBindingAtom>";
const IS_ATOM: &str = "<resource://integreat/p5/atomic/atom/isAtom>";

fn compress(triples: &[(&str, &str, &str)]) -> CompressedPatternGraph {
    let pattern = Pattern::parse(triples.iter().copied()).unwrap();
    CompressedPatternGraph::compress(&pattern, &CompressionRules::tmc())
}

/// A small corpus of ligand attachment patterns.
fn corpus() -> Vec<CompressedPatternGraph> {
    vec![
        compress(&[
            ("?tmc", HAS_LIGAND, "?l"),
            ("?l", BOND_TO_LIGAND, "?b"),
            ("?b", HAS_BINDING_ATOM, "?a"),
            ("?a", IS_ATOM, "<resource://integreat/p5/atomic/element/N>"),
        ]),
        compress(&[
            ("?tmc", HAS_LIGAND, "?l"),
            ("?l", BOND_TO_LIGAND, "?b"),
            ("?b", HAS_BINDING_ATOM, "?a"),
            ("?a", IS_ATOM, "<resource://integreat/p5/atomic/element/O>"),
        ]),
        compress(&[
            ("?tmc", HAS_METAL_CENTRE, "?m"),
            ("?m", IS_METAL_CENTRE, "<resource://integreat/p5/ligand/centre/reference/Fe>"),
            ("?m", BOND_TO_CENTRE, "?b"),
            ("?b", HAS_BINDING_ATOM, "?a"),
        ]),
        compress(&[
            ("?tmc", HAS_LIGAND, "?l"),
            ("?l", IS_LIGAND, "<resource://integreat/p5/ligand/reference/L12>"),
            ("?l", BOND_TO_LIGAND, "?b1"),
            ("?l", BOND_TO_LIGAND, "?b2"),
            ("?b1", HAS_BINDING_ATOM, "?a1"),
            ("?b2", HAS_BINDING_ATOM, "?a2"),
        ]),
    ]
}
