use motif_engine::Pattern;
use motif_model::{TargetGraph, Triple};


fn pattern(triples: &[(&str, &str, &str)]) -> Pattern {
    Pattern::parse(triples.iter().copied()).unwrap()
}

fn graph(triples: &[(&str, &str, &str)]) -> TargetGraph {
    triples
        .iter()
        .map(|(s, p, o)| Triple::parse(s, p, o).unwrap())
        .collect()
}
