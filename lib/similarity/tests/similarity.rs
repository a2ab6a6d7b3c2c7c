use crate::corpus;
use motif_similarity::{
    distance, similarity, DistanceMatrix, LabelHierarchy, LabelWeights, SearchBudget,
};

fn weight_tables() -> Vec<LabelWeights> {
    vec![
        LabelWeights::default(),
        LabelWeights::tmc_fixed(),
        LabelWeights::idf(&corpus(), &LabelHierarchy::tmc()).unwrap(),
    ]
}

#[test]
fn similarity_is_bounded_symmetric_and_reflexive() {
    let graphs = corpus();
    let budget = SearchBudget::unlimited();
    for weights in weight_tables() {
        for x in &graphs {
            assert_eq!(similarity(x, x, &weights, &budget), 1.0);
            for y in &graphs {
                let xy = similarity(x, y, &weights, &budget);
                assert!((0.0..=1.0).contains(&xy));
                assert_eq!(xy, similarity(y, x, &weights, &budget));
                assert_eq!(distance(x, y, &weights, &budget), (1.0 - xy).clamp(0.0, 1.0));
            }
        }
    }
}

#[test]
fn closer_structures_are_more_similar() {
    let graphs = corpus();
    let weights = LabelWeights::tmc_fixed();
    let budget = SearchBudget::unlimited();
    // The nitrogen and oxygen attachments only differ by the element.
    let element_swap = similarity(&graphs[0], &graphs[1], &weights, &budget);
    let centre_instead_of_ligand = similarity(&graphs[0], &graphs[2], &weights, &budget);
    assert!(element_swap > centre_instead_of_ligand);
    assert!(element_swap < 1.0);
}

#[test]
fn distance_matrix_of_the_corpus() {
    let graphs = corpus();
    let weights = LabelWeights::tmc_fixed();
    let budget = SearchBudget::unlimited();
    let matrix = DistanceMatrix::compute(&graphs, &weights, &budget, 3).unwrap();
    for i in 0..graphs.len() {
        assert_eq!(matrix.get(i, i), Some(0.0));
        for j in 0..graphs.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            if i != j {
                assert_eq!(
                    matrix.get(i, j),
                    Some(distance(&graphs[i], &graphs[j], &weights, &budget))
                );
            }
        }
    }
}
