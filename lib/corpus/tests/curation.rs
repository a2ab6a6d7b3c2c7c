use crate::corpus;
use motif_corpus::{
    domination_parents, select_candidates, BatchOptions, CorpusLayout, PatternCollection,
};
use motif_engine::{ContentRules, MatchBudget};

const HAS_BINDING_ATOM: &str = "<resource://integreat/p5/ligand/bond/hasBindingAtom>";
const IS_ATOM: &str = "<resource://integreat/p5/atomic/atom/isAtom>";
const IS_LIGAND: &str = "<resource://integreat/p5/ligand/ligand/isLigand>";
const NITROGEN: &str = "<resource://integreat/p5/atomic/element/N>";

fn options() -> BatchOptions {
    BatchOptions {
        workers: 2,
        ..BatchOptions::default()
    }
}

#[test]
fn parents_are_strict_dominators_one_size_smaller() {
    let dir = corpus(&[
        (1, "0 1\n6 <a>\t<b>\t?v1\t1\n0 2\n6 ?x\t<c>\t<d>\t1\n0 5\n6 ?x\t<e>\t<f>\t1\n"),
        (
            2,
            "0 3\n6 <a>\t<b>\t?v2\t1\n6 ?v2\t<c>\t<d>\t1\n0 4\n6 <a>\t<b>\t<g>\t1\n6 <g>\t<c>\t<d>\t1\n",
        ),
    ]);
    let collection = PatternCollection::discover(dir.path(), &CorpusLayout::default()).unwrap();
    let parents = domination_parents(&collection, &[], &options()).unwrap();

    assert_eq!(parents.parents(2, "3"), ["1", "2"]);
    assert!(parents.parents(2, "4").is_empty());
    assert!(parents.parents(1, "1").is_empty());
    assert_eq!(parents.len(), 2);
}

#[test]
fn candidates_include_parents_of_selected_patterns() {
    let size_1 = format!(
        "0 20\n6 ?a\t{IS_ATOM}\t{NITROGEN}\t1\n0 21\n6 ?b\t{HAS_BINDING_ATOM}\t?a\t1\n0 22\n6 ?l\t{IS_LIGAND}\t<resource://integreat/p5/ligand/ligand/L1>\t1\n"
    );
    let size_2 = format!(
        "0 10\n6 ?b\t{HAS_BINDING_ATOM}\t?a\t1\n6 ?a\t{IS_ATOM}\t{NITROGEN}\t1\n0 11\n6 ?b\t{HAS_BINDING_ATOM}\t?a\t1\n6 ?a\t{IS_ATOM}\t?e\t1\n"
    );
    let dir = corpus(&[(1, &size_1), (2, &size_2)]);
    let collection = PatternCollection::discover(dir.path(), &CorpusLayout::default()).unwrap();
    let parents = domination_parents(&collection, &[], &options()).unwrap();

    let selection =
        select_candidates(&collection, &ContentRules::default(), &parents, &options()).unwrap();

    assert!(selection.failures.is_empty());
    let ids = |size: usize| {
        selection.selected[&size]
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(2), ["10"]);
    assert_eq!(ids(1), ["20", "21"]);
}

#[test]
fn failed_content_checks_are_reported_without_aborting() {
    let size_1 = format!("0 20\n6 ?a\t{IS_ATOM}\t{NITROGEN}\t1\n");
    let size_2 = format!(
        "0 10\n6 ?b\t{HAS_BINDING_ATOM}\t?a\t1\n6 ?a\t{IS_ATOM}\t{NITROGEN}\t1\n0 11\n6 <a>\t<b>\t?x\t1\n6 ?x\t<c>\t<d>\t1\n"
    );
    let dir = corpus(&[(1, &size_1), (2, &size_2)]);
    let collection = PatternCollection::discover(dir.path(), &CorpusLayout::default()).unwrap();
    let parents = domination_parents(&collection, &[], &options()).unwrap();
    assert_eq!(parents.parents(2, "10"), ["20"]);

    let tight = BatchOptions {
        budget: MatchBudget::steps(1),
        ..options()
    };
    let selection =
        select_candidates(&collection, &ContentRules::default(), &parents, &tight).unwrap();

    let failed = selection
        .failures
        .iter()
        .map(|failure| (failure.size, failure.pattern_id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(failed, [(2, "10")]);
    assert!(selection.selected[&2].is_empty());
    assert!(selection.selected[&1].is_empty());
    assert_eq!(selection.selected_count(), 0);
}
