use crate::{corpus, graph};
use insta::assert_snapshot;
use motif_corpus::{
    count_matches, BatchOptions, CorpusLayout, MatchCount, PatternCollection, RowOutcome,
};
use motif_engine::{MatchBudget, Matcher, Pattern};
use motif_model::{TargetGraph, Triple};

const CORPUS_1: &str = "0 p1\n1 2\n6 <a>\t<b>\t?v1\t2\n";
const CORPUS_2: &str = "0 p2\n1 1\n6 <a>\t<b>\t?v2\t1\n6 ?v1\t<c>\t<d>\t1\n";

fn graphs() -> Vec<TargetGraph> {
    vec![
        graph(&[("<a>", "<b>", "<x>")]),
        graph(&[("<a>", "<b>", "<x>"), ("<y>", "<c>", "<d>")]),
    ]
}

fn options(workers: usize) -> BatchOptions {
    BatchOptions {
        workers,
        ..BatchOptions::default()
    }
}

#[test]
fn end_to_end_match_table() {
    let dir = corpus(&[(1, CORPUS_1), (2, CORPUS_2)]);
    let collection = PatternCollection::discover(dir.path(), &CorpusLayout::default()).unwrap();
    let entries = collection.entries(&[]);
    let table = count_matches(&entries, &graphs(), &options(2)).unwrap();

    assert_eq!(table.count("p1", 0), Some(MatchCount::Exact(1)));
    assert_eq!(table.count("p1", 1), Some(MatchCount::Exact(1)));
    assert_eq!(table.count("p2", 0), Some(MatchCount::Exact(0)));
    assert_eq!(table.count("p2", 1), Some(MatchCount::Exact(1)));
    assert!(table.failures().is_empty());

    let mut csv = Vec::new();
    let names = ["g1".to_owned(), "g2".to_owned()];
    table.write_csv(&mut csv, Some(&names[..])).unwrap();
    assert_snapshot!(String::from_utf8(csv).unwrap().trim_end(), @r"
graph,p1,p2
g1,1,0
g2,1,1
");
}

#[test]
fn batch_counts_equal_single_counts() {
    let patterns = [
        Pattern::parse([("?x", "<p>", "?y")]).unwrap(),
        Pattern::parse([("?x", "<p>", "?y"), ("?y", "<p>", "?z")]).unwrap(),
        Pattern::parse([("?x", "<p>", "?y"), ("?x", "<p>", "?z")]).unwrap(),
        Pattern::parse([("<a>", "<p>", "?y")]).unwrap(),
    ];
    let ids = ["q0", "q1", "q2", "q3"];
    let entries = ids.iter().copied().zip(patterns.iter()).collect::<Vec<_>>();
    let graphs = vec![
        graph(&[("<a>", "<p>", "<b>"), ("<b>", "<p>", "<c>"), ("<a>", "<p>", "<c>")]),
        graph(&[("<a>", "<p>", "<a>")]),
        graph(&[]),
    ];

    let matcher = Matcher::new(MatchBudget::unlimited());
    for workers in [1, 3, 8] {
        let table = count_matches(&entries, &graphs, &options(workers)).unwrap();
        let row_ids = table.rows().iter().map(|row| row.pattern_id.as_str()).collect::<Vec<_>>();
        assert_eq!(row_ids, ids);
        for (id, pattern) in &entries {
            for (graph_index, graph) in graphs.iter().enumerate() {
                assert_eq!(
                    table.count(id, graph_index),
                    Some(MatchCount::Exact(matcher.count(pattern, graph).unwrap())),
                );
            }
        }
    }
}

#[test]
fn inactive_pairs_are_zero() {
    let pattern = Pattern::parse([("<a>", "<b>", "?v1")]).unwrap();
    let entries = vec![("p1", &pattern)];
    let mut options = options(1);
    options.mark_inactive("p1", 1);

    let table = count_matches(&entries, &graphs(), &options).unwrap();
    assert_eq!(table.count("p1", 0), Some(MatchCount::Exact(1)));
    assert_eq!(table.count("p1", 1), Some(MatchCount::Exact(0)));
}

#[test]
fn exhausted_budget_gives_unknown_counts() {
    let pattern = Pattern::parse([("?x", "<p>", "?y"), ("?y", "<p>", "?z")]).unwrap();
    let entries = vec![("path", &pattern)];
    let graphs = vec![
        graph(&[("<a>", "<p>", "<b>"), ("<b>", "<p>", "<c>"), ("<c>", "<p>", "<d>")]),
        graph(&[("<a>", "<q>", "<b>")]),
    ];
    let options = BatchOptions {
        budget: MatchBudget::steps(2),
        ..options(1)
    };

    let table = count_matches(&entries, &graphs, &options).unwrap();
    assert_eq!(table.count("path", 0), Some(MatchCount::Unknown));
    assert_eq!(table.count("path", 1), Some(MatchCount::Exact(0)));
    assert_eq!(table.unknown_count(), 1);

    let mut csv = Vec::new();
    table.write_csv(&mut csv, None).unwrap();
    assert_snapshot!(String::from_utf8(csv).unwrap().trim_end(), @r"
graph,path
0,NA
1,0
");
}

#[test]
fn unparseable_patterns_are_reported() {
    let wide = (0..=64)
        .map(|i| Triple::parse("<a>", "<p>", &format!("?v{i}")).unwrap())
        .collect::<Pattern>();
    let narrow = Pattern::parse([("<a>", "<b>", "?v1")]).unwrap();
    let entries = vec![("wide", &wide), ("narrow", &narrow)];

    let table = count_matches(&entries, &graphs(), &options(2)).unwrap();
    assert_eq!(table.failures().len(), 1);
    assert_eq!(table.failures()[0].0, "wide");
    assert!(matches!(
        table.row("wide").unwrap().outcome,
        RowOutcome::Unparseable(_)
    ));
    assert_eq!(table.count("wide", 0), None);
    assert_eq!(table.count("narrow", 0), Some(MatchCount::Exact(1)));

    let mut csv = Vec::new();
    table.write_csv(&mut csv, None).unwrap();
    assert_snapshot!(String::from_utf8(csv).unwrap().trim_end(), @r"
graph,narrow
0,1
1,1
");
}
