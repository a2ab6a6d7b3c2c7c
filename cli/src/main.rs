use crate::cli::{Args, Command, CorpusArgs, SearchArgs};
use anyhow::{bail, Context};
use clap::Parser;
use motif::corpus::{
    clean_corpus_file, count_matches, domination_parents, select_candidates, BatchOptions,
    CorpusLayout, PatternCollection,
};
use motif::engine::{ContentRules, MatchBudget, Pattern, QueryForm};
use motif::io::load_target_graph;
use motif::model::Triple;
use motif::similarity::{
    CompressedPatternGraph, CompressionRules, DistanceMatrix, LabelHierarchy, LabelWeights,
    SearchBudget,
};
use std::fs::File;
use std::io::{self, stdout, BufReader, BufWriter, Write};
use std::path::Path;
use std::thread::available_parallelism;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    match args.command {
        Command::Matches {
            corpus,
            graphs,
            search,
            out,
        } => {
            let collection = load_collection(&corpus)?;
            let names = graphs.iter().map(|path| graph_name(path)).collect::<Vec<_>>();
            let graphs = graphs
                .iter()
                .map(|path| {
                    load_target_graph(path)
                        .with_context(|| format!("Failed to load the graph {}", path.display()))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let table = count_matches(&collection.entries(&[]), &graphs, &batch_options(&search))?;
            for (id, reason) in table.failures() {
                warn!("Pattern {id} was skipped: {reason}");
            }
            let mut out = output(out.as_deref())?;
            table.write_csv(&mut out, Some(names.as_slice()))?;
            out.flush()?;
            Ok(())
        }
        Command::Dominations {
            corpus,
            search,
            out,
        } => {
            let collection = load_collection(&corpus)?;
            let parents = domination_parents(&collection, &[], &batch_options(&search))?;

            let mut writer = csv::Writer::from_writer(output(out.as_deref())?);
            writer.write_record(["size", "pattern", "parent"])?;
            for (size, id, parents) in parents.iter() {
                for parent in parents {
                    writer.write_record([size.to_string().as_str(), id, parent.as_str()])?;
                }
            }
            writer.flush()?;
            Ok(())
        }
        Command::Curate {
            corpus,
            search,
            out,
        } => {
            let collection = load_collection(&corpus)?;
            let options = batch_options(&search);
            let parents = domination_parents(&collection, &[], &options)?;
            let selection =
                select_candidates(&collection, &ContentRules::default(), &parents, &options)?;

            let mut writer = csv::Writer::from_writer(output(out.as_deref())?);
            writer.write_record(["size", "pattern"])?;
            for (size, ids) in &selection.selected {
                for id in ids {
                    writer.write_record([size.to_string().as_str(), id.as_str()])?;
                }
            }
            writer.flush()?;
            if !selection.failures.is_empty() {
                let ids = selection
                    .failures
                    .iter()
                    .map(|failure| format!("{}/{}", failure.size, failure.pattern_id))
                    .collect::<Vec<_>>();
                warn!(
                    "The content of {} patterns could not be checked: {}",
                    ids.len(),
                    ids.join(", ")
                );
            }
            info!(
                "Selected {} of {} patterns",
                selection.selected_count(),
                collection.pattern_count()
            );
            Ok(())
        }
        Command::Weights {
            learned,
            corpus,
            sizes,
            template,
            out,
        } => {
            let weights = if learned {
                let Some(corpus) = corpus else {
                    bail!("The --corpus option must be set to learn weights")
                };
                let collection = load_corpus(&corpus, &sizes, &template)?;
                LabelWeights::idf(&compress(&collection), &LabelHierarchy::tmc())?
            } else {
                LabelWeights::tmc_fixed()
            };
            let mut out = output(out.as_deref())?;
            weights.to_json(&mut out)?;
            writeln!(out)?;
            out.flush()?;
            Ok(())
        }
        Command::Distances {
            corpus,
            weights,
            search,
            out,
        } => {
            let collection = load_collection(&corpus)?;
            let weights = match weights {
                Some(path) => read_weights(&path)?,
                None => LabelWeights::tmc_fixed(),
            };
            let labels = collection
                .entries(&[])
                .into_iter()
                .map(|(id, _)| id.to_owned())
                .collect::<Vec<_>>();
            let workers = search
                .workers
                .unwrap_or_else(|| available_parallelism().map_or(1, usize::from));
            let budget = SearchBudget {
                max_steps: search.max_steps,
            };

            let matrix = DistanceMatrix::compute(&compress(&collection), &weights, &budget, workers)?;
            let mut out = output(out.as_deref())?;
            matrix.write_csv(&mut out, &labels)?;
            out.flush()?;
            Ok(())
        }
        Command::Clean {
            source,
            destination,
        } => {
            if source == destination {
                bail!("The source and the destination must be different files")
            }
            clean_corpus_file(&source, &destination)
                .with_context(|| format!("Failed to clean {}", source.display()))?;
            Ok(())
        }
        Command::Query {
            triples,
            named_graphs,
        } => {
            let pattern = triples
                .iter()
                .map(|triple| parse_triple(triple))
                .collect::<anyhow::Result<Pattern>>()?;
            let form = if named_graphs {
                QueryForm::NamedGraphs
            } else {
                QueryForm::Plain
            };
            let query = pattern.to_sparql(form)?;
            let mut out = stdout().lock();
            writeln!(out, "{query}")?;
            out.flush()?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn load_collection(args: &CorpusArgs) -> anyhow::Result<PatternCollection> {
    load_corpus(&args.corpus, &args.sizes, &args.template)
}

fn load_corpus(directory: &Path, sizes: &[usize], template: &str) -> anyhow::Result<PatternCollection> {
    let layout = CorpusLayout::new(template)?;
    let collection = if sizes.is_empty() {
        PatternCollection::discover(directory, &layout)
    } else {
        PatternCollection::load(directory, sizes, &layout)
    }
    .with_context(|| format!("Failed to read the corpus in {}", directory.display()))?;
    if collection.is_empty() {
        bail!(
            "No file named like '{template}' was found in {}",
            directory.display()
        )
    }
    Ok(collection)
}

fn compress(collection: &PatternCollection) -> Vec<CompressedPatternGraph> {
    let rules = CompressionRules::tmc();
    collection
        .entries(&[])
        .into_iter()
        .map(|(_, pattern)| CompressedPatternGraph::compress(pattern, &rules))
        .collect()
}

fn batch_options(search: &SearchArgs) -> BatchOptions {
    let mut options = BatchOptions {
        budget: MatchBudget {
            max_steps: search.max_steps,
        },
        ..BatchOptions::default()
    };
    if let Some(workers) = search.workers {
        options.workers = workers;
    }
    options
}

fn read_weights(path: &Path) -> anyhow::Result<LabelWeights> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    LabelWeights::from_json(BufReader::new(file))
        .with_context(|| format!("Invalid weight file {}", path.display()))
}

/// Parses a whitespace separated triple like `?x <p> <o>`.
fn parse_triple(text: &str) -> anyhow::Result<Triple> {
    let parts = text.split_whitespace().collect::<Vec<_>>();
    Triple::from_parts(&parts).with_context(|| format!("Invalid triple '{text}'"))
}

/// The file name of a graph without its extension.
fn graph_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(stdout().lock()),
    })
}
