use clap::{ArgAction, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "motif")]
/// Motif command line toolkit for graph pattern corpora
pub struct Args {
    /// Log more details. Repeat for even more.
    ///
    /// The RUST_LOG environment variable takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args)]
pub struct CorpusArgs {
    /// Directory holding one pattern file per size
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub corpus: PathBuf,
    /// Pattern sizes to read
    ///
    /// By default every size found in the directory is read.
    #[arg(short, long, value_delimiter = ',')]
    pub sizes: Vec<usize>,
    /// Name of the pattern files, with `{size}` standing for the pattern size
    #[arg(long, default_value = "output-size-{size}.dat")]
    pub template: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Number of worker threads
    ///
    /// By default one thread per available core is used.
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Maximum number of search steps of a single match or similarity computation
    ///
    /// By default searches are exhaustive.
    #[arg(long)]
    pub max_steps: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count the matches of every pattern of a corpus in a list of target graphs
    Matches {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// RDF files holding the target graphs
        ///
        /// The format is guessed from the file extension.
        #[arg(short, long, num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
        graphs: Vec<PathBuf>,
        #[command(flatten)]
        search: SearchArgs,
        /// CSV file to write the match table to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// List for every pattern the patterns of the previous size that strictly dominate it
    Dominations {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// CSV file to write the parents to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Select the patterns that specify a binding atom, along with their dominating parents
    Curate {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// CSV file to write the selected patterns to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Write a label weight table as JSON
    Weights {
        /// Learn inverse document frequency weights from the corpus
        ///
        /// By default the fixed weights of the transition-metal-complex vocabulary are written.
        #[arg(long, requires = "corpus")]
        learned: bool,
        /// Directory holding one pattern file per size
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        corpus: Option<PathBuf>,
        /// Pattern sizes to read
        #[arg(short, long, value_delimiter = ',')]
        sizes: Vec<usize>,
        /// Name of the pattern files, with `{size}` standing for the pattern size
        #[arg(long, default_value = "output-size-{size}.dat")]
        template: String,
        /// JSON file to write the weights to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Compute the pairwise distances of the patterns of a corpus
    Distances {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// JSON file holding the label weights
        ///
        /// By default the fixed weights of the transition-metal-complex vocabulary are used.
        #[arg(long, value_hint = ValueHint::FilePath)]
        weights: Option<PathBuf>,
        #[command(flatten)]
        search: SearchArgs,
        /// CSV file to write the distance matrix to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Strip the match listings from a pattern file
    ///
    /// The destination is gzip-compressed if its name ends with `.gz`.
    Clean {
        /// Pattern file to read
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Pattern file to write
        #[arg(value_hint = ValueHint::FilePath)]
        destination: PathBuf,
    },
    /// Print the SPARQL query that matches a pattern
    Query {
        /// A triple of the pattern, like "?x <http://example.com/p> <http://example.com/o>"
        #[arg(short, long = "triple", num_args = 1.., required = true)]
        triples: Vec<String>,
        /// Also return the named graph in which every match was found
        #[arg(long)]
        named_graphs: bool,
    },
}
