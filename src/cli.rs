use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "txquant-rs",
    about = "Project cluster mass onto transcripts and report abundances",
    version
)]
pub struct Args {
    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project clusters and write TPM / FPKM / read counts
    Quant(QuantArgs),
    /// Check that SAM/BAM files share the same reference header
    CheckHeaders(CheckHeadersArgs),
    /// Score an observed library type against an expected one
    Score(ScoreArgs),
    /// Classify the library type of a hit from its mate positions and strands
    Classify(ClassifyArgs),
}

#[derive(clap::Args, Debug)]
pub struct QuantArgs {
    /// Transcript table (name, length, log_eff_length, log_mass, unique, total)
    #[arg(short = 't', long = "transcripts", value_name = "TSV")]
    pub transcripts: PathBuf,

    /// Cluster table (log_mass, num_hits, comma-separated members)
    #[arg(short = 'c', long = "clusters", value_name = "TSV")]
    pub clusters: PathBuf,

    /// Output abundance table
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: PathBuf,

    /// Expected library type (e.g. IU, ISR, SF); single-end codes select an
    /// unpaired library
    #[arg(short = 'l', long = "libtype", value_name = "LIBTYPE", default_value = "IU")]
    pub libtype: String,

    /// Total mapped reads (default: sum of cluster hit counts)
    #[arg(short = 'n', long = "num-mapped-reads")]
    pub num_mapped_reads: Option<u64>,

    /// Normalize by reference length instead of effective length
    #[arg(long)]
    pub no_effective_length_correction: bool,

    /// Line written verbatim above the column header (repeatable)
    #[arg(long = "comment", value_name = "TEXT")]
    pub comments: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct CheckHeadersArgs {
    /// SAM or BAM files to compare
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Observed library type (e.g. ISF, SR, U)
    #[arg(long)]
    pub observed: String,

    /// Expected library type (e.g. IU, ISR)
    #[arg(long)]
    pub expected: String,

    /// Log-probability of incompatible formats
    #[arg(long, default_value_t = txquant_rs::DEFAULT_INCOMPAT_PRIOR, allow_negative_numbers = true)]
    pub incompat_prior: f64,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// 0-based start of read 1
    #[arg(long, allow_negative_numbers = true)]
    pub start1: i64,

    /// Read 1 maps to the reverse strand
    #[arg(long)]
    pub rev1: bool,

    /// 0-based start of read 2 (omit for single-end)
    #[arg(long, allow_negative_numbers = true)]
    pub start2: Option<i64>,

    /// Read 2 maps to the reverse strand
    #[arg(long)]
    pub rev2: bool,
}
