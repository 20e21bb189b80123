mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;
use txquant_rs::header::read_header;
use txquant_rs::input::{load_clusters, load_transcripts};
use txquant_rs::{
    AlignmentLibrary, Cluster, FragmentKind, LibraryFormat, PairedFragment, QuantConfig, QuantLibrary,
    Transcript, UnpairedFragment, all_headers_consistent, classify_paired, classify_single,
    log_align_format_prob, quantify_to_path,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Initialize tracing subscriber
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        cli::Command::Quant(q) => run_quant(q),
        cli::Command::CheckHeaders(c) => run_check_headers(c),
        cli::Command::Score(s) => run_score(s),
        cli::Command::Classify(c) => run_classify(c),
    }
}

fn run_quant(args: cli::QuantArgs) -> Result<()> {
    let expected: LibraryFormat = args.libtype.parse()?;
    let transcripts = load_transcripts(&args.transcripts)?;
    let clusters = load_clusters(&args.clusters, &transcripts)?;
    let num_mapped_reads = args
        .num_mapped_reads
        .unwrap_or_else(|| clusters.iter().map(|c| c.num_hits).sum());

    let config = QuantConfig {
        no_effective_length_correction: args.no_effective_length_correction,
        ..QuantConfig::default()
    };
    let written = if expected.is_paired() {
        quant_library::<PairedFragment>(transcripts, clusters, num_mapped_reads, expected, &config, &args)?
    } else {
        quant_library::<UnpairedFragment>(transcripts, clusters, num_mapped_reads, expected, &config, &args)?
    };
    tracing::info!(
        transcripts = written,
        num_mapped_reads,
        "txquant-rs: quantification complete"
    );
    Ok(())
}

fn quant_library<F: FragmentKind>(
    transcripts: Vec<Transcript>,
    clusters: Vec<Cluster>,
    num_mapped_reads: u64,
    expected: LibraryFormat,
    config: &QuantConfig,
    args: &cli::QuantArgs,
) -> Result<usize> {
    let mut lib: AlignmentLibrary<F> =
        AlignmentLibrary::new(transcripts, clusters, num_mapped_reads).with_expected_format(expected);
    tracing::info!(
        clusters = lib.clusters().len(),
        libtype = %lib.expected_format(),
        "quantifying alignment library"
    );
    let records = quantify_to_path(&mut lib, config, &args.out, &args.comments)?;
    Ok(records.len())
}

fn run_check_headers(args: cli::CheckHeadersArgs) -> Result<()> {
    let headers = args
        .inputs
        .iter()
        .map(|p| read_header(p))
        .collect::<Result<Vec<_>, _>>()?;
    if !all_headers_consistent(&headers) {
        bail!("reference headers of {} inputs are not consistent", headers.len());
    }
    tracing::info!(inputs = headers.len(), "reference headers are consistent");
    println!("consistent");
    Ok(())
}

fn run_score(args: cli::ScoreArgs) -> Result<()> {
    let observed: LibraryFormat = args.observed.parse()?;
    let expected: LibraryFormat = args.expected.parse()?;
    println!("{}", log_align_format_prob(observed, expected, args.incompat_prior));
    Ok(())
}

fn run_classify(args: cli::ClassifyArgs) -> Result<()> {
    let format = match args.start2 {
        Some(start2) => classify_paired(args.start1, !args.rev1, start2, !args.rev2)?,
        None => classify_single(args.start1, !args.rev1),
    };
    if !format.is_valid() {
        bail!("could not associate a library type with the read");
    }
    println!("{format}");
    Ok(())
}
