//! txquant-rs: turn equivalence-class cluster mass into per-transcript
//! abundances, and score read library formats.
//!
//! # Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use txquant_rs::input::{load_clusters, load_transcripts};
//! use txquant_rs::{AlignmentLibrary, PairedFragment, QuantConfig, quantify_to_path};
//!
//! let transcripts = load_transcripts(Path::new("transcripts.tsv"))?;
//! let clusters = load_clusters(Path::new("clusters.tsv"), &transcripts)?;
//! let num_mapped_reads = clusters.iter().map(|c| c.num_hits).sum();
//! let mut lib: AlignmentLibrary<PairedFragment> =
//!     AlignmentLibrary::new(transcripts, clusters, num_mapped_reads);
//! quantify_to_path(&mut lib, &QuantConfig::default(), Path::new("quant.sf"), &[])?;
//! # Ok::<(), txquant_rs::QuantError>(())
//! ```
//!
//! Logging goes through `tracing`; install whatever subscriber you like
//! (globally or with `tracing::subscriber::with_default`) to collect the
//! warnings emitted for zero-mass clusters and unclassifiable reads.

// Internal modules — not part of the public API.
pub(crate) mod types;

// Public modules — stable API surface.
pub mod abundance;
pub mod cluster;
pub mod compat;
pub mod error;
pub mod header;
pub mod input;
pub mod library;
pub mod library_format;
pub mod math;
pub mod transcript;

mod api;

// Flat re-exports for the most commonly used public types.
pub use abundance::{QuantRecord, compute_abundances, write_abundances};
pub use api::{DEFAULT_INCOMPAT_PRIOR, QuantConfig, quantify, quantify_to_path};
pub use cluster::{Cluster, Projection, project_clusters, project_to_bounds};
pub use compat::log_align_format_prob;
pub use error::QuantError;
pub use header::{all_headers_consistent, headers_are_consistent};
pub use library::{
    AlignmentLibrary, FragmentKind, PairedFragment, QuantLibrary, ReadExperiment, ReadLibrary,
    UnpairedFragment,
};
pub use library_format::{
    LibraryFormat, OrphanStatus, ReadOrientation, ReadStrandedness, ReadType, classify_paired,
    classify_single,
};
pub use transcript::Transcript;
pub use types::{ClusterId, Tid};
