//! Public entry points tying projection and abundance emission together.
//!
//! # Example
//!
//! ```no_run
//! use txquant_rs::{AlignmentLibrary, Cluster, PairedFragment, QuantConfig, Transcript, quantify};
//!
//! let transcripts = vec![
//!     Transcript::new(0, "tx0", 1000).with_counts(2, 10).with_log_mass(0.5f64.ln()),
//!     Transcript::new(1, "tx1", 2000).with_counts(0, 10).with_log_mass(0.5f64.ln()),
//! ];
//! let clusters = vec![Cluster::new(vec![0, 1], 0.0, 10)];
//! let mut lib: AlignmentLibrary<PairedFragment> = AlignmentLibrary::new(transcripts, clusters, 10);
//! let records = quantify(&mut lib, &QuantConfig::default())?;
//! # Ok::<(), txquant_rs::QuantError>(())
//! ```

use crate::abundance::{QuantRecord, compute_abundances, write_abundances};
use crate::cluster::project_clusters;
use crate::error::QuantError;
use crate::library::QuantLibrary;
use crate::library_format::LibraryFormat;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// ln(1e-20): score of an alignment whose format contradicts the library.
pub const DEFAULT_INCOMPAT_PRIOR: f64 = -46.051_701_859_880_914;

#[derive(Debug, Clone)]
pub struct QuantConfig {
    /// Normalize by reference length instead of the cached effective length.
    pub no_effective_length_correction: bool,
    /// Log-probability assigned to format-incompatible alignments.
    pub incompat_prior: f64,
}

impl Default for QuantConfig {
    fn default() -> Self {
        Self {
            no_effective_length_correction: false,
            incompat_prior: DEFAULT_INCOMPAT_PRIOR,
        }
    }
}

impl QuantConfig {
    /// Score an observed alignment format against the library's expected one.
    pub fn score_format<L: QuantLibrary + ?Sized>(&self, lib: &L, observed: LibraryFormat) -> f64 {
        crate::compat::log_align_format_prob(observed, lib.expected_format(), self.incompat_prior)
    }
}

/// Project every cluster of `lib` onto its transcripts, then compute
/// abundances for all transcripts in arena order.
pub fn quantify<L: QuantLibrary>(lib: &mut L, config: &QuantConfig) -> Result<Vec<QuantRecord>, QuantError> {
    let (clusters, transcripts) = lib.clusters_and_transcripts_mut();
    let stats = project_clusters(clusters, transcripts)?;
    tracing::info!(
        clusters = stats.clusters,
        zero_mass = stats.zero_mass,
        reprojected = stats.reprojected,
        "projected cluster counts"
    );
    Ok(compute_abundances(
        lib.transcripts(),
        lib.num_mapped_reads(),
        config.no_effective_length_correction,
    ))
}

/// [`quantify`] and write the result to `path`.
///
/// Failing to create or write the output is returned as [`QuantError::Io`].
pub fn quantify_to_path<L: QuantLibrary>(
    lib: &mut L,
    config: &QuantConfig,
    path: &Path,
    header_comments: &[String],
) -> Result<Vec<QuantRecord>, QuantError> {
    let records = quantify(lib, config)?;
    let io_err = |source| QuantError::Io { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(io_err)?;
    write_abundances(BufWriter::new(file), header_comments, &records).map_err(io_err)?;
    tracing::info!(path = %path.display(), transcripts = records.len(), "wrote abundances");
    Ok(records)
}
