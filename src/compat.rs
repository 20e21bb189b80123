use crate::library_format::{LibraryFormat, ReadStrandedness, ReadType};
use crate::math::{LOG_0, LOG_1, LOG_ONEHALF, LOG_ORPHAN_PROB};

/// Log-probability that a hit with the `observed` format came from a library
/// of the `expected` format.
///
/// Orphaned ends of a paired-end library are allowed but, for libraries
/// stranded on a single strand, down-weighted to [`LOG_ORPHAN_PROB`].
/// Formats carrying no usable information (see [`LibraryFormat::is_valid`])
/// score `LOG_0` after a warning.
pub fn log_align_format_prob(
    observed: LibraryFormat,
    expected: LibraryFormat,
    incompat_prior: f64,
) -> f64 {
    if !observed.is_valid() || !expected.is_valid() {
        tracing::warn!(
            ?observed,
            ?expected,
            "cannot score alignment format without a usable library type"
        );
        return LOG_0;
    }

    if expected.read_type == ReadType::PairedEnd && observed.read_type == ReadType::SingleEnd {
        return match expected.strandedness {
            ReadStrandedness::U | ReadStrandedness::AS | ReadStrandedness::SA => LOG_1,
            s if s == observed.strandedness => LOG_ORPHAN_PROB,
            _ => incompat_prior,
        };
    }

    if observed.read_type != expected.read_type || observed.orientation != expected.orientation {
        return incompat_prior;
    }

    match expected.strandedness {
        ReadStrandedness::U => LOG_ONEHALF,
        s if s == observed.strandedness => LOG_1,
        _ => incompat_prior,
    }
}
