use crate::math::{LOG_BILLION, MILLION, safe_exp};
use crate::transcript::Transcript;
use std::io::Write;

pub const COLUMN_HEADER: &str = "Name\tLength\tTPM\tFPKM\tNumReads";

/// Per-transcript abundance line.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantRecord {
    pub name: String,
    pub length: u32,
    pub tpm: f64,
    pub fpkm: f64,
    pub num_reads: f64,
}

/// Turn projected counts into TPM / FPKM.
///
/// Two passes over the arena: the first accumulates the length-normalized
/// read fraction used as TPM denominator, the second emits one record per
/// transcript in arena order. Degenerate inputs (no mapped reads, zero
/// lengths, all-zero counts) give zeros, never NaN or infinities.
pub fn compute_abundances(
    transcripts: &[Transcript],
    num_mapped_reads: u64,
    no_effective_length_correction: bool,
) -> Vec<QuantRecord> {
    let num_reads = num_mapped_reads as f64;
    let log_num_fragments = if num_reads > 0.0 { num_reads.ln() } else { f64::INFINITY };

    let reads_per_base = |t: &Transcript, length: f64| -> f64 {
        if num_reads > 0.0 && length > 0.0 && length.is_finite() {
            (t.projected_count / num_reads) / length
        } else {
            0.0
        }
    };

    let tfrac_denom: f64 = transcripts
        .iter()
        .map(|t| reads_per_base(t, t.normalization_length(no_effective_length_correction)))
        .sum();

    transcripts
        .iter()
        .map(|t| {
            let length = t.normalization_length(no_effective_length_correction);
            let count = t.projected_count;
            let fpkm = if count > 0.0 && length > 0.0 {
                safe_exp(LOG_BILLION - length.ln() - log_num_fragments) * count
            } else {
                0.0
            };
            let tpm = if tfrac_denom > 0.0 {
                reads_per_base(t, length) / tfrac_denom * MILLION
            } else {
                0.0
            };
            QuantRecord {
                name: t.name.clone(),
                length: t.length,
                tpm,
                fpkm,
                num_reads: count,
            }
        })
        .collect()
}

/// Write `header_comments` verbatim, one per line, followed by the
/// abundance table.
pub fn write_abundances<W: Write>(
    mut writer: W,
    header_comments: &[String],
    records: &[QuantRecord],
) -> std::io::Result<()> {
    for line in header_comments {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer, "{COLUMN_HEADER}")?;
    for r in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            r.name, r.length, r.tpm, r.fpkm, r.num_reads
        )?;
    }
    writer.flush()
}
