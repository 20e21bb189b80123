//! Tab-separated tables describing the state handed over by the estimation
//! step: one for transcripts, one for clusters.
//!
//! Transcripts (`#` lines and blank lines ignored):
//!
//! ```text
//! name  length  log_eff_length  log_mass  unique_count  total_count
//! ```
//!
//! Clusters:
//!
//! ```text
//! log_mass  num_hits  member1,member2,...
//! ```
//!
//! Log-space columns accept `-inf` for zero and `NA` for "absent": an absent
//! effective length disables correction for that transcript, an absent
//! cluster mass is recomputed from the members. A given cluster mass must
//! equal the log-sum of its members' masses.

use crate::cluster::Cluster;
use crate::error::QuantError;
use crate::math::{LOG_0, log_sum_exp};
use crate::transcript::Transcript;
use crate::types::{HashMap, HashMapExt, Tid};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest accepted log-space gap between a cluster's mass and the summed
/// mass of its members.
const CLUSTER_MASS_TOLERANCE: f64 = 1e-6;

pub fn load_transcripts(path: &Path) -> Result<Vec<Transcript>, QuantError> {
    let mut transcripts = Vec::new();
    for (line_no, fields) in data_lines(path)? {
        let parse_err = |msg: String| QuantError::Parse { path: path.to_path_buf(), line: line_no, msg };
        if fields.len() != 6 {
            return Err(parse_err(format!("expected 6 columns, found {}", fields.len())));
        }
        let id = Tid::try_from(transcripts.len())
            .map_err(|_| parse_err("too many transcripts".to_string()))?;
        let length: u32 = fields[1]
            .parse()
            .map_err(|_| parse_err(format!("invalid length '{}'", fields[1])))?;
        let log_eff_length = parse_log(&fields[2]).map_err(parse_err)?;
        let log_mass = parse_log(&fields[3]).map_err(parse_err)?.unwrap_or(LOG_0);
        let unique: u32 = fields[4]
            .parse()
            .map_err(|_| parse_err(format!("invalid unique count '{}'", fields[4])))?;
        let total: u32 = fields[5]
            .parse()
            .map_err(|_| parse_err(format!("invalid total count '{}'", fields[5])))?;

        let mut t = Transcript::new(id, fields[0].clone(), length)
            .with_counts(unique, total)
            .with_log_mass(log_mass);
        t.log_effective_length = log_eff_length;
        transcripts.push(t);
    }
    tracing::info!(path = %path.display(), transcripts = transcripts.len(), "loaded transcripts");
    Ok(transcripts)
}

pub fn load_clusters(path: &Path, transcripts: &[Transcript]) -> Result<Vec<Cluster>, QuantError> {
    let mut name_to_id: HashMap<&str, Tid> = HashMap::with_capacity(transcripts.len());
    for t in transcripts {
        name_to_id.insert(t.name.as_str(), t.id);
    }

    let mut clusters = Vec::new();
    for (line_no, fields) in data_lines(path)? {
        let parse_err = |msg: String| QuantError::Parse { path: path.to_path_buf(), line: line_no, msg };
        if fields.len() != 3 {
            return Err(parse_err(format!("expected 3 columns, found {}", fields.len())));
        }
        let num_hits: u64 = fields[1]
            .parse()
            .map_err(|_| parse_err(format!("invalid hit count '{}'", fields[1])))?;
        let members = fields[2]
            .split(',')
            .filter(|m| !m.is_empty())
            .map(|m| {
                name_to_id
                    .get(m)
                    .copied()
                    .ok_or_else(|| parse_err(format!("unknown transcript '{m}'")))
            })
            .collect::<Result<Vec<Tid>, QuantError>>()?;
        let member_masses: Vec<f64> = members
            .iter()
            .map(|&tid| transcripts[tid as usize].log_mass)
            .collect();
        let summed = log_sum_exp(&member_masses);
        let log_mass = match parse_log(&fields[0]).map_err(parse_err)? {
            Some(m) if m.is_finite()
                && summed.is_finite()
                && (m - summed).abs() > CLUSTER_MASS_TOLERANCE =>
            {
                return Err(parse_err(format!(
                    "cluster mass {m} does not match its members' summed mass {summed}"
                )));
            }
            Some(m) => m,
            None => summed,
        };
        clusters.push(Cluster::new(members, log_mass, num_hits));
    }
    tracing::info!(path = %path.display(), clusters = clusters.len(), "loaded clusters");
    Ok(clusters)
}

/// Non-comment, non-blank lines split on tabs, with 1-based line numbers.
fn data_lines(path: &Path) -> Result<Vec<(usize, Vec<String>)>, QuantError> {
    let io_err = |source| QuantError::Io { path: path.to_path_buf(), source };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        out.push((idx + 1, trimmed.split('\t').map(str::to_string).collect()));
    }
    Ok(out)
}

fn parse_log(field: &str) -> Result<Option<f64>, String> {
    if field.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let v: f64 = field
        .parse()
        .map_err(|_| format!("invalid log-space value '{field}'"))?;
    if v.is_nan() || v == f64::INFINITY {
        return Err(format!("log-space value must be finite or -inf, got '{field}'"));
    }
    Ok(Some(v))
}
