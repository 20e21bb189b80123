use crate::math::{LOG_0, safe_exp};
use crate::types::Tid;

/// One reference transcript in the shared arena.
///
/// `id` equals the transcript's index in the arena; clusters refer to
/// transcripts only through it.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub id: Tid,
    pub name: String,
    pub length: u32,
    /// Cached effective length, natural-log space. `None` when it was never
    /// computed upstream.
    pub log_effective_length: Option<f64>,
    /// Reads that aligned to this transcript only.
    pub unique_count: u32,
    /// Reads that aligned to this transcript at all.
    pub total_count: u32,
    /// Estimated mass, natural-log space.
    pub log_mass: f64,
    /// Count assigned by cluster projection.
    pub projected_count: f64,
}

impl Transcript {
    pub fn new(id: Tid, name: impl Into<String>, length: u32) -> Self {
        Self {
            id,
            name: name.into(),
            length,
            log_effective_length: None,
            unique_count: 0,
            total_count: 0,
            log_mass: LOG_0,
            projected_count: 0.0,
        }
    }

    pub fn with_effective_length(mut self, log_effective_length: f64) -> Self {
        self.log_effective_length = Some(log_effective_length);
        self
    }

    pub fn with_counts(mut self, unique_count: u32, total_count: u32) -> Self {
        self.unique_count = unique_count;
        self.total_count = total_count;
        self
    }

    pub fn with_log_mass(mut self, log_mass: f64) -> Self {
        self.log_mass = log_mass;
        self
    }

    pub fn has_mass(&self) -> bool {
        self.log_mass != LOG_0
    }

    /// Length used for normalization: the effective length unless correction
    /// is disabled or none was cached.
    pub fn normalization_length(&self, no_effective_length_correction: bool) -> f64 {
        match self.log_effective_length {
            Some(log_len) if !no_effective_length_correction => safe_exp(log_len),
            _ => f64::from(self.length),
        }
    }
}
