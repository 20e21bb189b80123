use crate::error::QuantError;
use crate::math::{LOG_0, log_count, safe_exp};
use crate::transcript::Transcript;
use crate::types::{ClusterId, HashSet, HashSetExt, Tid};

/// Overshoot tolerated before a count is considered outside its bounds,
/// relative to the cluster count.
const BOUND_TOLERANCE: f64 = 1e-9;

/// An equivalence-class cluster: transcripts that share a jointly estimated
/// mass and the reads compatible with them.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub members: Vec<Tid>,
    /// Natural-log mass of the whole cluster.
    pub log_mass: f64,
    /// Reads observed for the cluster.
    pub num_hits: u64,
}

/// What [`Cluster::project`] had to do to assign counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The cluster carries no mass; every member got 0.
    ZeroMass,
    /// Proportional shares already respected all bounds.
    Proportional,
    /// Shares were re-projected onto the `[unique, total]` bounds.
    Reprojected,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionStats {
    pub clusters: usize,
    pub zero_mass: usize,
    pub reprojected: usize,
}

impl Cluster {
    pub fn new(members: Vec<Tid>, log_mass: f64, num_hits: u64) -> Self {
        Self { members, log_mass, num_hits }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total count the members must add up to.
    pub fn count(&self) -> f64 {
        self.num_hits as f64
    }

    /// Distribute this cluster's count over its members' `projected_count`.
    ///
    /// Each member first receives its share of the cluster mass. If any share
    /// falls outside the member's `[unique_count, total_count]` range and the
    /// cluster has several members, the shares are re-projected onto those
    /// bounds while keeping their sum equal to [`Cluster::count`].
    pub fn project(
        &self,
        cluster_id: ClusterId,
        transcripts: &mut [Transcript],
    ) -> Result<Projection, QuantError> {
        if let Some(&tid) = self.members.iter().find(|&&t| t as usize >= transcripts.len()) {
            return Err(QuantError::InvariantViolation(format!(
                "cluster {cluster_id} references transcript {tid}, but only {} exist",
                transcripts.len()
            )));
        }

        if self.log_mass == LOG_0 {
            tracing::warn!(cluster = cluster_id, members = self.len(), "cluster has 0 mass");
            for &tid in &self.members {
                transcripts[tid as usize].projected_count = 0.0;
            }
            return Ok(Projection::ZeroMass);
        }

        let count = self.count();
        let log_cluster_count = log_count(count);
        let singleton = self.len() == 1;
        let mut requires_projection = false;

        for &tid in &self.members {
            let t = &mut transcripts[tid as usize];
            if !t.has_mass() {
                t.projected_count = 0.0;
                continue;
            }
            t.projected_count = if singleton {
                count
            } else {
                safe_exp(t.log_mass - self.log_mass + log_cluster_count)
            };
            requires_projection |= t.projected_count > f64::from(t.total_count)
                || t.projected_count < f64::from(t.unique_count);
        }

        if singleton || !requires_projection {
            return Ok(Projection::Proportional);
        }

        let n = self.len();
        let mut weights = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for &tid in &self.members {
            let t = &transcripts[tid as usize];
            weights.push(t.projected_count);
            lower.push(f64::from(t.unique_count));
            upper.push(f64::from(t.total_count.max(t.unique_count)));
        }

        let projected = project_to_bounds(&weights, &lower, &upper, count);
        for (&tid, value) in self.members.iter().zip(projected) {
            transcripts[tid as usize].projected_count = value;
        }
        tracing::debug!(cluster = cluster_id, members = n, "re-projected cluster onto hit bounds");
        Ok(Projection::Reprojected)
    }

    fn projected_sum(&self, transcripts: &[Transcript]) -> f64 {
        self.members
            .iter()
            .map(|&tid| transcripts[tid as usize].projected_count)
            .sum()
    }
}

/// Project every cluster, in order, onto its members.
///
/// Clusters must not share members; each one only writes the
/// `projected_count` of its own transcripts.
pub fn project_clusters(
    clusters: &[Cluster],
    transcripts: &mut [Transcript],
) -> Result<ProjectionStats, QuantError> {
    debug_assert!(
        clusters_are_disjoint(clusters),
        "clusters must partition the transcript set"
    );

    let mut stats = ProjectionStats::default();
    for (cluster_id, cluster) in clusters.iter().enumerate() {
        stats.clusters += 1;
        match cluster.project(cluster_id, transcripts)? {
            Projection::ZeroMass => stats.zero_mass += 1,
            Projection::Reprojected => stats.reprojected += 1,
            Projection::Proportional => {}
        }
        debug_assert!(
            !cluster
                .members
                .iter()
                .any(|&tid| transcripts[tid as usize].has_mass())
                || cluster.log_mass == LOG_0
                || (cluster.projected_sum(transcripts) - cluster.count()).abs()
                    <= 1e-6 * cluster.count().max(1.0),
            "cluster {cluster_id} does not conserve its count"
        );
    }

    tracing::debug!(
        clusters = stats.clusters,
        zero_mass = stats.zero_mass,
        reprojected = stats.reprojected,
        "cluster projection complete"
    );
    Ok(stats)
}

fn clusters_are_disjoint(clusters: &[Cluster]) -> bool {
    let mut seen: HashSet<Tid> = HashSet::new();
    clusters
        .iter()
        .flat_map(|c| c.members.iter())
        .all(|&tid| seen.insert(tid))
}

/// Re-allocate `total` over `weights.len()` slots, proportionally to
/// `weights`, subject to `lower[i] <= x[i] <= upper[i]`.
///
/// Each round spreads the mass not yet pinned over the free slots, then pins
/// the slots violating the side (upper or lower) with the larger total
/// violation to their bound. Every round pins at least one slot. The result
/// always sums to `total`; it respects every bound whenever
/// `Σ lower <= total <= Σ upper`. Otherwise the violated bound vector is
/// scaled to `total`.
pub fn project_to_bounds(weights: &[f64], lower: &[f64], upper: &[f64], total: f64) -> Vec<f64> {
    let n = weights.len();
    debug_assert!(lower.len() == n && upper.len() == n);
    if n == 0 {
        return Vec::new();
    }

    let lower_sum: f64 = lower.iter().sum();
    let upper_sum: f64 = upper.iter().sum();
    if lower_sum > total {
        tracing::warn!(lower_sum, total, "unique counts exceed cluster count; scaling to fit");
        return scale_to(lower, total);
    }
    if upper_sum < total {
        tracing::warn!(upper_sum, total, "total counts fall short of cluster count; scaling to fit");
        return if upper_sum > 0.0 { scale_to(upper, total) } else { scale_to(weights, total) };
    }

    let tol = BOUND_TOLERANCE * total.max(1.0);
    let mut x = vec![0.0; n];
    let mut pinned = vec![false; n];

    loop {
        let free: Vec<usize> = (0..n).filter(|&i| !pinned[i]).collect();
        if free.is_empty() {
            break;
        }

        let pinned_mass: f64 = (0..n).filter(|&i| pinned[i]).map(|i| x[i]).sum();
        let remaining = (total - pinned_mass).max(0.0);
        let free_weight: f64 = free.iter().map(|&i| weights[i].max(0.0)).sum();
        for &i in &free {
            x[i] = if free_weight > 0.0 {
                remaining * weights[i].max(0.0) / free_weight
            } else {
                remaining / free.len() as f64
            };
        }

        let over: f64 = free
            .iter()
            .map(|&i| x[i] - upper[i])
            .filter(|&d| d > tol)
            .sum();
        let under: f64 = free
            .iter()
            .map(|&i| lower[i] - x[i])
            .filter(|&d| d > tol)
            .sum();
        if over == 0.0 && under == 0.0 {
            break;
        }

        for &i in &free {
            if over >= under && x[i] - upper[i] > tol {
                x[i] = upper[i];
                pinned[i] = true;
            } else if over < under && lower[i] - x[i] > tol {
                x[i] = lower[i];
                pinned[i] = true;
            }
        }
    }
    x
}

fn scale_to(values: &[f64], total: f64) -> Vec<f64> {
    let sum: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if sum > 0.0 {
        values.iter().map(|v| v.max(0.0) * total / sum).collect()
    } else {
        vec![total / values.len() as f64; values.len()]
    }
}
