mod common;

use common::{approx_eq, capture_logs};
use proptest::prelude::*;
use txquant_rs::math::LOG_0;
use txquant_rs::{Cluster, Projection, Transcript, project_clusters, project_to_bounds};

/// Transcripts whose log-masses are the normalized `weights`, so a cluster
/// over all of them has log-mass 0.
fn transcripts_from(weights: &[f64], bounds: &[(u32, u32)]) -> Vec<Transcript> {
    let sum: f64 = weights.iter().sum();
    weights
        .iter()
        .zip(bounds)
        .enumerate()
        .map(|(i, (&w, &(unique, total)))| {
            let log_mass = if w > 0.0 { (w / sum).ln() } else { LOG_0 };
            Transcript::new(i as u32, format!("tx{i}"), 1000)
                .with_counts(unique, total)
                .with_log_mass(log_mass)
        })
        .collect()
}

fn projected(ts: &[Transcript]) -> Vec<f64> {
    ts.iter().map(|t| t.projected_count).collect()
}

#[test]
fn proportional_shares_within_bounds_are_kept() {
    let mut ts = transcripts_from(&[1.0, 3.0], &[(0, 100), (0, 100)]);
    let cluster = Cluster::new(vec![0, 1], 0.0, 100);
    let outcome = cluster.project(0, &mut ts).unwrap();
    assert_eq!(outcome, Projection::Proportional);
    let counts = projected(&ts);
    assert!(approx_eq(counts[0], 25.0, 1e-9), "{counts:?}");
    assert!(approx_eq(counts[1], 75.0, 1e-9), "{counts:?}");
}

#[test]
fn share_above_total_hits_is_capped_and_excess_moved() {
    let mut ts = transcripts_from(&[0.9, 0.1], &[(0, 60), (10, 100)]);
    let cluster = Cluster::new(vec![0, 1], 0.0, 100);
    assert_eq!(cluster.project(0, &mut ts).unwrap(), Projection::Reprojected);
    let counts = projected(&ts);
    assert!(approx_eq(counts[0], 60.0, 1e-9), "{counts:?}");
    assert!(approx_eq(counts[1], 40.0, 1e-9), "{counts:?}");
}

#[test]
fn share_below_unique_hits_is_raised() {
    let mut ts = transcripts_from(&[0.95, 0.05], &[(0, 100), (20, 100)]);
    let cluster = Cluster::new(vec![0, 1], 0.0, 100);
    assert_eq!(cluster.project(0, &mut ts).unwrap(), Projection::Reprojected);
    let counts = projected(&ts);
    assert!(approx_eq(counts[0], 80.0, 1e-9), "{counts:?}");
    assert!(approx_eq(counts[1], 20.0, 1e-9), "{counts:?}");
}

#[test]
fn singleton_takes_the_whole_count_without_reprojection() {
    // Bounds are violated, but a lone member has nowhere to move mass to.
    let mut ts = transcripts_from(&[1.0], &[(0, 5)]);
    let cluster = Cluster::new(vec![0], 0.0, 100);
    assert_eq!(cluster.project(0, &mut ts).unwrap(), Projection::Proportional);
    assert_eq!(ts[0].projected_count, 100.0);
}

#[test]
fn massless_member_gets_zero() {
    let mut ts = transcripts_from(&[1.0, 0.0], &[(0, 100), (0, 100)]);
    let cluster = Cluster::new(vec![0, 1], 0.0, 40);
    cluster.project(0, &mut ts).unwrap();
    assert!(approx_eq(ts[0].projected_count, 40.0, 1e-9));
    assert_eq!(ts[1].projected_count, 0.0);
}

#[test]
fn zero_mass_cluster_warns_and_zeroes_members() {
    let mut ts = transcripts_from(&[1.0, 1.0], &[(0, 10), (0, 10)]);
    for t in &mut ts {
        t.projected_count = 7.0;
        t.log_mass = LOG_0;
    }
    let cluster = Cluster::new(vec![0, 1], LOG_0, 10);
    let (outcome, logs) = capture_logs(|| cluster.project(3, &mut ts));
    assert_eq!(outcome.unwrap(), Projection::ZeroMass);
    assert_eq!(projected(&ts), vec![0.0, 0.0]);
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("cluster has 0 mass"), "logs: {logs}");
    assert!(logs.contains("cluster=3"), "logs: {logs}");
}

#[test]
fn member_outside_arena_is_rejected() {
    let mut ts = transcripts_from(&[1.0], &[(0, 10)]);
    let cluster = Cluster::new(vec![0, 5], 0.0, 10);
    let err = cluster.project(0, &mut ts).unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn project_clusters_handles_every_cluster_and_reports_stats() {
    let mut ts = transcripts_from(&[0.9, 0.1, 1.0, 1.0], &[(0, 60), (10, 100), (0, 50), (0, 0)]);
    // Cluster 0 over tx0/tx1, cluster 1 over tx2 alone, cluster 2 over tx3 with no mass.
    ts[0].log_mass = 0.9f64.ln();
    ts[1].log_mass = 0.1f64.ln();
    ts[2].log_mass = 0.0;
    ts[3].log_mass = LOG_0;
    let clusters = vec![
        Cluster::new(vec![0, 1], 0.0, 100),
        Cluster::new(vec![2], 0.0, 30),
        Cluster::new(vec![3], LOG_0, 0),
    ];
    let (stats, _logs) = capture_logs(|| project_clusters(&clusters, &mut ts));
    let stats = stats.unwrap();
    assert_eq!(stats.clusters, 3);
    assert_eq!(stats.reprojected, 1);
    assert_eq!(stats.zero_mass, 1);
    let counts = projected(&ts);
    assert!(approx_eq(counts[0] + counts[1], 100.0, 1e-9));
    assert_eq!(counts[2], 30.0);
    assert_eq!(counts[3], 0.0);
}

#[test]
fn infeasible_bounds_still_conserve_the_count() {
    // Unique counts alone exceed the cluster count.
    let (x, logs) = capture_logs(|| project_to_bounds(&[1.0, 1.0], &[30.0, 10.0], &[40.0, 40.0], 20.0));
    assert!(approx_eq(x.iter().sum::<f64>(), 20.0, 1e-9));
    assert!(approx_eq(x[0], 15.0, 1e-9) && approx_eq(x[1], 5.0, 1e-9), "{x:?}");
    assert!(logs.contains("WARN"), "logs: {logs}");
}

#[test]
fn zero_weights_are_spread_uniformly() {
    let x = project_to_bounds(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[10.0, 10.0, 10.0], 9.0);
    for v in x {
        assert!(approx_eq(v, 3.0, 1e-12));
    }
}

fn bounds_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<(u32, u32)>, f64)> {
    (2usize..7)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0.01f64..10.0, n),
                prop::collection::vec((0u32..20, 0u32..50), n),
                0.0f64..=1.0,
            )
        })
        .prop_map(|(weights, raw, frac)| {
            let bounds: Vec<(u32, u32)> = raw.into_iter().map(|(u, extra)| (u, u + extra)).collect();
            (weights, bounds, frac)
        })
}

proptest! {
    #[test]
    fn prop_bounded_projection_conserves_and_stays_feasible(
        (weights, bounds, frac) in bounds_strategy()
    ) {
        let lower: Vec<f64> = bounds.iter().map(|&(u, _)| f64::from(u)).collect();
        let upper: Vec<f64> = bounds.iter().map(|&(_, t)| f64::from(t)).collect();
        let lo: f64 = lower.iter().sum();
        let hi: f64 = upper.iter().sum();
        let total = lo + frac * (hi - lo);

        let x = project_to_bounds(&weights, &lower, &upper, total);
        let tol = 1e-6 * total.max(1.0);
        prop_assert!((x.iter().sum::<f64>() - total).abs() <= tol, "sum {} != {}", x.iter().sum::<f64>(), total);
        for i in 0..x.len() {
            prop_assert!(x[i] >= lower[i] - tol && x[i] <= upper[i] + tol,
                "slot {} = {} outside [{}, {}]", i, x[i], lower[i], upper[i]);
        }
    }

    #[test]
    fn prop_cluster_projection_conserves_hit_count(
        (weights, bounds, frac) in bounds_strategy()
    ) {
        let lo: u64 = bounds.iter().map(|&(u, _)| u64::from(u)).sum();
        let hi: u64 = bounds.iter().map(|&(_, t)| u64::from(t)).sum();
        let num_hits = lo + ((hi - lo) as f64 * frac).floor() as u64;

        let mut ts = transcripts_from(&weights, &bounds);
        let members: Vec<u32> = (0..ts.len() as u32).collect();
        let cluster = Cluster::new(members, 0.0, num_hits);
        cluster.project(0, &mut ts).unwrap();

        let tol = 1e-6 * (num_hits as f64).max(1.0);
        let sum: f64 = ts.iter().map(|t| t.projected_count).sum();
        prop_assert!((sum - num_hits as f64).abs() <= tol, "sum {} != {}", sum, num_hits);
        for t in &ts {
            prop_assert!(t.projected_count >= f64::from(t.unique_count) - tol);
            prop_assert!(t.projected_count <= f64::from(t.total_count) + tol);
        }
    }
}
