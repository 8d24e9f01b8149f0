//! HDRF scoring. For an edge `(u, v)` and partition `m`:
//!
//! `score(m) = g(u, m) + g(v, m) + lambda * bal(m)`
//!
//! where `g(x, m)` rewards partitions that already replicate `x`, more so for the lower degree
//! endpoint, and `bal(m)` rewards partitions below the current maximum edge load.

use crate::error::VcError;
use crate::graph::PartitionId;
use crate::state::record::VertexData;

/// `0` without a replica in the partition, otherwise `1 + (1 - degree / degree_sum)`.
#[allow(clippy::cast_precision_loss)]
#[inline]
pub fn replication_score(has_replica: bool, degree: usize, degree_sum: usize) -> f64 {
    if !has_replica {
        return 0.0;
    }
    let normalized_degree = degree as f64 / degree_sum as f64;
    1.0 + (1.0 - normalized_degree)
}

/// `max(0, (max_load - load) / (epsilon + max_load - min_load))`, in `[0, 1]` whenever
/// `min_load <= load <= max_load`.
#[allow(clippy::cast_precision_loss)]
#[inline]
pub fn balance_score(load: usize, min_load: usize, max_load: usize, epsilon: f64) -> f64 {
    let numerator = max_load as f64 - load as f64;
    let denominator = epsilon + max_load as f64 - min_load as f64;
    let balance = numerator / denominator;
    if balance < 0.0 {
        0.0
    } else {
        balance
    }
}

/// Scores every partition for an edge whose endpoints currently hold `u` and `v`. The
/// degrees count the edge being placed. For a self loop pass the same data twice.
pub fn score_partitions(
    u: &VertexData,
    v: &VertexData,
    loads: &[usize],
    lambda: f64,
    epsilon: f64,
) -> Result<Vec<f64>, VcError> {
    let degree_u = u.degree() + 1;
    let degree_v = v.degree() + 1;
    let degree_sum = degree_u + degree_v;
    let min_load = loads.iter().copied().min().unwrap_or(0);
    let max_load = loads.iter().copied().max().unwrap_or(0);

    let mut scores = Vec::with_capacity(loads.len());
    for (partition, &load) in loads.iter().enumerate() {
        let fu = replication_score(u.has_replica_in_partition(partition), degree_u, degree_sum);
        let fv = replication_score(v.has_replica_in_partition(partition), degree_v, degree_sum);
        let bal = balance_score(load, min_load, max_load, epsilon);
        let score = fu + fv + lambda * bal;
        if score < 0.0 || score.is_nan() {
            return Err(VcError::InvariantViolation(format!(
                "Score of partition {} is {} (fu = {}, fv = {}, lambda = {}, bal = {})",
                partition, score, fu, fv, lambda, bal
            )));
        }
        scores.push(score);
    }
    Ok(scores)
}

/// Partitions whose score equals the maximum score. Ties are compared exactly.
#[allow(clippy::float_cmp)]
pub fn tie_candidates(scores: &[f64]) -> Vec<PartitionId> {
    let mut max_score = 0.0;
    let mut candidates = Vec::new();
    for (partition, &score) in scores.iter().enumerate() {
        if score > max_score {
            max_score = score;
            candidates.clear();
            candidates.push(partition);
        } else if score == max_score {
            candidates.push(partition);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use crate::partitioning::scoring::{
        balance_score, replication_score, score_partitions, tie_candidates,
    };
    use crate::state::record::VertexRecord;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn replication_favors_low_degree() {
        assert!(replication_score(false, 5, 10).abs() < TOLERANCE);
        // The lower degree endpoint gets the larger bonus.
        let low = replication_score(true, 1, 10);
        let high = replication_score(true, 9, 10);
        assert!((low - 1.9).abs() < TOLERANCE);
        assert!((high - 1.1).abs() < TOLERANCE);
        assert!(low > high);
    }

    #[test]
    fn balance_is_bounded() {
        for epsilon in &[1e-6, 0.5, 1.0, 10.0] {
            for min_load in 0..6 {
                for max_load in min_load..12 {
                    for load in min_load..=max_load {
                        let bal = balance_score(load, min_load, max_load, *epsilon);
                        assert!((0.0..=1.0).contains(&bal), "bal = {} out of range", bal);
                    }
                }
            }
        }
        // A partition above the observed maximum is clamped to zero.
        assert!(balance_score(7, 0, 5, 1.0).abs() < TOLERANCE);
        assert!((balance_score(0, 0, 3, 1.0) - 0.75).abs() < TOLERANCE);
        assert!(balance_score(0, 0, 0, 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn scores_never_negative() {
        let u = VertexRecord::default();
        let v = VertexRecord::default();
        {
            let mut guard = u.lock();
            for _ in 0..4 {
                guard.increment_degree();
            }
            guard.add_partition(0);
            guard.add_partition(2);
            v.lock().add_partition(2);
        }
        let (u, v) = (u.snapshot(), v.snapshot());
        for lambda in &[0.0, 0.5, 1.0, 3.0] {
            for loads in &[vec![0, 0, 0], vec![3, 1, 7], vec![10, 10, 0]] {
                let scores = score_partitions(&u, &v, loads, *lambda, 1.0).expect("Valid scores");
                assert_eq!(scores.len(), 3);
                assert!(scores.iter().all(|score| *score >= 0.0));
            }
        }
    }

    #[test]
    fn nan_score_is_invariant_violation() {
        let data = VertexRecord::default().snapshot();
        let result = score_partitions(&data, &data, &[0, 1], f64::NAN, 1.0);
        assert!(result.expect_err("NaN must be rejected").is_invariant_violation());
    }

    #[test]
    fn second_edge_prefers_existing_replica() {
        // Vertex 1 has degree 1 and a replica on partition 0, vertex 3 is new.
        let u = VertexRecord::default();
        {
            let mut guard = u.lock();
            guard.increment_degree();
            guard.add_partition(0);
        }
        let u = u.snapshot();
        let v = VertexRecord::default().snapshot();

        let scores = score_partitions(&u, &v, &[1, 0], 1.0, 1.0).expect("Valid scores");
        assert!((scores[0] - (1.0 + (1.0 - 2.0 / 3.0))).abs() < TOLERANCE);
        assert!((scores[1] - 0.5).abs() < TOLERANCE);
        assert_eq!(tie_candidates(&scores), vec![0]);
    }

    #[test]
    fn zero_lambda_replication_dominates() {
        let u = VertexRecord::default();
        u.lock().add_partition(1);
        let u = u.snapshot();
        let v = VertexRecord::default().snapshot();

        // Partition 1 is by far the most loaded, but balance has no weight.
        let scores = score_partitions(&u, &v, &[0, 100, 0, 0], 0.0, 1.0).expect("Valid scores");
        assert!(scores[1] > 0.0);
        assert_eq!(tie_candidates(&scores), vec![1]);
    }

    #[test]
    fn ties() {
        assert_eq!(tie_candidates(&[0.0, 0.0, 0.0]), vec![0, 1, 2]);
        assert_eq!(tie_candidates(&[0.5, 1.5, 1.5, 0.2]), vec![1, 2]);
        assert_eq!(tie_candidates(&[2.0, 1.0]), vec![0]);
        assert!(tie_candidates(&[]).is_empty());
    }
}
