use crate::config::HdrfConfig;
use crate::error::VcError;
use crate::graph::{Edge, PartitionId};
use crate::partitioning::locking::{lock_endpoints, EndpointLocks};
use crate::partitioning::scoring::{score_partitions, tie_candidates};
use crate::partitioning::PartitionStrategy;
use crate::state::record::VertexData;
use crate::state::{PartitionState, VertexLoadTracking};
use log::trace;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::sync::atomic::{AtomicUsize, Ordering};

/// High-Degree Replicated First vertex-cut partitioning
/// (<https://www.fabiopetroni.com/Download/petroni2015HDRF.pdf>).
///
/// Each edge goes to the partition maximizing a score that prefers partitions already
/// holding a replica of the lower degree endpoint and, weighted by `lambda`, partitions with
/// less edge load. One `Hdrf` is shared by every worker of a run.
#[derive(Debug)]
pub struct Hdrf {
    config: HdrfConfig,
    lock_retries: AtomicUsize,
}

impl Hdrf {
    pub fn new(config: HdrfConfig) -> Self {
        Hdrf { config, lock_retries: AtomicUsize::new(0) }
    }

    fn select_partition(
        &self,
        u: &VertexData,
        v: &VertexData,
        state: &dyn PartitionState,
        rng: &mut dyn RngCore,
    ) -> Result<PartitionId, VcError> {
        // One snapshot, so that min_load <= load(m) <= max_load holds within a decision.
        let loads = state.machine_loads();
        let scores = score_partitions(u, v, &loads, self.config.lambda, self.config.epsilon)?;
        let candidates = tie_candidates(&scores);
        candidates.choose(rng).copied().ok_or_else(|| {
            VcError::InvariantViolation(format!(
                "No candidate partition among {} partitions, scores = {:?}",
                loads.len(),
                scores
            ))
        })
    }
}

impl PartitionStrategy for Hdrf {
    fn name(&self) -> &'static str {
        "hdrf"
    }

    fn lock_retries(&self) -> usize {
        self.lock_retries.load(Ordering::Relaxed)
    }

    fn perform_step(
        &self,
        edge: &Edge,
        state: &dyn PartitionState,
        rng: &mut dyn RngCore,
    ) -> Result<PartitionId, VcError> {
        let (low, high) = if edge.source() <= edge.target() {
            (edge.source(), edge.target())
        } else {
            (edge.target(), edge.source())
        };
        let first = state.get_record(low);
        let second = if edge.is_self_loop() { None } else { Some(state.get_record(high)) };
        let tracker = state.vertex_load_tracking();

        loop {
            match lock_endpoints(&first, second.as_deref(), self.config.retry_limit_micros) {
                Some(EndpointLocks::SelfLoop(mut guard)) => {
                    let partition = self.select_partition(&guard, &guard, state, rng)?;
                    add_replica(&mut guard, partition, tracker);
                    state.increment_machine_load(partition, edge);
                    guard.increment_degree();
                    guard.increment_degree();
                    return Ok(partition);
                }
                Some(EndpointLocks::Pair(mut first_guard, mut second_guard)) => {
                    let partition =
                        self.select_partition(&first_guard, &second_guard, state, rng)?;
                    add_replica(&mut first_guard, partition, tracker);
                    add_replica(&mut second_guard, partition, tracker);
                    state.increment_machine_load(partition, edge);
                    first_guard.increment_degree();
                    second_guard.increment_degree();
                    return Ok(partition);
                }
                None => {
                    self.lock_retries.fetch_add(1, Ordering::Relaxed);
                    trace!("Lock on vertex {} timed out, retrying edge ({}, {})", high, low, high);
                }
            }
        }
    }
}

fn add_replica(
    data: &mut VertexData,
    partition: PartitionId,
    tracker: Option<&dyn VertexLoadTracking>,
) {
    if data.add_partition(partition) {
        if let Some(tracker) = tracker {
            tracker.increment_machine_load_vertices(partition);
        }
    }
}
