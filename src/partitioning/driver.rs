use crate::config::HdrfConfig;
use crate::error::VcError;
use crate::graph::Edge;
use crate::partitioning::stats::PartitioningStats;
use crate::partitioning::{create_strategy, PartitionStrategy, PartitionStrategyType};
use crate::state::{PartitionState, SharedPartitionState};
use crate::util::timer::VcTimer;
use crossbeam_channel::bounded;
use crossbeam_utils::thread;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};

/// Edges handed to a worker at a time.
pub const EDGE_BATCH_SIZE: usize = 1024;
/// Batches buffered per worker between the feeder and the workers.
const BATCHES_PER_WORKER: usize = 4;

/// Result of a partitioning run.
pub struct PartitionOutput {
    pub state: SharedPartitionState,
    pub stats: PartitioningStats,
    pub lock_retries: usize,
}

/// Counters of one call to [`Partitioner::partition_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    /// Edge decisions restarted because of lock contention during this run.
    pub lock_retries: usize,
}

/// Runs a partitioning strategy over an edge stream with a pool of worker threads sharing
/// one partition state.
pub struct Partitioner {
    config: HdrfConfig,
    strategy: Box<dyn PartitionStrategy>,
    batch_size: usize,
}

impl Partitioner {
    pub fn new(config: HdrfConfig) -> Result<Self, VcError> {
        config.validate()?;
        let strategy = create_strategy(PartitionStrategyType::Hdrf, config.clone());
        Ok(Partitioner { config, strategy, batch_size: EDGE_BATCH_SIZE })
    }

    pub fn with_strategy(
        config: HdrfConfig,
        strategy: Box<dyn PartitionStrategy>,
    ) -> Result<Self, VcError> {
        config.validate()?;
        Ok(Partitioner { config, strategy, batch_size: EDGE_BATCH_SIZE })
    }

    /// Sets how many edges a worker takes from the stream at a time. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = std::cmp::max(batch_size, 1);
        self
    }

    /// Partitions `edges` into a fresh state and computes its statistics.
    pub fn partition(&self, edges: &[Edge]) -> Result<PartitionOutput, VcError> {
        let state = SharedPartitionState::new(&self.config);
        let run = self.partition_into(edges, state.as_state())?;
        let stats = PartitioningStats::from_state(state.as_state());
        info!("Partitioning stats: {}", stats);
        Ok(PartitionOutput { state, stats, lock_retries: run.lock_retries })
    }

    /// Streams `edges` to the workers, which commit each edge to `state` exactly once.
    /// Returns the counters of this run, or the first error reported by a worker.
    pub fn partition_into(
        &self,
        edges: &[Edge],
        state: &dyn PartitionState,
    ) -> Result<RunSummary, VcError> {
        let threads = self.config.threads;
        info!(
            "Partitioning {} edges into {} partitions with {} using {} threads \
            (lambda = {}, epsilon = {}, retry limit = {} us)",
            edges.len(),
            self.config.num_partitions,
            self.strategy.name(),
            threads,
            self.config.lambda,
            self.config.epsilon,
            self.config.retry_limit_micros
        );
        let timer = VcTimer::now();
        // Strategy counters are cumulative across runs.
        let retries_before = self.strategy.lock_retries();
        let failed = AtomicBool::new(false);
        let strategy = &*self.strategy;
        let seed = self.config.seed;

        let results = thread::scope(|s| -> Result<Vec<Result<usize, VcError>>, VcError> {
            let (sender, receiver) = bounded::<&[Edge]>(threads * BATCHES_PER_WORKER);

            let mut workers = Vec::with_capacity(threads);
            for worker_id in 0..threads {
                let receiver = receiver.clone();
                let failed = &failed;
                let handle = s
                    .builder()
                    .name(format!("worker-{}", worker_id))
                    .spawn(move |_| -> Result<usize, VcError> {
                        let mut rng = worker_rng(seed, worker_id);
                        let mut processed = 0;
                        for batch in receiver.iter() {
                            if failed.load(Ordering::Relaxed) {
                                break;
                            }
                            for edge in batch {
                                if let Err(e) = strategy.perform_step(edge, state, &mut rng) {
                                    failed.store(true, Ordering::Relaxed);
                                    return Err(e);
                                }
                                processed += 1;
                            }
                        }
                        debug!("Worker {} processed {} edges", worker_id, processed);
                        Ok(processed)
                    })
                    .map_err(|e| {
                        VcError::Generic(format!("Could not spawn worker {}: {}", worker_id, e))
                    })?;
                workers.push(handle);
            }
            drop(receiver);

            for batch in edges.chunks(self.batch_size) {
                if failed.load(Ordering::Relaxed) || sender.send(batch).is_err() {
                    break;
                }
            }
            drop(sender);

            Ok(workers
                .into_iter()
                .enumerate()
                .map(|(worker_id, handle)| {
                    handle.join().unwrap_or(Err(VcError::WorkerPanic(worker_id)))
                })
                .collect::<Vec<_>>())
        })
        .map_err(|_| VcError::Generic("Error ending partitioning scope".to_owned()))??;

        let mut processed = 0;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(count) => processed += count,
                Err(e) => {
                    warn!("Partitioning worker failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        let lock_retries = self.strategy.lock_retries().saturating_sub(retries_before);
        let elapsed = timer.elapsed();
        info!(
            "Partitioned {} edges in {} ({}), {} lock retries",
            processed,
            elapsed.to_seconds_string(),
            elapsed.to_rate_string(processed, "edges"),
            lock_retries
        );
        Ok(RunSummary { processed, lock_retries })
    }
}

/// Random generator owned by one worker, seeded once at worker start.
pub fn worker_rng(seed: Option<u64>, worker_id: usize) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker_id as u64)),
        None => SmallRng::from_entropy(),
    }
}
