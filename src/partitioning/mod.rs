use crate::config::HdrfConfig;
use crate::error::VcError;
use crate::graph::{Edge, PartitionId};
use crate::partitioning::hdrf::Hdrf;
use crate::state::PartitionState;
use rand::RngCore;

pub mod driver;
pub mod hdrf;
pub mod locking;
pub mod output;
pub mod scoring;
pub mod stats;

/// A streaming edge partitioning strategy. Implementations are shared by all workers of a
/// run, each worker passing its own random generator.
pub trait PartitionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Assigns `edge` to one partition and commits the assignment to `state`.
    fn perform_step(
        &self,
        edge: &Edge,
        state: &dyn PartitionState,
        rng: &mut dyn RngCore,
    ) -> Result<PartitionId, VcError>;

    /// Number of edge decisions restarted because of lock contention.
    fn lock_retries(&self) -> usize {
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartitionStrategyType {
    Hdrf,
}

pub fn create_strategy(
    strategy_type: PartitionStrategyType,
    config: HdrfConfig,
) -> Box<dyn PartitionStrategy> {
    match strategy_type {
        PartitionStrategyType::Hdrf => Box::new(Hdrf::new(config)),
    }
}
