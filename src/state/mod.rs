//! Shared state of a partitioning run: one record per vertex seen so far and per-partition
//! load counters. Every worker of a run operates on the same state object.

use crate::config::{HdrfConfig, StateKind};
use crate::graph::{Edge, PartitionId, VertexId};
use crate::state::basic::BasicPartitionState;
use crate::state::coordinated::CoordinatedPartitionState;
use crate::state::record::VertexRecord;
use std::sync::Arc;

pub mod basic;
pub mod coordinated;
pub mod loads;
pub mod record;

pub trait PartitionState: Send + Sync {
    /// Returns the record of `vertex_id`, creating an empty one on first reference.
    fn get_record(&self, vertex_id: VertexId) -> Arc<VertexRecord>;

    fn num_partitions(&self) -> usize;

    fn machine_load(&self, partition: PartitionId) -> usize;

    /// Edge load of every partition. Not an atomic snapshot under concurrent commits.
    fn machine_loads(&self) -> Vec<usize>;

    fn min_load(&self) -> usize {
        self.machine_loads().into_iter().min().unwrap_or(0)
    }

    fn max_load(&self) -> usize {
        self.machine_loads().into_iter().max().unwrap_or(0)
    }

    /// Records that `edge` was committed to `partition`.
    fn increment_machine_load(&self, partition: PartitionId, edge: &Edge);

    fn vertex_ids(&self) -> Vec<VertexId>;

    fn vertex_count(&self) -> usize;

    /// Sum of replica counts over all vertices.
    fn total_replicas(&self) -> usize;

    /// Capability query for per-partition vertex load tracking.
    fn vertex_load_tracking(&self) -> Option<&dyn VertexLoadTracking> {
        None
    }
}

/// Implemented by states that count the distinct vertices replicated on each partition.
pub trait VertexLoadTracking: Send + Sync {
    fn increment_machine_load_vertices(&self, partition: PartitionId);

    fn machine_load_vertices(&self, partition: PartitionId) -> usize;
}

/// Owned state of a run, in one of the two supported variants.
pub enum SharedPartitionState {
    Basic(BasicPartitionState),
    Coordinated(CoordinatedPartitionState),
}

impl SharedPartitionState {
    pub fn new(config: &HdrfConfig) -> Self {
        match config.state_kind {
            StateKind::Basic => {
                SharedPartitionState::Basic(BasicPartitionState::new(config.num_partitions))
            }
            StateKind::Coordinated => SharedPartitionState::Coordinated(
                CoordinatedPartitionState::new(config.num_partitions),
            ),
        }
    }

    pub fn as_state(&self) -> &dyn PartitionState {
        match self {
            SharedPartitionState::Basic(state) => state,
            SharedPartitionState::Coordinated(state) => state,
        }
    }

    pub fn as_coordinated(&self) -> Option<&CoordinatedPartitionState> {
        match self {
            SharedPartitionState::Basic(_) => None,
            SharedPartitionState::Coordinated(state) => Some(state),
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            SharedPartitionState::Basic(_) => StateKind::Basic,
            SharedPartitionState::Coordinated(_) => StateKind::Coordinated,
        }
    }
}
