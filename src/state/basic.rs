use crate::graph::{Edge, PartitionId, VertexId};
use crate::state::loads::LoadCounters;
use crate::state::record::{RecordTable, VertexRecord};
use crate::state::PartitionState;
use std::sync::Arc;

/// Tracks vertex records and per-partition edge load only.
pub struct BasicPartitionState {
    records: RecordTable,
    edge_loads: LoadCounters,
}

impl BasicPartitionState {
    pub fn new(num_partitions: usize) -> Self {
        BasicPartitionState {
            records: RecordTable::default(),
            edge_loads: LoadCounters::new(num_partitions),
        }
    }
}

impl PartitionState for BasicPartitionState {
    fn get_record(&self, vertex_id: VertexId) -> Arc<VertexRecord> {
        self.records.get_or_insert(vertex_id)
    }

    fn num_partitions(&self) -> usize {
        self.edge_loads.num_partitions()
    }

    fn machine_load(&self, partition: PartitionId) -> usize {
        self.edge_loads.get(partition)
    }

    fn machine_loads(&self) -> Vec<usize> {
        self.edge_loads.snapshot()
    }

    fn increment_machine_load(&self, partition: PartitionId, _edge: &Edge) {
        self.edge_loads.increment(partition);
    }

    fn vertex_ids(&self) -> Vec<VertexId> {
        self.records.vertex_ids()
    }

    fn vertex_count(&self) -> usize {
        self.records.vertex_count()
    }

    fn total_replicas(&self) -> usize {
        let mut total = 0;
        self.records.for_each(|_, data| total += data.replica_count());
        total
    }
}
