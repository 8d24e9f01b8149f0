use crate::graph::{Edge, PartitionId, VertexId};
use crate::state::loads::LoadCounters;
use crate::state::record::{RecordTable, VertexRecord};
use crate::state::{PartitionState, VertexLoadTracking};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks per-partition vertex load on top of edge load, and keeps the edges committed to
/// each partition so the partitioned graph can be materialized after the run.
pub struct CoordinatedPartitionState {
    records: RecordTable,
    edge_loads: LoadCounters,
    vertex_loads: LoadCounters,
    partition_edges: Vec<Mutex<Vec<Edge>>>,
}

impl CoordinatedPartitionState {
    pub fn new(num_partitions: usize) -> Self {
        CoordinatedPartitionState {
            records: RecordTable::default(),
            edge_loads: LoadCounters::new(num_partitions),
            vertex_loads: LoadCounters::new(num_partitions),
            partition_edges: (0..num_partitions).map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    /// Edges committed to `partition`, in commit order.
    pub fn partition_edges(&self, partition: PartitionId) -> Vec<Edge> {
        self.partition_edges[partition].lock().clone()
    }

    pub fn machine_loads_vertices(&self) -> Vec<usize> {
        self.vertex_loads.snapshot()
    }
}

impl PartitionState for CoordinatedPartitionState {
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

    fn increment_machine_load(&self, partition: PartitionId, edge: &Edge) {
        self.partition_edges[partition].lock().push(*edge);
        self.edge_loads.increment(partition);
    }

    fn vertex_ids(&self) -> Vec<VertexId> {
        self.records.vertex_ids()
    }

    fn vertex_count(&self) -> usize {
        self.records.vertex_count()
    }

    fn total_replicas(&self) -> usize {
        self.vertex_loads.sum()
    }

    fn vertex_load_tracking(&self) -> Option<&dyn VertexLoadTracking> {
        Some(self)
    }
}

impl VertexLoadTracking for CoordinatedPartitionState {
    fn increment_machine_load_vertices(&self, partition: PartitionId) {
        self.vertex_loads.increment(partition);
    }

    fn machine_load_vertices(&self, partition: PartitionId) -> usize {
        self.vertex_loads.get(partition)
    }
}
