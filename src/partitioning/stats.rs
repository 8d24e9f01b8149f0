use crate::state::PartitionState;

/// Quality of a finished partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitioningStats {
    pub num_partitions: usize,
    pub num_vertices: usize,
    /// Vertices with a replica on more than one partition.
    pub replicated_vertices: usize,
    pub total_replicas: usize,
    pub num_edges: usize,
    pub max_edge_load: usize,
    pub min_edge_load: usize,
    pub max_vertex_load: usize,
    pub min_vertex_load: usize,
    /// `(max - min) / max` over edge loads, `0` is perfectly balanced.
    pub edge_balance_factor: f64,
    /// `(max - min) / max` over vertex loads.
    pub vertex_balance_factor: f64,
    /// Average number of replicas per vertex, `1` means no vertex is replicated.
    pub replication_factor: f64,
}

impl PartitioningStats {
    pub fn from_state(state: &dyn PartitionState) -> Self {
        let edge_loads = state.machine_loads();
        let num_partitions = edge_loads.len();

        let mut vertex_loads = vec![0; num_partitions];
        let mut num_vertices = 0;
        let mut replicated_vertices = 0;
        let mut total_replicas = 0;
        for vertex_id in state.vertex_ids() {
            let data = state.get_record(vertex_id).snapshot();
            num_vertices += 1;
            total_replicas += data.replica_count();
            if data.replica_count() > 1 {
                replicated_vertices += 1;
            }
            for partition in data.partitions() {
                vertex_loads[partition] += 1;
            }
        }
        if let Some(tracker) = state.vertex_load_tracking() {
            for (partition, load) in vertex_loads.iter().enumerate() {
                debug_assert_eq!(*load, tracker.machine_load_vertices(partition));
            }
        }

        let (min_edge_load, max_edge_load) = min_max(&edge_loads);
        let (min_vertex_load, max_vertex_load) = min_max(&vertex_loads);
        PartitioningStats {
            num_partitions,
            num_vertices,
            replicated_vertices,
            total_replicas,
            num_edges: edge_loads.iter().sum(),
            max_edge_load,
            min_edge_load,
            max_vertex_load,
            min_vertex_load,
            edge_balance_factor: imbalance(min_edge_load, max_edge_load),
            vertex_balance_factor: imbalance(min_vertex_load, max_vertex_load),
            replication_factor: ratio(total_replicas, num_vertices),
        }
    }
}

impl std::fmt::Display for PartitioningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "partitions = {}, vertices = {}, replicated vertices = {}, replicas = {}, \
            edges = {}, edge load = [{}, {}], vertex load = [{}, {}], \
            edge balance = {:.4}, vertex balance = {:.4}, replication factor = {:.4}",
            self.num_partitions,
            self.num_vertices,
            self.replicated_vertices,
            self.total_replicas,
            self.num_edges,
            self.min_edge_load,
            self.max_edge_load,
            self.min_vertex_load,
            self.max_vertex_load,
            self.edge_balance_factor,
            self.vertex_balance_factor,
            self.replication_factor
        )
    }
}

fn min_max(loads: &[usize]) -> (usize, usize) {
    let min = loads.iter().copied().min().unwrap_or(0);
    let max = loads.iter().copied().max().unwrap_or(0);
    (min, max)
}

fn imbalance(min: usize, max: usize) -> f64 {
    ratio(max - min, max)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
