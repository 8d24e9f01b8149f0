use crate::graph::{PartitionId, VertexId};
use hashbrown::{HashMap, HashSet};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_RECORD_SHARDS: usize = 64;

/// Exclusive access to a vertex's data. Dropping the guard releases the record.
pub type RecordGuard<'a> = MutexGuard<'a, VertexData>;

/// Per-vertex partitioning state. The data is only reachable through a [`RecordGuard`].
#[derive(Debug, Default)]
pub struct VertexRecord {
    data: Mutex<VertexData>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VertexData {
    degree: usize,
    partitions: HashSet<PartitionId>,
}

impl VertexRecord {
    #[inline]
    pub fn try_lock(&self) -> Option<RecordGuard<'_>> {
        self.data.try_lock()
    }

    #[inline]
    pub fn try_lock_for(&self, timeout: Duration) -> Option<RecordGuard<'_>> {
        self.data.try_lock_for(timeout)
    }

    /// Blocks until the record is free. Only for readers outside the partitioning loop.
    pub fn lock(&self) -> RecordGuard<'_> {
        self.data.lock()
    }

    pub fn snapshot(&self) -> VertexData {
        self.data.lock().clone()
    }
}

impl VertexData {
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn increment_degree(&mut self) {
        self.degree += 1;
    }

    #[inline]
    pub fn has_replica_in_partition(&self, partition: PartitionId) -> bool {
        self.partitions.contains(&partition)
    }

    /// Returns `true` if `partition` was not already a replica of this vertex.
    #[inline]
    pub fn add_partition(&mut self, partition: PartitionId) -> bool {
        self.partitions.insert(partition)
    }

    pub fn replica_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> impl Iterator<Item = PartitionId> + '_ {
        self.partitions.iter().copied()
    }
}

/// Vertex id to record map, split into independently locked shards so that lazily creating
/// records does not serialize every worker on one lock.
pub struct RecordTable {
    shards: Vec<RwLock<HashMap<VertexId, Arc<VertexRecord>>>>,
}

impl Default for RecordTable {
    fn default() -> Self {
        RecordTable::with_shards(DEFAULT_RECORD_SHARDS)
    }
}

impl RecordTable {
    pub fn with_shards(shard_count: usize) -> Self {
        let shard_count = std::cmp::max(shard_count, 1);
        RecordTable { shards: (0..shard_count).map(|_| RwLock::new(HashMap::new())).collect() }
    }

    #[inline]
    fn shard(&self, vertex_id: VertexId) -> &RwLock<HashMap<VertexId, Arc<VertexRecord>>> {
        &self.shards[(vertex_id % self.shards.len() as u64) as usize]
    }

    pub fn get_or_insert(&self, vertex_id: VertexId) -> Arc<VertexRecord> {
        let shard = self.shard(vertex_id);
        if let Some(record) = shard.read().get(&vertex_id) {
            return Arc::clone(record);
        }
        Arc::clone(shard.write().entry(vertex_id).or_insert_with(Default::default))
    }

    pub fn vertex_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.shards
            .iter()
            .flat_map(|shard| shard.read().keys().copied().collect::<Vec<_>>())
            .collect()
    }

    /// Calls `f` on every record's data, locking one record at a time.
    pub fn for_each(&self, mut f: impl FnMut(VertexId, &VertexData)) {
        for shard in &self.shards {
            for (vertex_id, record) in shard.read().iter() {
                f(*vertex_id, &record.lock());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::state::record::{RecordTable, VertexRecord};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn guard_is_exclusive() {
        let record = VertexRecord::default();
        let mut guard = record.try_lock().expect("Record should be free");
        assert!(record.try_lock().is_none());
        assert!(record.try_lock_for(Duration::from_micros(50)).is_none());

        guard.increment_degree();
        assert!(guard.add_partition(3));
        assert!(!guard.add_partition(3));
        drop(guard);

        let data = record.snapshot();
        assert_eq!(data.degree(), 1);
        assert!(data.has_replica_in_partition(3));
        assert!(!data.has_replica_in_partition(0));
        assert_eq!(data.replica_count(), 1);
    }

    #[test]
    fn table_creates_records_lazily() {
        let table = RecordTable::with_shards(4);
        assert_eq!(table.vertex_count(), 0);

        let first = table.get_or_insert(10);
        let second = table.get_or_insert(10);
        assert!(Arc::ptr_eq(&first, &second));
        table.get_or_insert(11);
        table.get_or_insert(14);

        assert_eq!(table.vertex_count(), 3);
        let mut ids = table.vertex_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![10, 11, 14]);
    }
}
