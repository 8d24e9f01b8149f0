use crate::graph::PartitionId;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One atomic counter per partition. Reads across partitions are not a consistent snapshot
/// while writers are active.
#[derive(Debug)]
pub struct LoadCounters {
    loads: Vec<AtomicUsize>,
}

impl LoadCounters {
    pub fn new(num_partitions: usize) -> Self {
        LoadCounters { loads: (0..num_partitions).map(|_| AtomicUsize::new(0)).collect() }
    }

    #[inline]
    pub fn num_partitions(&self) -> usize {
        self.loads.len()
    }

    #[inline]
    pub fn get(&self, partition: PartitionId) -> usize {
        self.loads[partition].load(Ordering::Acquire)
    }

    #[inline]
    pub fn increment(&self, partition: PartitionId) {
        self.loads[partition].fetch_add(1, Ordering::AcqRel);
    }

    pub fn snapshot(&self) -> Vec<usize> {
        self.loads.iter().map(|load| load.load(Ordering::Acquire)).collect()
    }

    pub fn sum(&self) -> usize {
        self.snapshot().into_iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::loads::LoadCounters;

    #[test]
    fn increments_and_sum() {
        let loads = LoadCounters::new(3);
        assert_eq!(loads.sum(), 0);
        assert_eq!(loads.num_partitions(), 3);
        loads.increment(1);
        loads.increment(1);
        loads.increment(2);
        assert_eq!(loads.snapshot(), vec![0, 2, 1]);
        assert_eq!(loads.sum(), 3);
        assert_eq!(loads.get(1), 2);
    }
}
