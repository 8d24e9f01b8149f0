use crate::config::INITIAL_BACKOFF_MICROS;
use crate::state::record::{RecordGuard, VertexRecord};
use std::time::Duration;

/// Lock wait interval, squared after each failed attempt: 2, 4, 16, 256, ... microseconds.
#[derive(Debug, Clone, Copy)]
pub struct LockBackoff {
    interval_micros: u64,
}

impl Default for LockBackoff {
    fn default() -> Self {
        LockBackoff { interval_micros: INITIAL_BACKOFF_MICROS }
    }
}

impl LockBackoff {
    #[inline]
    pub fn interval_micros(&self) -> u64 {
        self.interval_micros
    }

    #[inline]
    pub fn wait(&self, cap_micros: u64) -> Duration {
        Duration::from_micros(std::cmp::min(self.interval_micros, cap_micros))
    }

    #[inline]
    pub fn grow(&mut self) {
        self.interval_micros = self.interval_micros.saturating_mul(self.interval_micros);
    }

    #[inline]
    pub fn exceeds(&self, limit_micros: u64) -> bool {
        self.interval_micros > limit_micros
    }
}

/// Locks held on the endpoints of one edge.
pub enum EndpointLocks<'a> {
    SelfLoop(RecordGuard<'a>),
    Pair(RecordGuard<'a>, RecordGuard<'a>),
}

/// Locks `first`, waiting as long as it takes, then `second`. Gives up on `second` once
/// the backoff interval exceeds `retry_limit_micros`, releasing `first` and returning `None`.
/// Callers pass the lower vertex id as `first`.
pub fn lock_endpoints<'a>(
    first: &'a VertexRecord,
    second: Option<&'a VertexRecord>,
    retry_limit_micros: u64,
) -> Option<EndpointLocks<'a>> {
    let mut backoff = LockBackoff::default();
    let first_guard = loop {
        if let Some(guard) = first.try_lock_for(backoff.wait(retry_limit_micros)) {
            break guard;
        }
        backoff.grow();
    };

    let second = match second {
        Some(second) => second,
        None => return Some(EndpointLocks::SelfLoop(first_guard)),
    };

    let mut backoff = LockBackoff::default();
    loop {
        if let Some(second_guard) = second.try_lock_for(backoff.wait(retry_limit_micros)) {
            return Some(EndpointLocks::Pair(first_guard, second_guard));
        }
        backoff.grow();
        if backoff.exceeds(retry_limit_micros) {
            drop(first_guard);
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::partitioning::locking::{lock_endpoints, EndpointLocks, LockBackoff};
    use crate::state::record::VertexRecord;
    use std::time::Duration;

    #[test]
    fn backoff_squares() {
        let mut backoff = LockBackoff::default();
        let mut intervals = Vec::new();
        for _ in 0..5 {
            intervals.push(backoff.interval_micros());
            backoff.grow();
        }
        assert_eq!(intervals, vec![2, 4, 16, 256, 65_536]);
        assert!(!LockBackoff::default().exceeds(16));
        assert_eq!(backoff.wait(16), Duration::from_micros(16));

        for _ in 0..10 {
            backoff.grow();
        }
        assert_eq!(backoff.interval_micros(), u64::MAX);
    }

    #[test]
    fn self_loop_locks_once() {
        let record = VertexRecord::default();
        match lock_endpoints(&record, None, 16) {
            Some(EndpointLocks::SelfLoop(_guard)) => assert!(record.try_lock().is_none()),
            _ => panic!("Expected a single lock for a self loop"),
        }
        assert!(record.try_lock().is_some());
    }

    #[test]
    fn pair_locks_both() {
        let (a, b) = (VertexRecord::default(), VertexRecord::default());
        let locks = lock_endpoints(&a, Some(&b), 16).expect("Both records are free");
        assert!(a.try_lock().is_none());
        assert!(b.try_lock().is_none());
        drop(locks);
        assert!(a.try_lock().is_some());
        assert!(b.try_lock().is_some());
    }

    #[test]
    fn gives_up_and_releases_first() {
        let (a, b) = (VertexRecord::default(), VertexRecord::default());
        let held = b.lock();
        assert!(lock_endpoints(&a, Some(&b), 16).is_none());
        // The first record must not stay locked after giving up.
        assert!(a.try_lock().is_some());
        drop(held);
    }
}
