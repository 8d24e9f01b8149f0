use crate::error::VcError;

pub const DEFAULT_LAMBDA: f64 = 1.0;
pub const DEFAULT_EPSILON: f64 = 1.0;
/// Ceiling, in microseconds, for the wait on the second endpoint lock.
pub const DEFAULT_RETRY_LIMIT_MICROS: u64 = 16;
/// First wait interval of the lock backoff, squared after every failed attempt.
pub const INITIAL_BACKOFF_MICROS: u64 = 2;

/// Which shared state implementation a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    /// Tracks per-partition edge load only.
    Basic,
    /// Also tracks per-partition vertex load and keeps the assigned edges.
    Coordinated,
}

/// Immutable parameters of a partitioning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HdrfConfig {
    pub num_partitions: usize,
    /// Weight of the balance term.
    pub lambda: f64,
    /// Smoothing of the balance term, keeps the denominator positive when all loads are equal.
    pub epsilon: f64,
    pub retry_limit_micros: u64,
    pub threads: usize,
    pub seed: Option<u64>,
    pub state_kind: StateKind,
}

impl Default for HdrfConfig {
    fn default() -> Self {
        HdrfConfig {
            num_partitions: 1,
            lambda: DEFAULT_LAMBDA,
            epsilon: DEFAULT_EPSILON,
            retry_limit_micros: DEFAULT_RETRY_LIMIT_MICROS,
            threads: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            seed: None,
            state_kind: StateKind::Coordinated,
        }
    }
}

impl HdrfConfig {
    pub fn with_partitions(num_partitions: usize) -> Self {
        HdrfConfig { num_partitions, ..HdrfConfig::default() }
    }

    pub fn validate(&self) -> Result<(), VcError> {
        if self.num_partitions == 0 {
            return Err(VcError::Config("Number of partitions should be non-zero".to_owned()));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(VcError::Config(format!(
                "Lambda should be a finite non-negative number, found {}",
                self.lambda
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(VcError::Config(format!(
                "Epsilon should be a finite positive number, found {}",
                self.epsilon
            )));
        }
        if self.retry_limit_micros < INITIAL_BACKOFF_MICROS {
            return Err(VcError::Config(format!(
                "Retry limit should be at least {} us, found {} us",
                INITIAL_BACKOFF_MICROS, self.retry_limit_micros
            )));
        }
        if self.threads == 0 {
            return Err(VcError::Config("Threads should be non-zero".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{HdrfConfig, StateKind};

    #[test]
    fn defaults_are_valid() {
        let config = HdrfConfig::with_partitions(4);
        assert_eq!(config.num_partitions, 4);
        assert!((config.lambda - 1.0).abs() < f64::EPSILON);
        assert!((config.epsilon - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.retry_limit_micros, 16);
        assert_eq!(config.state_kind, StateKind::Coordinated);
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let invalid = vec![
            HdrfConfig { num_partitions: 0, ..HdrfConfig::default() },
            HdrfConfig { lambda: -0.5, ..HdrfConfig::default() },
            HdrfConfig { lambda: f64::NAN, ..HdrfConfig::default() },
            HdrfConfig { epsilon: 0.0, ..HdrfConfig::default() },
            HdrfConfig { retry_limit_micros: 1, ..HdrfConfig::default() },
            HdrfConfig { threads: 0, ..HdrfConfig::default() },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }
}
