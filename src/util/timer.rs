use std::fmt::{Debug, Error, Formatter};
use std::ops::Deref;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct VcTimer {
    instant: Instant,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct VcDuration {
    duration: Duration,
}

impl VcTimer {
    pub fn now() -> Self {
        Self { instant: Instant::now() }
    }

    pub fn elapsed(&self) -> VcDuration {
        VcDuration { duration: self.instant.elapsed() }
    }
}

impl VcDuration {
    pub fn to_seconds_string(&self) -> String {
        format!("{}.{:06} s", self.duration.as_secs(), self.duration.subsec_micros())
    }

    /// Items processed per second over this duration, `0` for an empty duration.
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self, items: usize) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            items as f64 / secs
        } else {
            0.0
        }
    }

    pub fn to_rate_string(&self, items: usize, unit: &str) -> String {
        format!("{:.0} {}/s", self.rate(items), unit)
    }
}

impl Debug for VcDuration {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{:?}", self.duration)
    }
}

impl Deref for VcDuration {
    type Target = Duration;

    fn deref(&self) -> &Self::Target {
        &self.duration
    }
}

#[cfg(test)]
mod tests {
    use crate::util::timer::VcDuration;
    use std::time::Duration;

    #[test]
    fn string_format() {
        let inputs = vec![
            (0, 7_106_780, "0.007106 s", 1000, "140711 edges/s"),
            (2, 500_000_000, "2.500000 s", 10_000, "4000 edges/s"),
        ];
        for (sec, nano, sec_str, items, rate_str) in inputs {
            let duration = VcDuration { duration: Duration::new(sec, nano) };
            assert_eq!(duration.to_seconds_string(), sec_str);
            assert_eq!(duration.to_rate_string(items, "edges"), rate_str);
        }
    }

    #[test]
    fn zero_duration_rate() {
        let duration = VcDuration::default();
        assert!(duration.rate(100).abs() < f64::EPSILON);
    }
}
