//! Polling schedule
//!
//! Waiting on a job starts with a short burst of quick polls so short jobs
//! report back fast, then settles into a constant steady interval so long
//! jobs do not hammer the control plane.
//!
//! ```
//! use std::time::Duration;
//! use steward_core::polling::PollingSchedule;
//!
//! let schedule = PollingSchedule::new(
//!     vec![Duration::from_secs(1), Duration::from_secs(2)],
//!     Duration::from_secs(5),
//! );
//!
//! let first: Vec<_> = schedule.intervals().take(4).collect();
//! assert_eq!(first, [1, 2, 5, 5].map(Duration::from_secs));
//! ```

use std::iter::FusedIterator;
use std::time::Duration;

/// Burst/steady polling configuration, optionally capped by a total budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingSchedule {
    burst: Vec<Duration>,
    steady: Duration,
    max_total: Option<Duration>,
}

impl PollingSchedule {
    pub fn new(burst: Vec<Duration>, steady: Duration) -> Self {
        Self {
            burst,
            steady,
            max_total: None,
        }
    }

    /// Caps the sum of all yielded intervals
    pub fn with_max_total(mut self, max_total: Duration) -> Self {
        self.max_total = Some(max_total);
        self
    }

    pub fn max_total(&self) -> Option<Duration> {
        self.max_total
    }

    /// Starts a fresh interval sequence
    pub fn intervals(&self) -> Intervals<'_> {
        Intervals {
            schedule: self,
            position: 0,
            elapsed: Duration::ZERO,
            exhausted: false,
        }
    }
}

impl Default for PollingSchedule {
    /// 2s, 4s, 8s, then every 10s with no cap
    fn default() -> Self {
        Self::new(
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ],
            Duration::from_secs(10),
        )
    }
}

/// Lazy interval sequence produced by [`PollingSchedule::intervals`]
///
/// Infinite without a cap. With a cap it ends, for good, as soon as the next
/// interval would take the sum of already-yielded intervals past the cap.
#[derive(Debug, Clone)]
pub struct Intervals<'a> {
    schedule: &'a PollingSchedule,
    position: usize,
    elapsed: Duration,
    exhausted: bool,
}

impl Intervals<'_> {
    /// Sum of the intervals yielded so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Iterator for Intervals<'_> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.exhausted {
            return None;
        }

        let candidate = self
            .schedule
            .burst
            .get(self.position)
            .copied()
            .unwrap_or(self.schedule.steady);

        if let Some(max_total) = self.schedule.max_total {
            match self.elapsed.checked_add(candidate) {
                Some(total) if total <= max_total => {}
                _ => {
                    self.exhausted = true;
                    return None;
                }
            }
        }

        self.position += 1;
        self.elapsed = self.elapsed.saturating_add(candidate);
        Some(candidate)
    }
}

impl FusedIterator for Intervals<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_secs).collect()
    }

    #[test]
    fn test_burst_then_steady() {
        let schedule = PollingSchedule::new(secs(&[2, 4, 8]), Duration::from_secs(10));

        let values: Vec<_> = schedule.intervals().take(8).collect();
        assert_eq!(values, secs(&[2, 4, 8, 10, 10, 10, 10, 10]));
    }

    #[test]
    fn test_uncapped_sequence_is_infinite() {
        let schedule = PollingSchedule::new(Vec::new(), Duration::from_millis(1));
        assert_eq!(schedule.intervals().take(10_000).count(), 10_000);
    }

    #[test]
    fn test_cap_truncates_before_exceeding() {
        let schedule = PollingSchedule::new(secs(&[2, 4, 8]), Duration::from_secs(10))
            .with_max_total(Duration::from_secs(30));

        // 2 + 4 + 8 + 10 = 24; another 10 would make 34
        let values: Vec<_> = schedule.intervals().collect();
        assert_eq!(values, secs(&[2, 4, 8, 10]));
        assert!(values.iter().sum::<Duration>() <= Duration::from_secs(30));
    }

    #[test]
    fn test_cap_allows_exact_total() {
        let schedule = PollingSchedule::new(secs(&[2, 4]), Duration::from_secs(4))
            .with_max_total(Duration::from_secs(10));

        let values: Vec<_> = schedule.intervals().collect();
        assert_eq!(values, secs(&[2, 4, 4]));
    }

    #[test]
    fn test_cap_smaller_than_first_interval() {
        let schedule = PollingSchedule::new(secs(&[5]), Duration::from_secs(10))
            .with_max_total(Duration::from_secs(3));
        assert_eq!(schedule.intervals().next(), None);
    }

    #[test]
    fn test_stays_exhausted() {
        // A later, smaller burst value must not revive the sequence
        let schedule = PollingSchedule::new(secs(&[2, 9, 1]), Duration::from_secs(1))
            .with_max_total(Duration::from_secs(5));

        let mut intervals = schedule.intervals();
        assert_eq!(intervals.next(), Some(Duration::from_secs(2)));
        assert_eq!(intervals.next(), None);
        assert_eq!(intervals.next(), None);
        assert_eq!(intervals.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_each_call_restarts() {
        let schedule = PollingSchedule::default();

        let mut first = schedule.intervals();
        first.next();
        first.next();

        let fresh: Vec<_> = schedule.intervals().take(2).collect();
        assert_eq!(fresh, secs(&[2, 4]));
        assert_eq!(first.next(), Some(Duration::from_secs(8)));
    }
}
