//! Hiring approval: an absolute cap plus an optional day-indexed throttle.

use serde::{Deserialize, Serialize};

/// Absolute worker limit enforced by the judge.
pub const MAX_WORKERS: u32 = 100;

/// Step function that widens the allowed workforce every `slice_days` days.
///
/// On 0-based day `d` the ceiling is `workers_per_slice * (d / slice_days + 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throttle {
    pub slice_days: u32,
    pub workers_per_slice: u32,
}

impl Throttle {
    pub fn ceiling(&self, day: u64) -> u32 {
        let slice_days = u64::from(self.slice_days.max(1));
        let slices = day / slice_days + 1;
        let ceiling = u64::from(self.workers_per_slice).saturating_mul(slices);
        u32::try_from(ceiling).unwrap_or(u32::MAX)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HiringPolicy {
    hard_cap: u32,
    throttle: Option<Throttle>,
}

impl HiringPolicy {
    pub fn new(hard_cap: u32, throttle: Option<Throttle>) -> Self {
        Self { hard_cap, throttle }
    }

    /// Largest workforce allowed on `day`.
    pub fn ceiling(&self, day: u64) -> u32 {
        match self.throttle {
            Some(throttle) => throttle.ceiling(day).min(self.hard_cap),
            None => self.hard_cap,
        }
    }

    /// Whether one more worker may join a workforce of `worker_count` on `day`.
    pub fn approve(&self, worker_count: u32, day: u64) -> bool {
        worker_count < self.ceiling(day)
    }
}

impl Default for HiringPolicy {
    fn default() -> Self {
        Self::new(MAX_WORKERS, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hard_cap_blocks_the_hundred_and_first_worker() {
        let policy = HiringPolicy::default();
        assert!(policy.approve(99, 0));
        assert!(!policy.approve(100, 0));
        assert!(!policy.approve(100, 1_999));
    }

    #[test]
    fn throttle_widens_every_slice() {
        let policy = HiringPolicy::new(
            MAX_WORKERS,
            Some(Throttle {
                slice_days: 20,
                workers_per_slice: 10,
            }),
        );
        assert!(policy.approve(9, 5));
        assert!(!policy.approve(10, 5));
        assert!(!policy.approve(10, 19));
        assert!(policy.approve(10, 20));
        assert_eq!(policy.ceiling(1_999), MAX_WORKERS);
    }

    proptest! {
        #[test]
        fn ceiling_is_monotone_and_capped(
            slice_days in 1u32..400,
            workers_per_slice in 0u32..50,
            hard_cap in 0u32..=MAX_WORKERS,
            day in 0u64..5_000,
        ) {
            let policy = HiringPolicy::new(
                hard_cap,
                Some(Throttle { slice_days, workers_per_slice }),
            );
            prop_assert!(policy.ceiling(day) <= hard_cap);
            prop_assert!(policy.ceiling(day) <= policy.ceiling(day + 1));
        }
    }
}
