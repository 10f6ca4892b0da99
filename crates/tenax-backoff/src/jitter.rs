//! Randomized backoff variants.
//!
//! Jitter spreads the retry instants of many independent callers so they do
//! not hammer a recovering dependency in lockstep. The full and equal
//! variants resample inside the exponential envelope; the decorrelated
//! variant replaces the envelope with a capped random walk.

use rand::{Rng, thread_rng};
use std::time::Duration;

use crate::Backoff;
use crate::exponential::{DEFAULT_BASE, DEFAULT_CAP, ExponentialBackoff};
use crate::strategy::millis;

/// Default multiplier for [`DecorrelatedJitterBackoff`].
pub const DEFAULT_TIMES: u32 = 3;

/// Exponential backoff with the delay resampled uniformly from
/// `[0, exponential(attempt)]`, both bounds inclusive.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tenax_backoff::{Backoff, ExponentialBackoff, FullJitterBackoff};
///
/// let mut backoff = FullJitterBackoff::new(ExponentialBackoff::default());
/// assert!(backoff.delay(2) <= Duration::from_millis(2000));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FullJitterBackoff {
    inner: ExponentialBackoff,
}

impl FullJitterBackoff {
    /// Jitter the delays of `inner` over the full range down to zero.
    pub fn new(inner: ExponentialBackoff) -> Self {
        Self { inner }
    }
}

impl Backoff for FullJitterBackoff {
    fn delay(&mut self, attempt: u32) -> Duration {
        let ceiling = millis(self.inner.delay_for(attempt));
        Duration::from_millis(thread_rng().gen_range(0..=ceiling))
    }
}

/// Exponential backoff keeping half the delay and jittering the rest:
/// `half + uniform(0, half)` where `half = exponential(attempt) / 2`.
///
/// The result always lands in `[half, exponential(attempt)]`, trading some
/// spread for a guaranteed minimum wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualJitterBackoff {
    inner: ExponentialBackoff,
}

impl EqualJitterBackoff {
    /// Jitter the upper half of the delays of `inner`.
    pub fn new(inner: ExponentialBackoff) -> Self {
        Self { inner }
    }
}

impl Backoff for EqualJitterBackoff {
    fn delay(&mut self, attempt: u32) -> Duration {
        let half = millis(self.inner.delay_for(attempt)) / 2;
        Duration::from_millis(half + thread_rng().gen_range(0..=half))
    }
}

/// Decorrelated jitter: each delay is sampled uniformly from
/// `[base, previous * times]` and capped, so the sequence wanders instead of
/// following a fixed curve.
///
/// The generator owns its sequence state and ignores the attempt number
/// passed to [`Backoff::delay`]. Reusing one instance across unrelated retry
/// sequences continues the same sequence rather than restarting it; construct
/// a fresh instance per sequence when isolation matters. The same applies to
/// sharing an instance between concurrent sequences, which interleaves the
/// walk between them.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tenax_backoff::DecorrelatedJitterBackoff;
///
/// let mut backoff = DecorrelatedJitterBackoff::default();
/// let first = backoff.advance();
/// assert!(first >= Duration::from_millis(1000));
/// assert!(first <= Duration::from_millis(3000));
/// ```
#[derive(Debug, Clone)]
pub struct DecorrelatedJitterBackoff {
    base: Duration,
    cap: Duration,
    times: u32,
    last_ms: u64,
}

impl DecorrelatedJitterBackoff {
    /// Create a generator walking over `[base, previous * times]`, capped at
    /// `cap`. The walk starts from `base`.
    pub fn new(base: Duration, cap: Duration, times: u32) -> Self {
        Self {
            base,
            cap,
            times,
            last_ms: millis(base),
        }
    }

    /// Advance the walk and return the next delay.
    pub fn advance(&mut self) -> Duration {
        let base = millis(self.base);
        let upper = self.last_ms.saturating_mul(u64::from(self.times)).max(base);
        let sleep = thread_rng().gen_range(base..=upper).min(millis(self.cap));
        self.last_ms = sleep;
        Duration::from_millis(sleep)
    }
}

impl Default for DecorrelatedJitterBackoff {
    /// Defaults: `base` 1000ms, `cap` 60s, `times` 3.
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_CAP, DEFAULT_TIMES)
    }
}

impl Backoff for DecorrelatedJitterBackoff {
    fn delay(&mut self, _attempt: u32) -> Duration {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_jitter_stays_inside_the_envelope() {
        let inner = ExponentialBackoff::default();
        let mut jittered = FullJitterBackoff::new(inner);

        for attempt in 1..=8 {
            let ceiling = inner.delay_for(attempt);
            for _ in 0..50 {
                let sampled = jittered.delay(attempt);
                assert!(
                    sampled <= ceiling,
                    "full jitter for attempt {attempt} produced {sampled:?} above {ceiling:?}"
                );
            }
        }
    }

    #[test]
    fn equal_jitter_keeps_the_lower_half() {
        let inner = ExponentialBackoff::default();
        let mut jittered = EqualJitterBackoff::new(inner);

        for attempt in 1..=8 {
            let ceiling = inner.delay_for(attempt);
            let half = ceiling / 2;
            for _ in 0..50 {
                let sampled = jittered.delay(attempt);
                assert!(
                    sampled >= half && sampled <= ceiling,
                    "equal jitter for attempt {attempt} produced {sampled:?} outside [{half:?}, {ceiling:?}]"
                );
            }
        }
    }

    #[test]
    fn decorrelated_first_step_samples_base_to_base_times() {
        for _ in 0..50 {
            let mut backoff = DecorrelatedJitterBackoff::new(
                Duration::from_millis(100),
                Duration::from_secs(60),
                3,
            );
            let first = backoff.advance();
            assert!(first >= Duration::from_millis(100));
            assert!(first <= Duration::from_millis(300));
        }
    }

    #[test]
    fn decorrelated_walk_is_bounded_by_previous_times_and_cap() {
        let base = Duration::from_millis(100);
        let cap = Duration::from_millis(2500);
        let mut backoff = DecorrelatedJitterBackoff::new(base, cap, 3);

        let mut previous = millis(base);
        for _ in 0..100 {
            let sleep = millis(backoff.advance());
            assert!(sleep >= millis(base));
            assert!(sleep <= millis(cap));
            assert!(sleep <= previous.saturating_mul(3));
            previous = sleep;
        }
    }

    #[test]
    fn decorrelated_ignores_the_attempt_number() {
        let mut by_trait = DecorrelatedJitterBackoff::new(
            Duration::from_millis(10),
            Duration::from_millis(10),
            1,
        );
        // base == cap pins the walk, whatever attempt is passed.
        assert_eq!(by_trait.delay(1), Duration::from_millis(10));
        assert_eq!(by_trait.delay(99), Duration::from_millis(10));
    }

    proptest! {
        #[test]
        fn full_jitter_bounds_hold_for_any_parameters(
            base_ms in 0u64..5_000,
            factor in 0u32..6,
            attempt in 1u32..16,
        ) {
            let inner = ExponentialBackoff::builder()
                .base(Duration::from_millis(base_ms))
                .cap(Duration::from_secs(60))
                .factor(factor)
                .build();
            let mut jittered = FullJitterBackoff::new(inner);

            let sampled = jittered.delay(attempt);
            prop_assert!(sampled <= inner.delay_for(attempt));
        }

        #[test]
        fn equal_jitter_bounds_hold_for_any_parameters(
            base_ms in 0u64..5_000,
            factor in 0u32..6,
            attempt in 1u32..16,
        ) {
            let inner = ExponentialBackoff::builder()
                .base(Duration::from_millis(base_ms))
                .cap(Duration::from_secs(60))
                .factor(factor)
                .build();
            let mut jittered = EqualJitterBackoff::new(inner);

            let half = millis(inner.delay_for(attempt)) / 2;
            let sampled = millis(jittered.delay(attempt));
            prop_assert!(sampled >= half);
            prop_assert!(sampled <= millis(inner.delay_for(attempt)));
        }

        #[test]
        fn decorrelated_never_exceeds_the_cap(
            base_ms in 1u64..1_000,
            extra_cap_ms in 0u64..10_000,
            times in 1u32..5,
            steps in 1usize..30,
        ) {
            let base = Duration::from_millis(base_ms);
            let cap = Duration::from_millis(base_ms + extra_cap_ms);
            let mut backoff = DecorrelatedJitterBackoff::new(base, cap, times);

            for _ in 0..steps {
                let sleep = backoff.advance();
                prop_assert!(sleep >= base);
                prop_assert!(sleep <= cap);
            }
        }
    }
}
