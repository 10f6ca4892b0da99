//! Exponentially growing backoff.

use std::time::Duration;

use crate::Backoff;
use crate::strategy::millis;

/// Default starting delay for [`ExponentialBackoff`].
pub const DEFAULT_BASE: Duration = Duration::from_millis(1000);

/// Default ceiling for [`ExponentialBackoff`] delays.
pub const DEFAULT_CAP: Duration = Duration::from_secs(60);

/// Default growth factor for [`ExponentialBackoff`].
pub const DEFAULT_FACTOR: u32 = 2;

/// Delay growing as `min(cap, base * factor^(attempt - 1))`.
///
/// Attempt 1 maps to `base`; every further attempt multiplies the previous
/// uncapped value by `factor`. Growth that would overflow the millisecond
/// arithmetic saturates to `cap`, so the cap bounds the delay for any
/// attempt count.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tenax_backoff::{Backoff, ExponentialBackoff};
///
/// let mut backoff = ExponentialBackoff::default();
/// assert_eq!(backoff.delay(1), Duration::from_millis(1000));
/// assert_eq!(backoff.delay(2), Duration::from_millis(2000));
/// assert_eq!(backoff.delay(3), Duration::from_millis(4000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base: Duration,
    cap: Duration,
    factor: u32,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// The delay for a 1-based attempt number.
    ///
    /// Unlike [`Backoff::delay`] this takes `&self`; the generator is pure.
    /// The jittered generators use it as their envelope.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let cap_ms = millis(self.cap);
        let delay_ms = u64::from(self.factor)
            .checked_pow(exponent)
            .and_then(|growth| millis(self.base).checked_mul(growth))
            .map_or(cap_ms, |ms| ms.min(cap_ms));
        Duration::from_millis(delay_ms)
    }
}

impl Default for ExponentialBackoff {
    /// Defaults: `base` 1000ms, `cap` 60s, `factor` 2.
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            cap: DEFAULT_CAP,
            factor: DEFAULT_FACTOR,
        }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&mut self, attempt: u32) -> Duration {
        self.delay_for(attempt)
    }
}

/// Builder for configuring [`ExponentialBackoff`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tenax_backoff::ExponentialBackoff;
///
/// let backoff = ExponentialBackoff::builder()
///     .base(Duration::from_millis(50))
///     .cap(Duration::from_secs(5))
///     .factor(3)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    base: Option<Duration>,
    cap: Option<Duration>,
    factor: Option<u32>,
}

impl ExponentialBackoffBuilder {
    /// Set the delay after the first failed attempt.
    ///
    /// Default: 1000ms
    pub fn base(mut self, base: Duration) -> Self {
        self.base = Some(base);
        self
    }

    /// Set the ceiling no delay will exceed.
    ///
    /// Default: 60s
    pub fn cap(mut self, cap: Duration) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Set the per-attempt growth factor.
    ///
    /// Default: 2
    pub fn factor(mut self, factor: u32) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Build the [`ExponentialBackoff`] instance.
    ///
    /// Uses default values for any unset parameters.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            base: self.base.unwrap_or(DEFAULT_BASE),
            cap: self.cap.unwrap_or(DEFAULT_CAP),
            factor: self.factor.unwrap_or(DEFAULT_FACTOR),
        }
    }
}
