//! Declarative backoff selection for application configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constant::DEFAULT_CONSTANT_DELAY;
use crate::exponential::{DEFAULT_BASE, DEFAULT_CAP, DEFAULT_FACTOR};
use crate::jitter::DEFAULT_TIMES;
use crate::{
    Backoff, ConstantBackoff, DecorrelatedJitterBackoff, EqualJitterBackoff, ExponentialBackoff,
    FullJitterBackoff,
};

/// Parameters for [`ConstantBackoff`], in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantParams {
    /// Fixed delay between attempts.
    pub delay_ms: u64,
}

impl Default for ConstantParams {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_CONSTANT_DELAY.as_millis() as u64,
        }
    }
}

/// Parameters for [`ExponentialBackoff`] and the jittered variants built on
/// top of it, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExponentialParams {
    /// Delay after the first failed attempt.
    pub base_ms: u64,
    /// Ceiling no delay will exceed.
    pub cap_ms: u64,
    /// Per-attempt growth factor.
    pub factor: u32,
}

impl Default for ExponentialParams {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_BASE.as_millis() as u64,
            cap_ms: DEFAULT_CAP.as_millis() as u64,
            factor: DEFAULT_FACTOR,
        }
    }
}

impl From<ExponentialParams> for ExponentialBackoff {
    fn from(params: ExponentialParams) -> Self {
        ExponentialBackoff::builder()
            .base(Duration::from_millis(params.base_ms))
            .cap(Duration::from_millis(params.cap_ms))
            .factor(params.factor)
            .build()
    }
}

/// Parameters for [`DecorrelatedJitterBackoff`], in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorrelatedParams {
    /// Lower bound of every sample and starting point of the walk.
    pub base_ms: u64,
    /// Ceiling no delay will exceed.
    pub cap_ms: u64,
    /// Multiplier applied to the previous delay to form the upper bound.
    pub times: u32,
}

impl Default for DecorrelatedParams {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_BASE.as_millis() as u64,
            cap_ms: DEFAULT_CAP.as_millis() as u64,
            times: DEFAULT_TIMES,
        }
    }
}

/// Declarative selection of a backoff generator.
///
/// Deserializes from any serde format using a `strategy` tag; omitted fields
/// take the generator's defaults.
///
/// # Examples
///
/// ```rust
/// use tenax_backoff::{Backoff, BackoffConfig};
///
/// let config: BackoffConfig = toml::from_str(
///     "strategy = \"full_jitter\"\nbase_ms = 250\n",
/// )
/// .unwrap();
///
/// let mut backoff = config.build();
/// assert!(backoff.delay(1).as_millis() <= 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BackoffConfig {
    /// Fixed delay between attempts.
    Constant(ConstantParams),
    /// Exponentially growing delay.
    Exponential(ExponentialParams),
    /// Exponential envelope, resampled down to zero.
    FullJitter(ExponentialParams),
    /// Exponential envelope, resampled above its halfway point.
    EqualJitter(ExponentialParams),
    /// Capped random walk over `[base, previous * times]`.
    DecorrelatedJitter(DecorrelatedParams),
}

impl BackoffConfig {
    /// Construct the generator this configuration describes.
    pub fn build(&self) -> Box<dyn Backoff + Send> {
        match *self {
            BackoffConfig::Constant(params) => Box::new(ConstantBackoff::new(
                Duration::from_millis(params.delay_ms),
            )),
            BackoffConfig::Exponential(params) => Box::new(ExponentialBackoff::from(params)),
            BackoffConfig::FullJitter(params) => Box::new(FullJitterBackoff::new(params.into())),
            BackoffConfig::EqualJitter(params) => Box::new(EqualJitterBackoff::new(params.into())),
            BackoffConfig::DecorrelatedJitter(params) => Box::new(DecorrelatedJitterBackoff::new(
                Duration::from_millis(params.base_ms),
                Duration::from_millis(params.cap_ms),
                params.times,
            )),
        }
    }
}
