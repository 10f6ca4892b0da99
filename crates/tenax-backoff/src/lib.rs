#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Backoff delay generators for retry loops.
//!
//! Each generator maps the number of the attempt that just failed to the
//! delay to wait before the next one. The family covers the classic
//! strategies:
//!
//! - [`ConstantBackoff`] - the same delay every time
//! - [`ExponentialBackoff`] - `min(cap, base * factor^(attempt - 1))`
//! - [`FullJitterBackoff`] - uniform over `[0, exponential(attempt)]`
//! - [`EqualJitterBackoff`] - uniform over `[half, exponential(attempt)]`
//! - [`DecorrelatedJitterBackoff`] - a stateful random walk over
//!   `[base, previous * times]`, capped
//!
//! All of them implement the [`Backoff`] trait, as do plain
//! `FnMut(u32) -> Duration` closures. Generators can also be picked
//! declaratively from application configuration via [`BackoffConfig`].
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use tenax_backoff::{Backoff, ExponentialBackoff};
//!
//! let mut backoff = ExponentialBackoff::builder()
//!     .base(Duration::from_millis(100))
//!     .cap(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//! ```

mod config;
mod constant;
mod exponential;
mod jitter;
mod strategy;

pub use config::{
    BackoffConfig, ConstantParams, DecorrelatedParams, ExponentialParams,
};
pub use constant::{ConstantBackoff, DEFAULT_CONSTANT_DELAY};
pub use exponential::{
    DEFAULT_BASE, DEFAULT_CAP, DEFAULT_FACTOR, ExponentialBackoff, ExponentialBackoffBuilder,
};
pub use jitter::{
    DEFAULT_TIMES, DecorrelatedJitterBackoff, EqualJitterBackoff, FullJitterBackoff,
};
pub use strategy::Backoff;
