#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Bounded retrying of fallible async operations.
//!
//! `tenax` drives an async operation through a strictly serialized attempt
//! loop: invoke, inspect, optionally wait, try again, until the operation
//! succeeds, bails out, an observer aborts, or the retry budget is spent.
//!
//! - A [`RetryPolicy`] holds the budget (default 10 retries), an optional
//!   backoff generator from [`tenax_backoff`] (re-exported as
//!   [`backoff`]), and an optional `on_retry` observer.
//! - The operation receives a [`Bail`] handle to terminate the whole
//!   sequence early, distinct from an ordinary failure.
//! - Every failure path surfaces as a [`RetryError`]; nothing is logged or
//!   recovered internally. With the `tracing` cargo feature enabled the loop
//!   additionally emits debug events on each terminal transition.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use tenax::RetryPolicy;
//! use tenax::backoff::{ExponentialBackoff, FullJitterBackoff};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut policy = RetryPolicy::builder()
//!     .retries(5)
//!     .backoff(FullJitterBackoff::new(
//!         ExponentialBackoff::builder()
//!             .base(Duration::from_millis(100))
//!             .build(),
//!     ))
//!     .on_retry(|error: &std::io::Error, attempt, delay| {
//!         eprintln!("attempt {attempt} failed ({error}), next in {delay:?}");
//!         Ok(())
//!     })
//!     .build();
//!
//! let value = policy
//!     .run(|_bail, attempt| async move {
//!         if attempt < 3 {
//!             Err(std::io::Error::other("flaky"))
//!         } else {
//!             Ok("ready")
//!         }
//!     })
//!     .await?;
//! assert_eq!(value, "ready");
//! # Ok(())
//! # }
//! ```
//!
//! Bailing out beats retrying when the operation learns its error is
//! permanent:
//!
//! ```rust
//! # async fn example() {
//! let result: Result<(), _> = tenax::retry(|bail, _attempt| async move {
//!     let error = std::io::Error::other("invalid credentials");
//!     // No amount of retrying fixes a bad password.
//!     bail.out(error);
//!     Err(std::io::Error::other("unreachable attempt error"))
//! })
//! .await;
//!
//! assert_eq!(result.unwrap_err().to_string(), "invalid credentials");
//! # }
//! ```

mod bail;
mod config;
mod error;
mod policy;
mod sleep;

pub use tenax_backoff as backoff;

pub use bail::Bail;
pub use config::RetryConfig;
pub use error::{BAILED_WITHOUT_REASON, RetryError};
pub use policy::{DEFAULT_RETRIES, OnRetry, RetryPolicy, RetryPolicyBuilder, retry};
pub use sleep::{Sleeper, TokioSleeper};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use tenax::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backoff::{
        Backoff, BackoffConfig, ConstantBackoff, DecorrelatedJitterBackoff, EqualJitterBackoff,
        ExponentialBackoff, FullJitterBackoff,
    };
    pub use crate::{Bail, RetryConfig, RetryError, RetryPolicy, retry};
}
