//! Declarative retry configuration.

use serde::{Deserialize, Serialize};
use tenax_backoff::BackoffConfig;

use crate::policy::{DEFAULT_RETRIES, RetryPolicy};

/// Declarative description of a retry policy.
///
/// Lets applications keep the retry budget and backoff strategy in their
/// configuration files. Observers and sleepers are code, not configuration;
/// attach them via [`RetryPolicy::builder`] when they are needed.
///
/// # Examples
///
/// ```rust
/// use tenax::RetryConfig;
///
/// let config: RetryConfig = toml::from_str(
///     "retries = 4\n\n[backoff]\nstrategy = \"constant\"\ndelay_ms = 50\n",
/// )
/// .unwrap();
///
/// let policy = config.into_policy::<std::io::Error>();
/// assert_eq!(policy.retries(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Number of additional attempts after the first.
    pub retries: u32,
    /// Backoff between attempts; `None` means no delay.
    pub backoff: Option<BackoffConfig>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: None,
        }
    }
}

impl RetryConfig {
    /// Build a policy with this budget and backoff.
    pub fn into_policy<E>(self) -> RetryPolicy<E> {
        let mut builder = RetryPolicy::builder().retries(self.retries);
        if let Some(backoff) = self.backoff {
            builder = builder.backoff(backoff.build());
        }
        builder.build()
    }
}
