//! The retry orchestrator.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tenax_backoff::Backoff;

use crate::bail::Bail;
use crate::error::RetryError;
use crate::sleep::{Sleeper, TokioSleeper};

/// Default retry budget: ten additional attempts after the first.
pub const DEFAULT_RETRIES: u32 = 10;

/// Observer invoked once per failed-but-retriable attempt with the error,
/// the 1-based attempt number, and the delay about to be waited.
///
/// Returning `Err` aborts the sequence with that error in place of the
/// operation's, which is how selective non-retry policies are written.
pub type OnRetry<E> = Box<dyn FnMut(&E, u32, Duration) -> Result<(), E> + Send>;

/// Drives a fallible async operation until it succeeds, bails out, or runs
/// out of retries.
///
/// Attempts are strictly serialized: the next one starts only after the
/// previous outcome, any observer call, and any delay have fully resolved.
/// There is never more than one invocation in flight.
///
/// # Examples
///
/// ```rust
/// use tenax::RetryPolicy;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut policy = RetryPolicy::builder().retries(3).build();
///
/// let value = policy
///     .run(|_bail, attempt| async move {
///         if attempt < 2 {
///             Err(std::io::Error::other("not yet"))
///         } else {
///             Ok(attempt)
///         }
///     })
///     .await?;
/// assert_eq!(value, 2);
/// # Ok(())
/// # }
/// ```
pub struct RetryPolicy<E> {
    retries: u32,
    backoff: Option<Box<dyn Backoff + Send>>,
    on_retry: Option<OnRetry<E>>,
    sleeper: Arc<dyn Sleeper>,
}

impl<E> RetryPolicy<E> {
    /// Create a new builder for configuring a retry policy.
    pub fn builder() -> RetryPolicyBuilder<E> {
        RetryPolicyBuilder::default()
    }

    /// The configured retry budget.
    pub fn retries(&self) -> u32 {
        self.retries
    }
}

impl<E> Default for RetryPolicy<E> {
    /// The default policy: ten retries, no delay, no observer.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .field("backoff", &self.backoff.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}

impl<E> RetryPolicy<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Invoke `operation` until it succeeds, bails, or the budget is spent.
    ///
    /// The operation receives a [`Bail`] handle and the 1-based attempt
    /// number. After each failed attempt that still has budget left, the
    /// backoff generator is consulted for a delay, the observer (if any) is
    /// notified with the error, the attempt number, and that delay, and the
    /// loop suspends for the delay before the next attempt. A bail engaged
    /// during an attempt wins over whatever the attempt returned.
    ///
    /// See [`RetryError`] for the terminal failure states.
    pub async fn run<T, F, Fut>(&mut self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(Bail<E>, u32) -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
    {
        let bail = Bail::new();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let outcome = operation(bail.clone(), attempt).await;

            // Bail takes priority over the invocation's own outcome.
            if let Some(reason) = bail.take() {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, "operation bailed out of the retry sequence");
                return Err(RetryError::Bailed { reason });
            }

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if attempt > self.retries {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, error = %error, "retry budget exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    error,
                });
            }

            let delay = match self.backoff.as_mut() {
                Some(backoff) => backoff.delay(attempt),
                None => Duration::ZERO,
            };

            if let Some(on_retry) = self.on_retry.as_mut() {
                if let Err(abort) = on_retry(&error, attempt, delay) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, error = %abort, "observer aborted the retry sequence");
                    return Err(RetryError::ObserverAborted {
                        attempt,
                        error: abort,
                    });
                }
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "attempt failed, retrying"
            );

            if !delay.is_zero() {
                self.sleeper.sleep(delay).await;
            }
        }
    }
}

/// Retry `operation` under the default policy: ten retries, no delay, no
/// observer.
///
/// # Examples
///
/// ```rust
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let value = tenax::retry(|_bail, attempt| async move {
///     if attempt < 4 {
///         Err(std::io::Error::other("warming up"))
///     } else {
///         Ok(attempt)
///     }
/// })
/// .await?;
/// assert_eq!(value, 4);
/// # Ok(())
/// # }
/// ```
pub async fn retry<T, E, F, Fut>(operation: F) -> Result<T, RetryError<E>>
where
    E: std::error::Error + Send + Sync + 'static,
    F: FnMut(Bail<E>, u32) -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
{
    let mut policy = RetryPolicy::default();
    policy.run(operation).await
}

/// Builder for configuring [`RetryPolicy`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tenax::RetryPolicy;
/// use tenax::backoff::ConstantBackoff;
///
/// let policy = RetryPolicy::<std::io::Error>::builder()
///     .retries(5)
///     .backoff(ConstantBackoff::new(Duration::from_millis(100)))
///     .on_retry(|_error, attempt, _delay| {
///         if attempt >= 3 {
///             Err(std::io::Error::other("three strikes"))
///         } else {
///             Ok(())
///         }
///     })
///     .build();
/// ```
pub struct RetryPolicyBuilder<E> {
    retries: Option<u32>,
    backoff: Option<Box<dyn Backoff + Send>>,
    on_retry: Option<OnRetry<E>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl<E> Default for RetryPolicyBuilder<E> {
    fn default() -> Self {
        Self {
            retries: None,
            backoff: None,
            on_retry: None,
            sleeper: None,
        }
    }
}

impl<E> RetryPolicyBuilder<E> {
    /// Set the number of additional attempts allowed after the first.
    ///
    /// Zero means a single attempt with no retry. Default: 10
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the backoff generator consulted after each failed attempt.
    ///
    /// Default: none, meaning zero delay between attempts.
    pub fn backoff<B>(mut self, backoff: B) -> Self
    where
        B: Backoff + Send + 'static,
    {
        self.backoff = Some(Box::new(backoff));
        self
    }

    /// Set the observer notified on each failed-but-retriable attempt.
    ///
    /// Default: none.
    pub fn on_retry<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&E, u32, Duration) -> Result<(), E> + Send + 'static,
    {
        self.on_retry = Some(Box::new(observer));
        self
    }

    /// Replace the timer used for inter-attempt delays.
    ///
    /// Default: [`TokioSleeper`].
    pub fn sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Some(Arc::new(sleeper));
        self
    }

    /// Build the [`RetryPolicy`] instance.
    ///
    /// Uses default values for any unset parameters.
    pub fn build(self) -> RetryPolicy<E> {
        RetryPolicy {
            retries: self.retries.unwrap_or(DEFAULT_RETRIES),
            backoff: self.backoff,
            on_retry: self.on_retry,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
        }
    }
}
