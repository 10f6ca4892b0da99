//! Terminal failures of a retry sequence.

use thiserror::Error;

/// Message displayed by a bail that gave no reason.
pub const BAILED_WITHOUT_REASON: &str = "Bailed without giving a reason.";

/// Why a retry sequence ended in failure.
///
/// Every failure path of the orchestrator surfaces here; nothing is logged
/// or recovered internally.
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error,
{
    /// The retry budget was spent and the final attempt still failed.
    #[error("retry budget exhausted after {attempts} attempts: {error}")]
    Exhausted {
        /// Number of attempts made, including the first.
        attempts: u32,
        /// The error returned by the final attempt.
        error: E,
    },

    /// The operation bailed out of the sequence.
    #[error("{}", .reason.as_ref().map_or_else(|| BAILED_WITHOUT_REASON.to_owned(), ToString::to_string))]
    Bailed {
        /// The reason passed to [`Bail::out`](crate::Bail::out), if any.
        reason: Option<E>,
    },

    /// The `on_retry` observer aborted the sequence.
    #[error("retry aborted by observer after attempt {attempt}: {error}")]
    ObserverAborted {
        /// The attempt whose failure the observer was inspecting.
        attempt: u32,
        /// The error the observer returned.
        error: E,
    },
}

impl<E> RetryError<E>
where
    E: std::error::Error,
{
    /// The underlying error, if one was recorded.
    ///
    /// Only a bail that gave no reason carries none.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Exhausted { error, .. } => Some(error),
            RetryError::Bailed { reason } => reason,
            RetryError::ObserverAborted { error, .. } => Some(error),
        }
    }

    /// Whether the sequence ended because the operation bailed.
    pub fn is_bailed(&self) -> bool {
        matches!(self, RetryError::Bailed { .. })
    }
}
