//! Early termination of a retry sequence from inside the operation.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle for bailing out of a retry sequence.
///
/// A fresh token is created for every orchestrator run and a clone is passed
/// into each invocation of the operation. Calling [`Bail::out`] (or
/// [`Bail::out_without_reason`]) marks the sequence for termination: once the
/// current invocation returns, the orchestrator stops retrying and fails with
/// the recorded reason, whatever the invocation itself returned.
///
/// Engaging the token does not cancel the in-flight operation; the operation
/// is expected to return promptly after bailing. Only the first engagement
/// records a reason; later calls are ignored.
pub struct Bail<E> {
    slot: Arc<Mutex<Slot<E>>>,
}

enum Slot<E> {
    Armed,
    Engaged { reason: Option<E> },
}

impl<E> Bail<E> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::Armed)),
        }
    }

    /// Terminate the retry sequence with `reason` as the final failure.
    pub fn out(&self, reason: E) {
        self.engage(Some(reason));
    }

    /// Terminate the retry sequence without giving a reason.
    ///
    /// The final failure displays the fixed message
    /// `"Bailed without giving a reason."`.
    pub fn out_without_reason(&self) {
        self.engage(None);
    }

    fn engage(&self, reason: Option<E>) {
        let mut slot = self.lock();
        if let Slot::Armed = *slot {
            *slot = Slot::Engaged { reason };
        }
    }

    /// Poll the token, taking the recorded reason if it was engaged.
    pub(crate) fn take(&self) -> Option<Option<E>> {
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Armed) {
            Slot::Armed => None,
            Slot::Engaged { reason } => Some(reason),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> Clone for Bail<E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<E> fmt::Debug for Bail<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engaged = matches!(*self.lock(), Slot::Engaged { .. });
        f.debug_struct("Bail").field("engaged", &engaged).finish()
    }
}
