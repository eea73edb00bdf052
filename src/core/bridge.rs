//! # Pending-call plumbing for the cross-thread bridge.
//!
//! A bridged call is one ephemeral [`PendingCall`]/[`CallSlot`] pair: the
//! calling thread keeps the pending half and parks on it; the worker runtime
//! receives the slot half inside the submitted wrapper and writes the outcome
//! exactly once.
//!
//! ```text
//! caller thread                         worker runtime
//! ─────────────                         ──────────────
//! (slot, pending) = pending_call()
//! handle.spawn(wrapper(slot)) ────────► wrapper runs, no await points:
//! pending.wait()  [parked]                 outcome = catch_unwind(f)
//!                 ◄──────────────────────  slot.complete(outcome)
//! value / resumed panic
//! ```
//!
//! ## Rules
//! - The slot is written **exactly once**; completing consumes it.
//! - A callee panic is carried across threads and resumed in the caller,
//!   unmodified — transparent passthrough, not wrapped.
//! - If the runtime drops the wrapper before it runs (shutdown), the caller
//!   observes [`CallError::Dropped`].

use std::any::Any;
use std::panic;

use tokio::sync::oneshot;

use crate::error::CallError;

/// Outcome of running the marshaled closure: value or panic payload.
type CallOutcome<R> = Result<R, Box<dyn Any + Send + 'static>>;

/// Write-once completion side, moved into the submitted wrapper.
pub(crate) struct CallSlot<R> {
    tx: oneshot::Sender<CallOutcome<R>>,
}

/// Caller-owned half of one in-flight bridged call.
pub(crate) struct PendingCall<R> {
    rx: oneshot::Receiver<CallOutcome<R>>,
}

/// Creates the two halves of a fresh pending call.
pub(crate) fn pending_call<R>() -> (CallSlot<R>, PendingCall<R>) {
    let (tx, rx) = oneshot::channel();
    (CallSlot { tx }, PendingCall { rx })
}

impl<R> CallSlot<R> {
    /// Records the outcome and signals the waiting caller.
    pub(crate) fn complete(self, outcome: CallOutcome<R>) {
        // The caller may have gone away (it never blocks with a timeout
        // today, but dropping the receiver is not an error).
        let _ = self.tx.send(outcome);
    }
}

impl<R> PendingCall<R> {
    /// Blocks the calling thread until the outcome is written.
    ///
    /// A captured panic is resumed here, in the caller's context. Must not be
    /// invoked from async code.
    pub(crate) fn wait(self) -> Result<R, CallError> {
        match self.rx.blocking_recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => Err(CallError::Dropped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_completed_value() {
        let (slot, pending) = pending_call::<u32>();
        std::thread::spawn(move || slot.complete(Ok(42)));
        assert_eq!(pending.wait().unwrap(), 42);
    }

    #[test]
    fn dropping_the_slot_yields_dropped() {
        let (slot, pending) = pending_call::<u32>();
        drop(slot);
        assert!(matches!(pending.wait(), Err(CallError::Dropped)));
    }

    #[test]
    fn panic_payload_is_resumed_in_the_caller() {
        let (slot, pending) = pending_call::<u32>();
        let payload = panic::catch_unwind(|| panic!("kaboom")).unwrap_err();
        slot.complete(Err(payload));

        let resumed = panic::catch_unwind(panic::AssertUnwindSafe(move || pending.wait()));
        let msg = resumed.unwrap_err();
        assert_eq!(msg.downcast_ref::<&str>(), Some(&"kaboom"));
    }
}
