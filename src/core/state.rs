//! Per-run shared state and the shutdown state machine's terminal values.
//!
//! [`RunState`] is allocated on the worker thread once its runtime exists and
//! torn down when the thread exits; other threads observe it through a shared
//! slot and only interact with the runtime via its thread-safe handle.

use std::sync::Arc;
use std::thread::ThreadId;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use super::registry::TaskRegistry;

/// Handles to one live run, shared across threads by reference.
///
/// Everything here is safe to touch from any thread: the runtime [`Handle`]
/// is the thread-safe submission primitive, the tokens are cross-thread
/// set/wait signals, and the registry is only mutated on the worker thread.
#[derive(Clone)]
pub(crate) struct RunState {
    /// Thread-safe submission primitive of the worker runtime.
    pub(crate) handle: Handle,
    /// Abort handle of the root supervising task; the forced-stop injection
    /// point.
    pub(crate) abort: AbortHandle,
    /// Readiness gate: set exactly once per run, never cleared.
    pub(crate) ready: CancellationToken,
    /// Stop signal: set at most once per run, never cleared.
    pub(crate) stop: CancellationToken,
    /// Sub-task registry for mass cancellation.
    pub(crate) registry: Arc<TaskRegistry>,
    /// The worker thread's id, used to reject re-entrant bridged calls.
    pub(crate) thread_id: ThreadId,
}

/// How a [`stop_and_join`](crate::ServiceThread::stop_and_join) attempt ended.
///
/// ```text
/// RUNNING ──► STOP_REQUESTED ──► GracefullyStopped
///                   │
///                   ├──► StillRunning          (then_force_stop = false)
///                   └──► FORCE_STOP_REQUESTED ──► ForceStopped
///                                              └─► Err(ForceStopTimeout)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The worker thread was not running; nothing to do.
    NotRunning,
    /// The thread exited within the graceful-join window.
    GracefullyStopped,
    /// Graceful join timed out and forced stop was declined by the caller;
    /// the thread is still running and remains the caller's responsibility.
    StillRunning,
    /// The thread exited only after the forced-stop injection.
    ForceStopped,
}
