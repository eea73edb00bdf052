//! Error types used by the threadbound runtime and services.
//!
//! This module defines four error enums, one per failure surface:
//!
//! - [`StartError`] — the worker thread could not be started.
//! - [`CallError`] — a bridged cross-thread call could not be completed.
//! - [`StopError`] — the shutdown sequence failed after exhausting escalation.
//! - [`ServiceError`] — errors raised by the service routine or its sub-tasks.
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. Errors local to a single bridged call ([`CallError`])
//! never affect the worker thread or other callers.

use std::time::Duration;
use thiserror::Error;

/// # Errors starting the worker thread.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// `start()` was called on an instance whose thread was already spawned.
    ///
    /// A `ServiceThread` runs at most once; build a new instance to restart.
    #[error("service thread already started")]
    AlreadyStarted,

    /// The OS refused to spawn the thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::AlreadyStarted => "start_already_started",
            StartError::Spawn(_) => "start_spawn_failed",
        }
    }
}

/// # Errors produced by the cross-thread call bridge.
///
/// These are raised synchronously to the specific caller; they do not tear
/// down the worker thread, and other in-flight calls are unaffected.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CallError {
    /// The worker thread is not running (never started, or already exited).
    #[error("service thread is not alive")]
    NotAlive,

    /// The worker is alive but the service never signaled readiness within
    /// `init_timeout`. Distinct from [`CallError::NotAlive`]: the thread may
    /// still be initializing, and later callers may succeed.
    #[error("service not ready after {waited:?}")]
    ReadyTimeout {
        /// How long the caller waited for the readiness gate.
        waited: Duration,
    },

    /// `call()` was invoked from the service thread itself.
    ///
    /// Blocking on the bridge from inside the cooperative runtime would
    /// deadlock: the wrapper can only run once the caller yields, and the
    /// caller never does.
    #[error("bridged call issued from the service thread itself")]
    Reentrant,

    /// The runtime was torn down before the submitted wrapper ran.
    #[error("service thread shut down before the call executed")]
    Dropped,
}

impl CallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use threadbound::CallError;
    ///
    /// assert_eq!(CallError::NotAlive.as_label(), "call_not_alive");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::NotAlive => "call_not_alive",
            CallError::ReadyTimeout { .. } => "call_ready_timeout",
            CallError::Reentrant => "call_reentrant",
            CallError::Dropped => "call_dropped",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::NotAlive => "worker thread not alive".to_string(),
            CallError::ReadyTimeout { waited } => {
                format!("readiness gate not set after {waited:?}")
            }
            CallError::Reentrant => "call from the service thread".to_string(),
            CallError::Dropped => "call dropped during shutdown".to_string(),
        }
    }
}

/// # Errors produced by the shutdown sequencer.
///
/// Graceful-stop misses escalate deterministically to forced stop; only
/// exhaustion of the forced path is reported as an error.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StopError {
    /// Forced termination did not bring the thread down within
    /// `force_stop_timeout`.
    ///
    /// The service routine is stuck in a non-cancellable state (e.g. a poll
    /// that never yields, or blocking native code). Unrecoverable from this
    /// component; the caller must escalate to a process-level kill.
    #[error("forced stop did not complete within {timeout:?}")]
    ForceStopTimeout {
        /// The configured force-stop window that elapsed.
        timeout: Duration,
    },

    /// The worker thread is alive but its runtime handle slot is empty, so
    /// there is nothing to abort. Signals a fault in the termination
    /// mechanism itself, not a normal timeout.
    #[error("worker thread alive but runtime handle unavailable")]
    HandleUnavailable,
}

impl StopError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use threadbound::StopError;
    ///
    /// let err = StopError::ForceStopTimeout { timeout: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "stop_force_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StopError::ForceStopTimeout { .. } => "stop_force_timeout",
            StopError::HandleUnavailable => "stop_handle_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StopError::ForceStopTimeout { timeout } => {
                format!("thread survived forced stop for {timeout:?}")
            }
            StopError::HandleUnavailable => "runtime handle unavailable".to_string(),
        }
    }
}

/// # Errors produced by the service routine and its sub-tasks.
///
/// Returned from [`Service::run`](crate::Service::run) and from registered
/// sub-task futures. An `Err` from the service routine is fatal to the run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Service or sub-task execution failed.
    #[error("service failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Service or sub-task observed cancellation and exited early.
    ///
    /// Treated as a graceful outcome by the supervisor, not a failure.
    #[error("service cancelled")]
    Canceled,
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Fail`] from any displayable error.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        ServiceError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Canceled => "service_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::Fail { error } => format!("error: {error}"),
            ServiceError::Canceled => "cancelled".to_string(),
        }
    }
}
