//! # Service thread configuration.
//!
//! Provides [`ServiceConfig`], the per-instance settings bundle. All timeouts
//! must be set **before** [`start()`](crate::ServiceThread::start); a run
//! reads them once and never re-checks.
//!
//! ## Field semantics
//! - `init_timeout`: bounds every wait on the readiness gate — the host's
//!   startup self-check and each bridged call's readiness wait
//! - `force_stop_timeout`: bounds the wait for the forced-stop injection to
//!   take effect before the stop is reported failed
//! - `poll_interval`: granularity of the blocking poll loops (readiness wait,
//!   timed thread join) on external threads
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)

use std::time::Duration;

/// Per-instance configuration for a [`ServiceThread`](crate::ServiceThread).
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Maximum time to wait for the service to signal readiness.
    ///
    /// Raise this before `start()` when the service's setup is expected to be
    /// slow. Missing the deadline is a warning event for the host and a
    /// [`CallError::ReadyTimeout`](crate::CallError::ReadyTimeout) for bridge
    /// callers.
    pub init_timeout: Duration,

    /// Maximum time to wait for the worker thread to exit after the
    /// forced-stop injection.
    ///
    /// Exceeding it yields
    /// [`StopError::ForceStopTimeout`](crate::StopError::ForceStopTimeout):
    /// the thread is wedged beyond this component's reach.
    pub force_stop_timeout: Duration,

    /// Sleep between iterations of the external-thread poll loops.
    ///
    /// Smaller values tighten call latency around readiness and join
    /// detection at the cost of busier waiting.
    pub poll_interval: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Subscribers lagging behind more than this many events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Default for ServiceConfig {
    /// Default configuration:
    ///
    /// - `init_timeout = 11.25s`
    /// - `force_stop_timeout = 5s`
    /// - `poll_interval = 25ms`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_millis(11_250),
            force_stop_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(25),
            bus_capacity: 256,
        }
    }
}
