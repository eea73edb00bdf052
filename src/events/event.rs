//! # Runtime events emitted by the service thread.
//!
//! The [`EventKind`] enum classifies events across the run's phases:
//! - **Service lifecycle**: routine scheduled, readiness reached, routine done
//! - **Shutdown**: stop requested, forced-stop escalation, forced stop landed
//! - **Sub-tasks**: spawned, failed, mass cancellation start/finish
//! - **Subscribers**: fan-out overflow and panic isolation
//!
//! The [`Event`] struct carries the kind plus optional metadata (service
//! instance name, task name, reason, timeout).
//!
//! ## Ordering guarantees
//! Each published event gets a per-bus sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore order when events from one instance are
//! delivered out of order; sequences from different instances are unrelated.
//!
//! ## Example
//! ```rust
//! use threadbound::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_service("cache")
//!     .with_task("cache::refresh")
//!     .with_reason("backend unreachable");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("cache::refresh"));
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Service lifecycle ===
    /// Service routine was scheduled on the worker runtime.
    ///
    /// Sets: `service`, `task` (routine task name), `at`, `seq`.
    ServiceStarting,

    /// Service signaled the readiness gate; bridged calls will now proceed.
    ///
    /// Sets: `service`, `at`, `seq`.
    ServiceRunning,

    /// Self-check: readiness was not reached within `init_timeout` and stop
    /// was never requested. Logged, never raised; the run continues.
    ///
    /// Sets: `service`, `timeout_ms`, `at`, `seq`.
    ReadyCheckTimedOut,

    /// Service routine finished and the supervising wrapper is returning.
    ///
    /// Sets: `service`, `at`, `seq`.
    ServiceDone,

    /// Service routine returned an error (or panicked); fatal to the run.
    ///
    /// Sets: `service`, `reason`, `at`, `seq`.
    ServiceFailed,

    // === Shutdown ===
    /// A stop was requested (stop signal set).
    ///
    /// Sets: `service`, `at`, `seq`.
    StopRequested,

    /// Graceful join timed out; the root task abort was injected.
    ///
    /// Sets: `service`, `at`, `seq`.
    ForceStopRequested,

    /// The worker thread exited via the forced-stop path.
    ///
    /// Sets: `service`, `at`, `seq`.
    ThreadForceStopped,

    // === Sub-tasks ===
    /// A sub-task was registered and scheduled.
    ///
    /// Sets: `service`, `task`, `at`, `seq`.
    TaskSpawned,

    /// A sub-task returned an error or panicked.
    ///
    /// Sets: `service`, `task`, `reason`, `at`, `seq`.
    TaskFailed,

    /// Mass cancellation of registered sub-tasks was requested.
    ///
    /// Sets: `service`, `at`, `seq`.
    CancelTasksStarting,

    /// Mass cancellation finished; every registered sub-task was joined.
    ///
    /// Sets: `service`, `reason` (cancelled/total counts), `at`, `seq`.
    CancelTasksDone,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`, `at`, `seq`.
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason`, `at`, `seq`.
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: per-bus monotonic sequence, stamped at publish time
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Per-bus, monotonically increasing sequence number (0 until published).
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the service instance, if applicable.
    pub service: Option<Arc<str>>,
    /// Name of the sub-task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, counters, overflow details).
    pub reason: Option<Arc<str>>,
    /// Relevant timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp.
    ///
    /// The sequence number is assigned by [`Bus::publish`](super::Bus::publish).
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: 0,
            at: SystemTime::now(),
            kind,
            service: None,
            task: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches the service instance name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a sub-task (or subscriber) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub(crate) fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let ev = Event::new(EventKind::ReadyCheckTimedOut)
            .with_service("svc")
            .with_timeout(Duration::from_millis(11_250));

        assert_eq!(ev.kind, EventKind::ReadyCheckTimedOut);
        assert_eq!(ev.service.as_deref(), Some("svc"));
        assert_eq!(ev.timeout_ms, Some(11_250));
        assert_eq!(ev.seq, 0);
    }

    #[test]
    fn timeout_saturates_at_u32_max() {
        let ev = Event::new(EventKind::ServiceStarting).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }
}
