//! # ServiceContext: the routine's view of its run.
//!
//! Handed to [`Service::run`](super::Service::run) on the worker runtime.
//! Cloneable; clones refer to the same run.
//!
//! ## Rules
//! - [`ready`](ServiceContext::ready) is set-once: the first call signals the
//!   readiness gate and publishes `ServiceRunning`; later calls are no-ops.
//! - [`spawn`](ServiceContext::spawn) must be called from the service thread
//!   (the registry belongs to the cooperative runtime).
//! - The stop signal is observed, never set, through this type; stopping is
//!   the shutdown sequencer's job.

use std::future::Future;
use std::sync::Arc;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::core::registry::TaskRegistry;
use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};

/// Per-run handles available to the service routine.
#[derive(Clone)]
pub struct ServiceContext {
    pub(crate) name: Arc<str>,
    pub(crate) ready: CancellationToken,
    pub(crate) stop: CancellationToken,
    pub(crate) registry: Arc<TaskRegistry>,
    pub(crate) bus: Bus,
}

impl ServiceContext {
    /// The service instance's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signals that initialization is complete and bridged calls may proceed.
    ///
    /// Idempotent; only the first call per run has any effect. Once set, the
    /// gate stays set for the rest of the run.
    pub fn ready(&self) {
        if !self.ready.is_cancelled() {
            self.ready.cancel();
            self.bus.publish(
                Event::new(EventKind::ServiceRunning).with_service(Arc::clone(&self.name)),
            );
        }
    }

    /// True once the readiness gate has been signaled.
    pub fn is_ready(&self) -> bool {
        self.ready.is_cancelled()
    }

    /// Suspends until a stop is requested.
    ///
    /// Resolves immediately if the stop signal is already set.
    pub async fn stopped(&self) {
        self.stop.cancelled().await;
    }

    /// True once a stop has been requested.
    pub fn is_stopping(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Registers and schedules a named sub-task on the worker runtime.
    ///
    /// Must be called from the service thread. The returned [`AbortHandle`]
    /// cancels this one task; the whole group is cancelled by
    /// [`ServiceThread::cancel_tasks`](crate::ServiceThread::cancel_tasks).
    pub fn spawn<F>(&self, name: impl Into<Arc<str>>, fut: F) -> AbortHandle
    where
        F: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.registry.spawn(name, fut)
    }
}
