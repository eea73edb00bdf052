//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [service-starting] service=cache task=cache::run
//! [service-running] service=cache
//! [stop-requested] service=cache
//! [service-done] service=cache
//! [thread-force-stopped] service=cache
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions for debugging and demonstration purposes. Not intended for
/// production use — implement a custom [`Subscribe`] for structured logging
/// or metrics collection.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let svc = e.service.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ServiceStarting => {
                println!("[service-starting] service={svc} task={:?}", e.task);
            }
            EventKind::ServiceRunning => {
                println!("[service-running] service={svc}");
            }
            EventKind::ReadyCheckTimedOut => {
                println!(
                    "[ready-check-timed-out] service={svc} init_timeout_ms={:?}",
                    e.timeout_ms
                );
            }
            EventKind::ServiceDone => {
                println!("[service-done] service={svc}");
            }
            EventKind::ServiceFailed => {
                println!("[service-failed] service={svc} err={:?}", e.reason);
            }
            EventKind::StopRequested => {
                println!("[stop-requested] service={svc}");
            }
            EventKind::ForceStopRequested => {
                println!("[force-stop-requested] service={svc}");
            }
            EventKind::ThreadForceStopped => {
                println!("[thread-force-stopped] service={svc}");
            }
            EventKind::TaskSpawned => {
                println!("[task-spawned] service={svc} task={:?}", e.task);
            }
            EventKind::TaskFailed => {
                println!(
                    "[task-failed] service={svc} task={:?} err={:?}",
                    e.task, e.reason
                );
            }
            EventKind::CancelTasksStarting => {
                println!("[cancel-tasks-starting] service={svc}");
            }
            EventKind::CancelTasksDone => {
                println!("[cancel-tasks-done] service={svc} {:?}", e.reason);
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-fault] subscriber={:?} reason={:?}",
                    e.task, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
