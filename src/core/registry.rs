//! # Sub-task registry: tracks cooperative tasks for mass cancellation.
//!
//! The registry records every sub-task the service routine spawns so they can
//! be cancelled as a group during shutdown.
//!
//! ```text
//! ServiceContext::spawn(name, fut) ──► TaskRegistry::spawn()
//!                                          │ handle.spawn(wrapper)
//!                                          ▼
//!                                   Vec<TaskEntry { name, join }>
//!                                          │
//! ServiceThread::cancel_tasks() ──► cancel_all(): abort → join each
//! ```
//!
//! ## Rules
//! - `spawn` must be called from the service thread (the cooperative runtime
//!   owns its tasks; the registry list is only mutated there).
//! - Cancellation is cooperative: `abort()` takes effect at the task's next
//!   suspension point. A task that never yields cannot be cancelled until it
//!   returns.
//! - `cancel_all` awaits every join and counts a cancelled join as success,
//!   never as failure.
//! - Finished entries are pruned lazily on the next `spawn`.

use std::sync::{Mutex, PoisonError};
use std::{future::Future, sync::Arc};

use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};

use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};

/// One registered sub-task.
struct TaskEntry {
    name: Arc<str>,
    join: JoinHandle<()>,
}

/// Registry of sub-tasks spawned by the service routine.
///
/// Created on the worker thread once the runtime exists; shared by reference
/// with other threads, which only reach it through the submission primitive.
pub(crate) struct TaskRegistry {
    service: Arc<str>,
    bus: Bus,
    handle: Handle,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl TaskRegistry {
    pub(crate) fn new(service: Arc<str>, bus: Bus, handle: Handle) -> Self {
        Self {
            service,
            bus,
            handle,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Schedules `fut` as a named sub-task and registers it.
    ///
    /// The returned [`AbortHandle`] requests cancellation of this one task;
    /// the registry keeps the join handle for [`cancel_all`](Self::cancel_all).
    /// A sub-task `Err` (other than `Canceled`) is published as
    /// [`EventKind::TaskFailed`].
    pub(crate) fn spawn<F>(&self, name: impl Into<Arc<str>>, fut: F) -> AbortHandle
    where
        F: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        let name = name.into();
        let bus = self.bus.clone();
        let service = Arc::clone(&self.service);
        let task_name = Arc::clone(&name);

        let join = self.handle.spawn(async move {
            match fut.await {
                Ok(()) | Err(ServiceError::Canceled) => {}
                Err(e) => bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_service(service)
                        .with_task(task_name)
                        .with_reason(e.to_string()),
                ),
            }
        });
        let abort = join.abort_handle();

        {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.retain(|t| !t.join.is_finished());
            tasks.push(TaskEntry {
                name: Arc::clone(&name),
                join,
            });
        }

        self.bus.publish(
            Event::new(EventKind::TaskSpawned)
                .with_service(Arc::clone(&self.service))
                .with_task(name),
        );
        abort
    }

    /// Aborts every unfinished registered task and awaits each join.
    ///
    /// Returns `(cancelled, total)`: how many joins ended in cancellation and
    /// how many entries were drained. A join that ends cancelled is success;
    /// a panicked join is published as [`EventKind::TaskFailed`].
    pub(crate) async fn cancel_all(&self) -> (usize, usize) {
        let entries: Vec<TaskEntry> = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.drain(..).collect()
        };

        for entry in &entries {
            if !entry.join.is_finished() {
                entry.join.abort();
            }
        }

        let total = entries.len();
        let mut cancelled = 0;
        for entry in entries {
            match entry.join.await {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => cancelled += 1,
                Err(err) => self.bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_service(Arc::clone(&self.service))
                        .with_task(entry.name)
                        .with_reason(format!("panic: {err}")),
                ),
            }
        }
        (cancelled, total)
    }

    /// Number of registered (possibly finished, not yet pruned) sub-tasks.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use super::*;

    fn registry(bus: &Bus) -> TaskRegistry {
        TaskRegistry::new(Arc::from("svc"), bus.clone(), Handle::current())
    }

    #[tokio::test]
    async fn cancel_all_aborts_running_tasks() {
        let bus = Bus::new(16);
        let reg = registry(&bus);

        let ticks = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&ticks);
        reg.spawn("ticker", async move {
            loop {
                seen.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        tokio::time::sleep(Duration::from_millis(25)).await;
        let (cancelled, total) = reg.cancel_all().await;
        assert_eq!((cancelled, total), (1, 1));

        let frozen = ticks.load(Ordering::SeqCst);
        assert!(frozen > 0);
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test]
    async fn finished_task_is_joined_not_counted_cancelled() {
        let bus = Bus::new(16);
        let reg = registry(&bus);

        reg.spawn("one-shot", async { Ok(()) });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let (cancelled, total) = reg.cancel_all().await;
        assert_eq!(total, 1);
        assert_eq!(cancelled, 0);
    }

    #[tokio::test]
    async fn failing_task_publishes_task_failed() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let reg = registry(&bus);

        reg.spawn("broken", async { Err(ServiceError::fail("boom")) });

        // TaskSpawned first, then TaskFailed from the wrapper.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::TaskSpawned);
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event published")
            .unwrap();
        assert_eq!(second.kind, EventKind::TaskFailed);
        assert_eq!(second.task.as_deref(), Some("broken"));
    }

    #[tokio::test]
    async fn abort_handle_cancels_single_task() {
        let bus = Bus::new(16);
        let reg = registry(&bus);

        let abort = reg.spawn("idle", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        abort.abort();

        let (cancelled, total) = reg.cancel_all().await;
        assert_eq!((cancelled, total), (1, 1));
        assert_eq!(reg.len(), 0);
    }
}
