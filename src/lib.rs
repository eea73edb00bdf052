//! # threadbound
//!
//! **Threadbound** runs one async service on a dedicated OS thread and
//! bridges synchronous callers from any other thread into it.
//!
//! It provides primitives to host a cooperative service off the caller's
//! thread, gate external access on the service's own readiness signal,
//! execute closures atomically on the service's runtime with results (and
//! panics) returned to the caller, and stop the whole arrangement
//! gracefully with a bounded forced fallback. The crate is designed as a
//! building block for embedding async components into synchronous hosts.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  external threads                 │  worker OS thread
//!  ────────────────                 │  ──────────────────────────────────
//!                                   │  ┌──────────────────────────────┐
//!  ServiceThread::start() ─────────►│  │ current-thread tokio runtime │
//!                                   │  │                              │
//!                                   │  │  supervise() (root task)     │
//!                                   │  │    ├─► Service::run(ctx)     │
//!                                   │  │    │     ├─ ctx.ready()      │
//!                                   │  │    │     └─ ctx.spawn(...) ──┼──► TaskRegistry
//!                                   │  │    └─► readiness self-check  │
//!                                   │  │                              │
//!  call(f) ──wait ready──► spawn ──►│  │  wrapper: f(&service)        │
//!      ▲                            │  │    (no await points)         │
//!      └───────── oneshot ◄─────────│──┘         │
//!                                   │            ▼
//!                                   │  ┌──────────────────────────────┐
//!  stop_and_join() ──► stop token ─►│  │ Bus (broadcast events)       │
//!        │                          │  │   └─► SubscriberSet workers  │
//!        └─ escalation: abort() ───►│  │         (per-sub queues)     │
//!                                   │  └──────────────────────────────┘
//! ```
//!
//! ### Stop sequence
//! ```text
//! stop_and_join(timeout, then_force_stop):
//!   ├─ thread not alive ─────────────────────► NotRunning
//!   ├─ set stop token, publish StopRequested
//!   ├─ join(timeout) succeeds ───────────────► GracefullyStopped
//!   ├─ then_force_stop == false ─────────────► StillRunning
//!   ├─ publish ForceStopRequested, abort the root task
//!   ├─ join(force_stop_timeout) succeeds ────► ForceStopped
//!   └─ thread still alive ───────────────────► Err(ForceStopTimeout)
//! ```
//!
//! ## Features
//! | Area               | Description                                                           | Key types / traits                          |
//! |--------------------|-----------------------------------------------------------------------|---------------------------------------------|
//! | **Hosting**        | Run a service on its own thread with its own cooperative runtime.     | [`ServiceThread`], [`ServiceThreadBuilder`] |
//! | **Services**       | Define services as trait impls or closures.                           | [`Service`], [`ServiceFn`], [`ServiceRef`]  |
//! | **Call bridge**    | Execute closures on the service's runtime from any thread.            | [`ServiceThread::call`], [`ServiceThread::submit`] |
//! | **Shutdown**       | Graceful stop with bounded forced fallback.                           | [`StopOutcome`], [`ServiceThread::stop_and_join`] |
//! | **Sub-tasks**      | Register and mass-cancel tasks the service spawns.                    | [`ServiceContext::spawn`], [`ServiceThread::cancel_tasks`] |
//! | **Subscriber API** | Hook into lifecycle events (logging, metrics, custom subscribers).    | [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**         | Typed errors for startup, bridged calls, stopping, and the routine.   | [`StartError`], [`CallError`], [`StopError`], [`ServiceError`] |
//! | **Configuration**  | Centralize timeouts and bus capacity.                                 | [`ServiceConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use threadbound::{ServiceContext, ServiceError, ServiceFn, ServiceThread, StopOutcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Define a service: signal readiness, then wait for the stop request.
//!     let svc = ServiceFn::arc("echo", |ctx: ServiceContext| async move {
//!         ctx.ready();
//!         ctx.stopped().await;
//!         Ok::<_, ServiceError>(())
//!     });
//!
//!     // Host it on a dedicated thread.
//!     let st = ServiceThread::new(svc);
//!     st.start()?;
//!
//!     // Bridge a closure onto the service's runtime from this thread.
//!     let answer = st.call(|_svc| 6 * 7)?;
//!     assert_eq!(answer, 42);
//!
//!     // Stop: graceful first, forced fallback if the service ignores it.
//!     let outcome = st.stop_and_join(Some(Duration::from_secs(5)), true)?;
//!     assert_eq!(outcome, StopOutcome::GracefullyStopped);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod service;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{ServiceConfig, ServiceThread, ServiceThreadBuilder, StopOutcome};
pub use error::{CallError, ServiceError, StartError, StopError};
pub use events::{Bus, Event, EventKind};
pub use service::{Service, ServiceContext, ServiceFn, ServiceRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
