//! # Supervising wrapper: the worker runtime's root task.
//!
//! Runs the user's service routine as a registered sub-task and sequences the
//! run around the readiness and stop signals.
//!
//! ```text
//! supervise()
//!   ├─► publish ServiceStarting
//!   ├─► registry.spawn("<name>::run", routine)      (done via oneshot)
//!   ├─► self-check: ready OR stop OR routine-exit, bounded by init_timeout
//!   │       └─ timeout → publish ReadyCheckTimedOut (warn, continue)
//!   ├─► suspend until stop requested (or routine exit, whichever first)
//!   ├─► await routine outcome
//!   │       ├─ Ok / Canceled / aborted → tolerated
//!   │       └─ Err → publish ServiceFailed, return Err (thread dies)
//!   └─► publish ServiceDone, return
//! ```
//!
//! ## Rules
//! - A routine error is fatal **immediately**, even before a stop is
//!   requested; the thread does not linger on a dead service.
//! - A routine that completes `Ok` early keeps the thread resident until a
//!   stop is requested, so bridged calls keep working.
//! - Cancellation of the routine (group cancel, forced stop) is a normal
//!   outcome, not a failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;

use crate::error::ServiceError;
use crate::events::{Event, EventKind};
use crate::service::{Service, ServiceContext};

/// Routine outcome as observed through the completion channel.
///
/// `Err(RecvError)` means the routine task was aborted before it could
/// report — tolerated as cancellation.
type RoutineOutcome = Result<Result<(), ServiceError>, oneshot::error::RecvError>;

pub(crate) async fn supervise<S: Service>(
    service: Arc<S>,
    ctx: ServiceContext,
    init_timeout: Duration,
) -> Result<(), ServiceError> {
    let routine_name: Arc<str> = Arc::from(format!("{}::run", ctx.name()));
    ctx.bus.publish(
        Event::new(EventKind::ServiceStarting)
            .with_service(Arc::clone(&ctx.name))
            .with_task(Arc::clone(&routine_name)),
    );

    let (done_tx, mut done_rx) = oneshot::channel();
    let run_ctx = ctx.clone();
    ctx.registry.spawn(routine_name, async move {
        let _ = done_tx.send(service.run(run_ctx).await);
        Ok(())
    });

    // Startup self-check: readiness, stop, or routine exit within
    // init_timeout. Missing the deadline is logged, never raised; callers of
    // the bridge enforce their own readiness deadline.
    let ready = ctx.ready.clone();
    let stop = ctx.stop.clone();
    let came_up = async {
        tokio::select! {
            _ = ready.cancelled() => {}
            _ = stop.cancelled() => {}
        }
    };
    let mut early: Option<RoutineOutcome> = None;
    tokio::select! {
        res = &mut done_rx => early = Some(res),
        checked = time::timeout(init_timeout, came_up) => {
            if checked.is_err() {
                ctx.bus.publish(
                    Event::new(EventKind::ReadyCheckTimedOut)
                        .with_service(Arc::clone(&ctx.name))
                        .with_timeout(init_timeout),
                );
            }
        }
    }

    let outcome: RoutineOutcome = match early {
        Some(res) => res,
        None => {
            tokio::select! {
                res = &mut done_rx => res,
                _ = ctx.stop.cancelled() => done_rx.await,
            }
        }
    };

    match outcome {
        Ok(Ok(())) | Ok(Err(ServiceError::Canceled)) | Err(_) => {}
        Ok(Err(e)) => {
            ctx.bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_service(Arc::clone(&ctx.name))
                    .with_reason(e.to_string()),
            );
            return Err(e);
        }
    }

    // Routine is done; stay resident until the stop signal so the bridge
    // keeps serving calls (no-op when stop triggered the wake-up above).
    ctx.stop.cancelled().await;

    ctx.bus
        .publish(Event::new(EventKind::ServiceDone).with_service(Arc::clone(&ctx.name)));
    Ok(())
}
