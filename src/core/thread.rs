//! # ServiceThread: host one async service on a dedicated OS thread.
//!
//! Owns the worker thread and the single-threaded cooperative runtime bound
//! to it, bridges synchronous callers from arbitrary threads into that
//! runtime, and sequences graceful-then-forced shutdown.
//!
//! ## High-level architecture
//! ```text
//! external threads                     worker OS thread
//! ────────────────                     ─────────────────────────────────
//! start() ───────────────────────────► thread_main():
//!                                        build current-thread runtime
//!                                        allocate ready/stop signals,
//!                                        registry, subscriber fan-out
//!                                        spawn supervise() as root task
//!                                        publish RunState, block_on(root)
//!
//! call(f) ──wait ready──► handle.spawn(wrapper) ──► f(&service) runs
//!          ◄────────────── oneshot ◄──────────────  atomically on the loop
//!
//! stop_and_join():
//!   request_stop() ──► stop token (cross-thread safe)
//!   timed join ─► GracefullyStopped
//!   else: abort(root) ─► timed join ─► ForceStopped | Err(ForceStopTimeout)
//! ```
//!
//! ## Rules
//! - Exactly two levels of concurrency: arbitrary external OS threads, and
//!   cooperative tasks inside the one worker thread.
//! - Calls from different external threads are serialized by the runtime but
//!   their relative order is enqueue order, not wall-clock call order.
//! - `call()` and `stop_and_join()` must not be invoked from the service
//!   thread itself; `call()` detects this and fails with
//!   [`CallError::Reentrant`].
//! - Forced stop is best-effort: it interrupts a service that still yields
//!   but ignores the stop signal; a poll that never yields is beyond reach
//!   and surfaces as [`StopError::ForceStopTimeout`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tokio::runtime;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::core::bridge;
use crate::core::config::ServiceConfig;
use crate::core::registry::TaskRegistry;
use crate::core::state::{RunState, StopOutcome};
use crate::core::supervise::supervise;
use crate::error::{CallError, ServiceError, StartError, StopError};
use crate::events::{Bus, Event, EventKind};
use crate::service::{Service, ServiceContext};
use crate::subscribers::{Subscribe, SubscriberSet};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the public handle and the worker thread.
pub(crate) struct Inner {
    pub(crate) name: Arc<str>,
    pub(crate) cfg: ServiceConfig,
    pub(crate) bus: Bus,
    /// Live-run handles; `Some` only while the worker thread runs.
    shared: Mutex<Option<RunState>>,
    /// Fatal service error recorded when a run dies.
    failure: Mutex<Option<ServiceError>>,
}

/// Hosts one [`Service`] on a dedicated worker thread.
///
/// Construction is cheap; nothing runs until [`start()`](Self::start). One
/// instance runs at most once — build a new one to restart a service.
pub struct ServiceThread<S: Service> {
    service: Arc<S>,
    inner: Arc<Inner>,
    subscribers: Mutex<Option<Vec<Arc<dyn Subscribe>>>>,
    join: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<S: Service> ServiceThread<S> {
    /// Creates a service thread with default configuration and no
    /// subscribers.
    pub fn new(service: Arc<S>) -> Self {
        Self::builder(service).build()
    }

    /// Starts building a service thread with custom name, configuration, or
    /// subscribers.
    pub fn builder(service: Arc<S>) -> super::builder::ServiceThreadBuilder<S> {
        super::builder::ServiceThreadBuilder::new(service)
    }

    pub(crate) fn assemble(
        service: Arc<S>,
        name: Arc<str>,
        cfg: ServiceConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self {
            service,
            inner: Arc::new(Inner {
                name,
                cfg,
                bus,
                shared: Mutex::new(None),
                failure: Mutex::new(None),
            }),
            subscribers: Mutex::new(Some(subscribers)),
            join: Mutex::new(None),
        }
    }

    /// The instance's name (used for the thread name and in events).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The instance's configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    /// Spawns the worker thread and returns immediately.
    ///
    /// On the worker, a fresh cooperative runtime is built, the per-run
    /// signals and registry are allocated, and the supervising wrapper starts
    /// as the root task.
    pub fn start(&self) -> Result<(), StartError> {
        let mut join = lock(&self.join);
        if join.is_some() {
            return Err(StartError::AlreadyStarted);
        }

        let subscribers = lock(&self.subscribers).take().unwrap_or_default();
        let inner = Arc::clone(&self.inner);
        let service = Arc::clone(&self.service);
        let handle = thread::Builder::new()
            .name(self.inner.name.to_string())
            .spawn(move || thread_main(inner, service, subscribers))?;
        *join = Some(handle);
        Ok(())
    }

    /// True while the worker thread is running.
    pub fn is_alive(&self) -> bool {
        matches!(&*lock(&self.join), Some(h) if !h.is_finished())
    }

    /// Invokes `f` with the service on the worker runtime and returns its
    /// result to this thread.
    ///
    /// Blocks until the service is ready (bounded by `init_timeout`) and
    /// then until `f` has run. The wrapper contains no await points, so `f`
    /// executes as one atomic unit relative to other scheduled work; it runs
    /// at most once. A panic in `f` is resumed here, in the caller,
    /// unmodified.
    pub fn call<F, R>(&self, f: F) -> Result<R, CallError>
    where
        F: FnOnce(&S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let rs = self.await_ready()?;
        let service = Arc::clone(&self.service);
        let (slot, pending) = bridge::pending_call();
        rs.handle.spawn(async move {
            slot.complete(panic::catch_unwind(AssertUnwindSafe(|| f(&service))));
        });
        pending.wait()
    }

    /// Fire-and-forget variant of [`call()`](Self::call): schedules `f` on
    /// the worker runtime without waiting for readiness or completion.
    pub fn submit<F>(&self, f: F) -> Result<(), CallError>
    where
        F: FnOnce(&S) + Send + 'static,
    {
        let rs = self.shared_state().ok_or(CallError::NotAlive)?;
        let service = Arc::clone(&self.service);
        rs.handle.spawn(async move { f(&service) });
        Ok(())
    }

    /// Requests cancellation of every registered sub-task (including the
    /// service routine's own task). Safe from any thread; returns once the
    /// request is scheduled, not once cancellation completes.
    pub fn cancel_tasks(&self) -> Result<(), CallError> {
        let rs = self.shared_state().ok_or(CallError::NotAlive)?;
        let bus = self.inner.bus.clone();
        let name = Arc::clone(&self.inner.name);
        bus.publish(Event::new(EventKind::CancelTasksStarting).with_service(Arc::clone(&name)));

        let registry = Arc::clone(&rs.registry);
        rs.handle.spawn(async move {
            let (cancelled, total) = registry.cancel_all().await;
            bus.publish(
                Event::new(EventKind::CancelTasksDone)
                    .with_service(name)
                    .with_reason(format!("cancelled={cancelled} total={total}")),
            );
        });
        Ok(())
    }

    /// Sets the stop signal without joining. Safe from any thread.
    ///
    /// Returns `false` when there is no live run to signal (not yet started,
    /// still booting, or already exited).
    pub fn request_stop(&self) -> bool {
        match self.shared_state() {
            Some(rs) => {
                if !rs.stop.is_cancelled() {
                    self.inner.bus.publish(
                        Event::new(EventKind::StopRequested)
                            .with_service(Arc::clone(&self.inner.name)),
                    );
                    rs.stop.cancel();
                }
                true
            }
            None => false,
        }
    }

    /// Stops the service, preferring the graceful path.
    ///
    /// 1. Not alive → no-op, [`StopOutcome::NotRunning`].
    /// 2. Set the stop signal, then join for up to `timeout`
    ///    (`None` = wait indefinitely) → [`StopOutcome::GracefullyStopped`].
    /// 3. Still alive, `then_force_stop == false` →
    ///    [`StopOutcome::StillRunning`]; the thread stays the caller's
    ///    responsibility.
    /// 4. Otherwise inject the forced stop (abort the root task) and join for
    ///    up to `force_stop_timeout` → [`StopOutcome::ForceStopped`], or
    ///    [`StopError::ForceStopTimeout`] if the thread survives even that.
    ///
    /// Must not be called from the service thread itself.
    pub fn stop_and_join(
        &self,
        timeout: Option<Duration>,
        then_force_stop: bool,
    ) -> Result<StopOutcome, StopError> {
        if self.reap_if_finished() {
            return Ok(StopOutcome::NotRunning);
        }

        // Graceful phase. The stop request is retried while polling: a start
        // racing us may not have published its run state yet.
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut requested = self.request_stop();
        loop {
            if self.reap_if_finished() {
                return Ok(StopOutcome::GracefullyStopped);
            }
            if !requested {
                requested = self.request_stop();
            }
            if let Some(d) = deadline {
                if Instant::now() >= d {
                    break;
                }
            }
            thread::sleep(self.inner.cfg.poll_interval);
        }

        if !then_force_stop {
            return Ok(StopOutcome::StillRunning);
        }

        let rs = self.shared_state().ok_or(StopError::HandleUnavailable)?;
        self.inner.bus.publish(
            Event::new(EventKind::ForceStopRequested).with_service(Arc::clone(&self.inner.name)),
        );
        rs.abort.abort();

        let force = self.inner.cfg.force_stop_timeout;
        let deadline = Instant::now() + force;
        loop {
            if self.reap_if_finished() {
                return Ok(StopOutcome::ForceStopped);
            }
            if Instant::now() >= deadline {
                return Err(StopError::ForceStopTimeout { timeout: force });
            }
            thread::sleep(self.inner.cfg.poll_interval);
        }
    }

    /// Retrieves the fatal error of a dead run, if any.
    ///
    /// A service routine `Err` kills the worker thread; this is where the
    /// embedder picks it up afterwards. Consuming: a second call returns
    /// `None`.
    pub fn take_failure(&self) -> Option<ServiceError> {
        lock(&self.inner.failure).take()
    }

    fn shared_state(&self) -> Option<RunState> {
        lock(&self.inner.shared).clone()
    }

    /// Polls for the readiness gate while the worker is alive, bounded by
    /// `init_timeout`.
    fn await_ready(&self) -> Result<RunState, CallError> {
        let waited = self.inner.cfg.init_timeout;
        let deadline = Instant::now() + waited;
        loop {
            if !self.is_alive() {
                return Err(CallError::NotAlive);
            }
            if let Some(rs) = self.shared_state() {
                if rs.thread_id == thread::current().id() {
                    return Err(CallError::Reentrant);
                }
                if rs.ready.is_cancelled() {
                    return Ok(rs);
                }
            }
            if Instant::now() >= deadline {
                return Err(CallError::ReadyTimeout { waited });
            }
            thread::sleep(self.inner.cfg.poll_interval);
        }
    }

    /// Reaps the join handle if the thread has exited. True when there is no
    /// live thread (never started, or just joined).
    fn reap_if_finished(&self) -> bool {
        let mut join = lock(&self.join);
        let finished = match &*join {
            None => return true,
            Some(h) => h.is_finished(),
        };
        if !finished {
            return false;
        }
        if let Some(h) = join.take() {
            if h.join().is_err() {
                let err = ServiceError::fail("worker thread panicked");
                *lock(&self.inner.failure) = Some(err);
            }
        }
        true
    }
}

/// Worker thread body: builds the runtime, allocates per-run state, runs the
/// supervising wrapper to completion, and tears everything down.
fn thread_main<S: Service>(
    inner: Arc<Inner>,
    service: Arc<S>,
    subscribers: Vec<Arc<dyn Subscribe>>,
) {
    let bus = inner.bus.clone();
    let rt = match runtime::Builder::new_current_thread().enable_time().build() {
        Ok(rt) => rt,
        Err(e) => {
            let reason = format!("runtime build failed: {e}");
            bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_service(Arc::clone(&inner.name))
                    .with_reason(reason.clone()),
            );
            *lock(&inner.failure) = Some(ServiceError::fail(reason));
            return;
        }
    };

    let ready = CancellationToken::new();
    let stop = CancellationToken::new();
    let registry = Arc::new(TaskRegistry::new(
        Arc::clone(&inner.name),
        bus.clone(),
        rt.handle().clone(),
    ));
    let ctx = ServiceContext {
        name: Arc::clone(&inner.name),
        ready: ready.clone(),
        stop: stop.clone(),
        registry: Arc::clone(&registry),
        bus: bus.clone(),
    };

    let root = {
        let _guard = rt.enter();

        // Event listener: forwards the bus into the subscriber fan-out.
        let set = SubscriberSet::new(subscribers, bus.clone());
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });

        tokio::spawn(supervise(service, ctx, inner.cfg.init_timeout))
    };

    *lock(&inner.shared) = Some(RunState {
        handle: rt.handle().clone(),
        abort: root.abort_handle(),
        ready,
        stop,
        registry,
        thread_id: thread::current().id(),
    });

    match rt.block_on(root) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            // ServiceFailed was already published by the wrapper.
            *lock(&inner.failure) = Some(e);
        }
        Err(join_err) if join_err.is_cancelled() => {
            bus.publish(
                Event::new(EventKind::ThreadForceStopped).with_service(Arc::clone(&inner.name)),
            );
        }
        Err(join_err) => {
            let reason = format!("supervisor panicked: {join_err}");
            bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_service(Arc::clone(&inner.name))
                    .with_reason(reason.clone()),
            );
            *lock(&inner.failure) = Some(ServiceError::fail(reason));
        }
    }

    *lock(&inner.shared) = None;

    // One short spin so the listener can drain final events to subscribers,
    // then drop whatever is still pending without blocking this thread.
    let _ = rt.block_on(tokio::time::sleep(Duration::from_millis(5)));
    rt.shutdown_background();
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::service::ServiceFn;

    fn idle_service() -> Arc<impl Service> {
        ServiceFn::arc("idle", |ctx: ServiceContext| async move {
            ctx.ready();
            ctx.stopped().await;
            Ok::<_, ServiceError>(())
        })
    }

    fn fast_cfg() -> ServiceConfig {
        ServiceConfig {
            init_timeout: Duration::from_secs(2),
            force_stop_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(5),
            bus_capacity: 256,
        }
    }

    #[test]
    fn scenario_a_bridged_call_returns_value() {
        let st = ServiceThread::builder(idle_service())
            .config(fast_cfg())
            .build();
        st.start().unwrap();

        let begin = Instant::now();
        let value = st.call(|_svc| 42).unwrap();
        assert_eq!(value, 42);
        assert!(begin.elapsed() < Duration::from_millis(500));

        let outcome = st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
        assert_eq!(outcome, StopOutcome::GracefullyStopped);
    }

    #[test]
    fn call_before_start_is_not_alive() {
        let st = ServiceThread::new(idle_service());
        assert!(matches!(st.call(|_svc| ()), Err(CallError::NotAlive)));
        assert!(!st.is_alive());
    }

    #[test]
    fn start_twice_is_rejected() {
        let st = ServiceThread::builder(idle_service())
            .config(fast_cfg())
            .build();
        st.start().unwrap();
        assert!(matches!(st.start(), Err(StartError::AlreadyStarted)));
        st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
    }

    #[test]
    fn scenario_b_slow_init_times_out_the_call() {
        let slow = ServiceFn::arc("slow", |ctx: ServiceContext| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            ctx.ready();
            ctx.stopped().await;
            Ok::<_, ServiceError>(())
        });
        let mut cfg = fast_cfg();
        cfg.init_timeout = Duration::from_millis(100);
        let st = ServiceThread::builder(slow).config(cfg).build();
        st.start().unwrap();

        let begin = Instant::now();
        let err = st.call(|_svc| ()).unwrap_err();
        assert!(matches!(err, CallError::ReadyTimeout { .. }));
        let elapsed = begin.elapsed();
        assert!(elapsed >= Duration::from_millis(80), "returned too early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(1), "returned too late: {elapsed:?}");

        // The routine keeps sleeping past the stop request; escalation lands.
        let outcome = st
            .stop_and_join(Some(Duration::from_millis(50)), true)
            .unwrap();
        assert_eq!(outcome, StopOutcome::ForceStopped);
    }

    #[test]
    fn exception_transparency_resumes_callee_panic() {
        let st = ServiceThread::builder(idle_service())
            .config(fast_cfg())
            .build();
        st.start().unwrap();

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            st.call(|_svc| -> u32 { panic!("onfire") })
        }));
        let payload = caught.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"onfire"));

        // The worker survived the callee panic; the bridge still works.
        assert_eq!(st.call(|_svc| 7).unwrap(), 7);
        st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
    }

    #[test]
    fn scenario_d_second_stop_is_a_noop() {
        let st = ServiceThread::builder(idle_service())
            .config(fast_cfg())
            .build();
        st.start().unwrap();
        st.call(|_svc| ()).unwrap();

        let first = st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
        assert_eq!(first, StopOutcome::GracefullyStopped);

        let begin = Instant::now();
        let second = st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
        assert_eq!(second, StopOutcome::NotRunning);
        assert!(begin.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn scenario_c_stubborn_service_is_force_stopped_in_bounded_time() {
        let stubborn = ServiceFn::arc("stubborn", |ctx: ServiceContext| async move {
            ctx.ready();
            loop {
                // Yields, but never looks at the stop signal.
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });
        let mut cfg = fast_cfg();
        cfg.force_stop_timeout = Duration::from_millis(500);
        let st = ServiceThread::builder(stubborn).config(cfg).build();
        st.start().unwrap();
        st.call(|_svc| ()).unwrap();

        let begin = Instant::now();
        let outcome = st
            .stop_and_join(Some(Duration::from_millis(300)), true)
            .unwrap();
        assert_eq!(outcome, StopOutcome::ForceStopped);
        let elapsed = begin.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "skipped graceful window: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1200), "unbounded stop: {elapsed:?}");
    }

    #[test]
    fn stop_without_force_leaves_the_thread_running() {
        let stubborn = ServiceFn::arc("stubborn", |ctx: ServiceContext| async move {
            ctx.ready();
            loop {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });
        let st = ServiceThread::builder(stubborn).config(fast_cfg()).build();
        st.start().unwrap();
        st.call(|_svc| ()).unwrap();

        let outcome = st
            .stop_and_join(Some(Duration::from_millis(100)), false)
            .unwrap();
        assert_eq!(outcome, StopOutcome::StillRunning);
        assert!(st.is_alive());

        let outcome = st.stop_and_join(Some(Duration::from_millis(50)), true).unwrap();
        assert_eq!(outcome, StopOutcome::ForceStopped);
    }

    #[test]
    fn cancel_tasks_freezes_subtasks_but_keeps_the_thread() {
        let ticks = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&ticks);
        let svc = ServiceFn::arc("owner", move |ctx: ServiceContext| {
            let seen = Arc::clone(&seen);
            async move {
                let counter = Arc::clone(&seen);
                ctx.spawn("owner::ticker", async move {
                    loop {
                        counter.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                });
                ctx.ready();
                ctx.stopped().await;
                Ok::<_, ServiceError>(())
            }
        });
        let st = ServiceThread::builder(svc).config(fast_cfg()).build();
        st.start().unwrap();
        st.call(|_svc| ()).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(ticks.load(Ordering::SeqCst) > 0);

        st.cancel_tasks().unwrap();
        thread::sleep(Duration::from_millis(100));
        let frozen = ticks.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(ticks.load(Ordering::SeqCst), frozen);

        // The routine's own task was cancelled too; the supervisor tolerates
        // that and the thread still stops gracefully.
        assert!(st.is_alive());
        let outcome = st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
        assert_eq!(outcome, StopOutcome::GracefullyStopped);
    }

    #[test]
    fn service_error_is_fatal_to_the_run() {
        let broken = ServiceFn::arc("broken", |_ctx: ServiceContext| async move {
            Err(ServiceError::fail("exploded during setup"))
        });
        let st = ServiceThread::builder(broken).config(fast_cfg()).build();
        st.start().unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while st.is_alive() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!st.is_alive(), "dead service kept its thread");
        assert_eq!(
            st.stop_and_join(None, true).unwrap(),
            StopOutcome::NotRunning
        );
        let failure = st.take_failure().expect("failure recorded");
        assert!(matches!(failure, ServiceError::Fail { .. }));
        assert!(st.take_failure().is_none());
    }

    #[test]
    fn ready_check_miss_is_logged_not_fatal() {
        let mute = ServiceFn::arc("mute", |ctx: ServiceContext| async move {
            // Never signals readiness; still honors stop.
            ctx.stopped().await;
            Ok::<_, ServiceError>(())
        });
        let mut cfg = fast_cfg();
        cfg.init_timeout = Duration::from_millis(50);
        let st = ServiceThread::builder(mute).config(cfg).build();
        let mut rx = st.inner.bus.subscribe();
        st.start().unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut warned = false;
        while Instant::now() < deadline {
            match rx.blocking_recv() {
                Ok(ev) if ev.kind == EventKind::ReadyCheckTimedOut => {
                    warned = true;
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        assert!(warned, "self-check warning never published");

        assert!(st.is_alive());
        let outcome = st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
        assert_eq!(outcome, StopOutcome::GracefullyStopped);
    }

    struct Counting {
        counter: AtomicU64,
    }

    #[async_trait]
    impl Service for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self, ctx: ServiceContext) -> Result<(), ServiceError> {
            ctx.ready();
            ctx.stopped().await;
            Ok(())
        }
    }

    #[test]
    fn submit_runs_fire_and_forget_on_the_loop() {
        let st = ServiceThread::builder(Arc::new(Counting {
            counter: AtomicU64::new(0),
        }))
        .config(fast_cfg())
        .build();
        st.start().unwrap();
        st.call(|_svc| ()).unwrap();

        st.submit(|svc| {
            svc.counter.store(7, Ordering::SeqCst);
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let seen = st.call(|svc| svc.counter.load(Ordering::SeqCst)).unwrap();
            if seen == 7 {
                break;
            }
            assert!(Instant::now() < deadline, "submitted closure never ran");
            thread::sleep(Duration::from_millis(5));
        }
        st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
    }

    #[test]
    fn concurrent_calls_each_execute_exactly_once() {
        let st = Arc::new(
            ServiceThread::builder(Arc::new(Counting {
                counter: AtomicU64::new(0),
            }))
            .config(fast_cfg())
            .build(),
        );
        st.start().unwrap();

        let mut workers = Vec::new();
        for _ in 0..8 {
            let st = Arc::clone(&st);
            workers.push(thread::spawn(move || {
                for _ in 0..10 {
                    st.call(|svc| svc.counter.fetch_add(1, Ordering::SeqCst))
                        .unwrap();
                }
            }));
        }
        for w in workers {
            w.join().unwrap();
        }

        assert_eq!(st.call(|svc| svc.counter.load(Ordering::SeqCst)).unwrap(), 80);
        st.stop_and_join(Some(Duration::from_secs(1)), true).unwrap();
    }

    #[test]
    fn request_stop_without_a_run_reports_false() {
        let st = ServiceThread::new(idle_service());
        assert!(!st.request_stop());
    }
}
