//! # Example: Bridged calls into a thread-hosted service
//!
//! Hosts a small counter service on a dedicated worker thread, bridges
//! synchronous calls into it from the main thread and from a second OS
//! thread, then stops it gracefully.
//!
//! Run with: `cargo run --example bridge --features logging`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;

use threadbound::{
    LogWriter, Service, ServiceContext, ServiceError, ServiceThread, StopOutcome,
};

/// A service holding state the bridged closures operate on.
struct Counter {
    hits: AtomicU64,
}

#[async_trait]
impl Service for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    async fn run(&self, ctx: ServiceContext) -> Result<(), ServiceError> {
        // Pretend to warm something up before opening for business.
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctx.ready();

        // A background sub-task owned by this run; cancelled on stop.
        ctx.spawn("counter::heartbeat", async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                println!("[counter] heartbeat");
            }
        });

        ctx.stopped().await;
        println!("[counter] stop observed, run() returning");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let st = Arc::new(
        ServiceThread::builder(Arc::new(Counter {
            hits: AtomicU64::new(0),
        }))
        .name("counter-01")
        .subscriber(Arc::new(LogWriter::default()))
        .build(),
    );
    st.start()?;

    // Bridged call from the main thread. Blocks until the service is ready,
    // runs on the worker runtime, and returns the closure's result here.
    let n = st.call(|svc| svc.hits.fetch_add(1, Ordering::SeqCst) + 1)?;
    println!("[main] hit #{n}");

    // Same bridge, different caller thread.
    let from_worker = {
        let st = Arc::clone(&st);
        thread::spawn(move || st.call(|svc| svc.hits.fetch_add(1, Ordering::SeqCst) + 1))
    };
    let n = from_worker.join().unwrap()?;
    println!("[other thread] hit #{n}");

    // Fire-and-forget submission; no result, no readiness wait.
    st.submit(|svc| {
        svc.hits.fetch_add(10, Ordering::SeqCst);
    })?;

    thread::sleep(Duration::from_millis(50));
    let total = st.call(|svc| svc.hits.load(Ordering::SeqCst))?;
    println!("[main] total hits: {total}");

    let outcome = st.stop_and_join(Some(Duration::from_secs(5)), true)?;
    assert_eq!(outcome, StopOutcome::GracefullyStopped);
    println!("[main] stopped: {outcome:?}");
    Ok(())
}
