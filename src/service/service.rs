//! # Service trait: the routine hosted on the worker thread.
//!
//! Implementors provide the async service routine. Its contract, in order:
//! complete whatever setup is needed (any await points allowed), call
//! [`ServiceContext::ready`] exactly once, then suspend until
//! [`ServiceContext::stopped`] resolves and return.
//!
//! A routine that returns `Err` (other than `Canceled`) is fatal to the run:
//! the worker thread exits and the error is retrievable via
//! [`ServiceThread::take_failure`](crate::ServiceThread::take_failure).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;

use super::ServiceContext;

/// # The async routine run by a [`ServiceThread`](crate::ServiceThread).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use threadbound::{Service, ServiceContext, ServiceError};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Service for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     async fn run(&self, ctx: ServiceContext) -> Result<(), ServiceError> {
///         // ...setup...
///         ctx.ready();
///         ctx.stopped().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns a stable, human-readable service name (thread/log identity).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Executes the service routine until completion or cancellation.
    ///
    /// Runs as a sub-task on the worker runtime. Signal `ctx.ready()` once
    /// setup is finished, then honor `ctx.stopped()` to exit promptly during
    /// graceful shutdown.
    async fn run(&self, ctx: ServiceContext) -> Result<(), ServiceError>;
}

/// Shared service handle.
pub type ServiceRef = Arc<dyn Service>;
