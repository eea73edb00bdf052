//! # Closure-backed service (`ServiceFn`)
//!
//! [`ServiceFn`] wraps a closure `F: Fn(ServiceContext) -> Fut`, producing a
//! fresh future when the routine is scheduled. State the closure needs across
//! calls should be captured explicitly (e.g. via `Arc<...>`).
//!
//! ## Example
//! ```rust
//! use threadbound::{ServiceContext, ServiceError, ServiceFn};
//!
//! let svc = ServiceFn::arc("worker", |ctx: ServiceContext| async move {
//!     ctx.ready();
//!     ctx.stopped().await;
//!     Ok::<_, ServiceError>(())
//! });
//!
//! assert_eq!(threadbound::Service::name(&*svc), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;

use super::{Service, ServiceContext};

/// Function-backed service implementation.
#[derive(Debug)]
pub struct ServiceFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ServiceFn<F> {
    /// Creates a new closure-backed service.
    ///
    /// Prefer [`ServiceFn::arc`] when you immediately need an `Arc` for
    /// [`ServiceThread::new`](crate::ServiceThread::new).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the service and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Service for ServiceFn<F>
where
    F: Fn(ServiceContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: ServiceContext) -> Result<(), ServiceError> {
        (self.f)(ctx).await
    }
}
