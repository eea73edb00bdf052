//! Service abstraction: the async routine hosted on the worker thread.
//!
//! - [`service`]: the [`Service`] trait, the crate's extension point;
//! - [`service_fn`]: closure-backed [`ServiceFn`] implementation;
//! - [`context`]: [`ServiceContext`], the handles a routine uses to signal
//!   readiness, observe the stop signal, and spawn sub-tasks.

mod context;
mod service;
mod service_fn;

pub use context::ServiceContext;
pub use service::{Service, ServiceRef};
pub use service_fn::ServiceFn;
