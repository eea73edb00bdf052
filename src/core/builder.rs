//! Builder for [`ServiceThread`].
//!
//! Collects the optional knobs (instance name, timeouts, subscribers) before
//! the thread exists. Everything has a default: the name falls back to the
//! service's own [`Service::name`], the configuration to
//! [`ServiceConfig::default`], and the subscriber list to empty.

use std::sync::Arc;

use crate::core::config::ServiceConfig;
use crate::core::thread::ServiceThread;
use crate::service::Service;
use crate::subscribers::Subscribe;

/// Configures and assembles a [`ServiceThread`].
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use threadbound::{ServiceConfig, ServiceContext, ServiceError, ServiceFn, ServiceThread};
///
/// let svc = ServiceFn::arc("echo", |ctx: ServiceContext| async move {
///     ctx.ready();
///     ctx.stopped().await;
///     Ok::<_, ServiceError>(())
/// });
///
/// let st = ServiceThread::builder(svc)
///     .name("echo-01")
///     .config(ServiceConfig {
///         init_timeout: Duration::from_secs(3),
///         ..ServiceConfig::default()
///     })
///     .build();
/// assert_eq!(st.name(), "echo-01");
/// ```
pub struct ServiceThreadBuilder<S: Service> {
    service: Arc<S>,
    name: Option<Arc<str>>,
    cfg: ServiceConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<S: Service> ServiceThreadBuilder<S> {
    pub(crate) fn new(service: Arc<S>) -> Self {
        Self {
            service,
            name: None,
            cfg: ServiceConfig::default(),
            subscribers: Vec::new(),
        }
    }

    /// Overrides the instance name (also used as the OS thread name).
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: ServiceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Adds one event subscriber.
    pub fn subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Replaces the subscriber list.
    pub fn with_subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subs;
        self
    }

    /// Assembles the service thread. Nothing runs until
    /// [`start()`](ServiceThread::start).
    pub fn build(self) -> ServiceThread<S> {
        let name = self
            .name
            .unwrap_or_else(|| Arc::from(self.service.name()));
        ServiceThread::assemble(self.service, name, self.cfg, self.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::service::{ServiceContext, ServiceFn};

    fn noop() -> Arc<impl Service> {
        ServiceFn::arc("noop", |ctx: ServiceContext| async move {
            ctx.stopped().await;
            Ok::<_, ServiceError>(())
        })
    }

    #[test]
    fn name_defaults_to_the_service_name() {
        let st = ServiceThreadBuilder::new(noop()).build();
        assert_eq!(st.name(), "noop");
    }

    #[test]
    fn name_override_wins() {
        let st = ServiceThreadBuilder::new(noop()).name("custom").build();
        assert_eq!(st.name(), "custom");
    }

    #[test]
    fn config_is_carried_through() {
        let cfg = ServiceConfig {
            bus_capacity: 8,
            ..ServiceConfig::default()
        };
        let st = ServiceThreadBuilder::new(noop()).config(cfg).build();
        assert_eq!(st.config().bus_capacity, 8);
    }
}
