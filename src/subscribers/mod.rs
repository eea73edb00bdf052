//! Subscriber layer: non-blocking fan-out of lifecycle events.
//!
//! - [`subscribe`]: the [`Subscribe`] trait, the extension point for custom
//!   event handlers (metrics, structured logging, alerting);
//! - [`set`]: [`SubscriberSet`], bounded per-subscriber queues with dedicated
//!   workers and panic isolation;
//! - [`log`]: a simple stdout [`LogWriter`] (feature `logging`).

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
