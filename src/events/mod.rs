//! Lifecycle events emitted by the service thread.
//!
//! Events are an observability side channel, not a functional contract:
//! nothing in the runtime waits on a subscriber, and a run behaves
//! identically with zero subscribers attached.
//!
//! - [`event`]: event kinds and the [`Event`] record with builder helpers;
//! - [`bus`]: broadcast channel with non-blocking publish.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
