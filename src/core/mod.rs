//! Supervision core: the worker thread, its per-run state, the synchronous
//! call bridge, the sub-task registry, and the shutdown sequencer.

mod bridge;
mod builder;
mod config;
pub(crate) mod registry;
mod state;
mod supervise;
mod thread;

pub use builder::ServiceThreadBuilder;
pub use config::ServiceConfig;
pub use state::StopOutcome;
pub use thread::ServiceThread;
