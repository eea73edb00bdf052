//! # Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing from any thread (the supervising wrapper on the
//! worker runtime, bridge callers, the shutdown sequencer).
//!
//! ```text
//! Publishers (many threads):          Subscriber (one, on the worker runtime):
//!   supervising wrapper ──┐
//!   bridge callers      ──┼──► Bus ──► event listener ──► SubscriberSet
//!   shutdown sequencer  ──┘ (broadcast)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks nor awaits.
//! - **Bounded capacity**: one ring buffer stores recent events for all
//!   receivers; slow receivers observe `RecvError::Lagged(n)`.
//! - **No persistence**: events are dropped if no receiver is attached.
//! - **Per-bus ordering**: `publish()` stamps a monotonic sequence number, so
//!   ordering can be restored per instance even after fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// Cheap to clone (holds an `Arc`-backed sender and a shared counter).
/// Multiple publishers may publish concurrently; subscribers receive clones.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    seq: Arc<AtomicU64>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self {
            tx,
            seq: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Publishes an event to all active subscribers, stamping its sequence
    /// number.
    ///
    /// If there are no receivers the event is dropped; the sequence number is
    /// consumed either way, so gaps are possible but order never inverts.
    pub fn publish(&self, mut ev: Event) {
        ev.seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver observing events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn publish_stamps_monotonic_seq() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::ServiceStarting));
        bus.publish(Event::new(EventKind::ServiceRunning));
        bus.publish(Event::new(EventKind::ServiceDone));

        let a = rx.recv().await.unwrap();
        let b = rx.recv().await.unwrap();
        let c = rx.recv().await.unwrap();
        assert!(a.seq < b.seq && b.seq < c.seq);
    }

    #[tokio::test]
    async fn publish_without_receiver_is_dropped() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::StopRequested));

        // A receiver attached afterwards only sees later events.
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ServiceDone));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ServiceDone);
    }

    #[test]
    fn independent_buses_have_independent_sequences() {
        let a = Bus::new(4);
        let b = Bus::new(4);
        let mut rx_a = a.subscribe();
        let mut rx_b = b.subscribe();

        a.publish(Event::new(EventKind::ServiceStarting));
        b.publish(Event::new(EventKind::ServiceStarting));

        let ev_a = rx_a.try_recv().unwrap();
        let ev_b = rx_b.try_recv().unwrap();
        assert_eq!(ev_a.seq, ev_b.seq);
    }
}
