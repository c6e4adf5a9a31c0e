//! Snapshot feed between a signal source and a session.
//!
//! A bounded channel carries snapshots from the producing thread into
//! the monitor. A full channel blocks the producer, so the source can
//! never run ahead of evaluation; the monitor commits each cycle
//! before the next one is accepted. Dropping the sender ends the feed,
//! which is also the cancellation path: [`drive`] then finishes the
//! run at the last cycle it received.

use crossbeam::channel::{bounded, Receiver, Sender};

use lockstep_engine::driver::ObserveError;
use lockstep_engine::report::Report;
use lockstep_engine::snapshot::Snapshot;

use crate::session::Session;

/// Default feed capacity before the producer blocks.
const DEFAULT_FEED_CAPACITY: usize = 256;

/// A bounded snapshot feed with the default capacity.
pub fn snapshot_channel() -> (Sender<Snapshot>, Receiver<Snapshot>) {
    snapshot_channel_with_capacity(DEFAULT_FEED_CAPACITY)
}

/// A bounded snapshot feed. Capacity 0 makes every handoff a
/// rendezvous: the producer blocks until the monitor takes the cycle.
pub fn snapshot_channel_with_capacity(capacity: usize) -> (Sender<Snapshot>, Receiver<Snapshot>) {
    bounded(capacity)
}

/// Drain the feed into the session one cycle at a time, then finish
/// the run once the sender disconnects.
///
/// A sequencing error stops the drain immediately and is handed back;
/// the session is halted at that point and the caller may still query
/// or finish it.
pub fn drive(session: &Session, feed: Receiver<Snapshot>) -> Result<Report, ObserveError> {
    for snapshot in feed.iter() {
        session.observe(snapshot)?;
    }
    Ok(session.finish())
}
