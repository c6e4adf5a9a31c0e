//! Top-level entry points for running a temporal-property monitor.
//!
//! [`Session`] owns a monitor behind a lock so a feeder thread and
//! report readers can share it; [`stream`] adds a bounded snapshot
//! feed with backpressure for source-driven runs.

pub mod session;
pub mod stream;

pub use session::{Session, SessionError};
pub use stream::{drive, snapshot_channel, snapshot_channel_with_capacity};
