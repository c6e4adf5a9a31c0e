//! Cycle-stepped evaluation of compiled monitor specs.
//!
//! [`Monitor`] is the entry point: feed it one [`Snapshot`] per cycle,
//! then [`Monitor::finish`] to resolve whatever is still pending. A
//! [`Report`] can be taken at any point in between.

pub mod coverage;
pub mod driver;
pub mod eval;
pub mod obligation;
pub mod report;
pub mod snapshot;

pub use driver::{Monitor, MonitorConfig, ObserveError};
pub use report::Report;
pub use snapshot::{Snapshot, Value};
