use std::sync::Mutex;

use lockstep_compiler::compile::compile;
use lockstep_engine::driver::{Monitor, MonitorConfig, ObserveError};
use lockstep_engine::report::Report;
use lockstep_engine::snapshot::Snapshot;
use lockstep_ir::parse_spec;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Spec parse error: {0}")]
    Parse(#[from] lockstep_ir::parse::ParseError),
}

/// One monitored run over a compiled spec.
///
/// Shareable across threads: a signal source feeds `observe` while
/// other callers query `report`. All access goes through one lock, so
/// a report always reflects the most recently fully-processed cycle,
/// never a half-applied one.
pub struct Session {
    monitor: Mutex<Monitor>,
}

impl Session {
    /// Parse and compile spec JSON, then open a session over it.
    /// Definitions that fail setup checks are dropped individually and
    /// listed in the report; only malformed JSON fails the whole spec.
    pub fn from_json(spec_json: &str) -> Result<Self, SessionError> {
        Self::from_json_with_config(spec_json, MonitorConfig::default())
    }

    pub fn from_json_with_config(
        spec_json: &str,
        config: MonitorConfig,
    ) -> Result<Self, SessionError> {
        let spec = parse_spec(spec_json)?;
        let monitor = Monitor::with_config(compile(&spec), config);
        Ok(Self { monitor: Mutex::new(monitor) })
    }

    /// Feed one cycle. See [`Monitor::observe`] for the sequencing
    /// contract.
    pub fn observe(&self, snapshot: Snapshot) -> Result<(), ObserveError> {
        self.monitor.lock().unwrap().observe(snapshot)
    }

    /// End the run and return the final report. Idempotent.
    pub fn finish(&self) -> Report {
        self.monitor.lock().unwrap().finish()
    }

    /// Committed state as of the last fully-processed cycle.
    pub fn report(&self) -> Report {
        self.monitor.lock().unwrap().report()
    }

    pub fn cycles_observed(&self) -> u64 {
        self.monitor.lock().unwrap().cycles_observed()
    }

    pub fn is_finished(&self) -> bool {
        self.monitor.lock().unwrap().is_finished()
    }
}
