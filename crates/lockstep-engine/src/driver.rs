//! The monitor driver — one `observe` call per cycle, in strict order.
//!
//! The driver owns every property tracker and the coverage registry,
//! shifts the current snapshot into "previous" on each call, and commits
//! all per-cycle updates before returning. Properties never share
//! mutable state, so the per-property step can run on the rayon pool;
//! the implicit join is the end-of-cycle barrier.

use lockstep_compiler::compile::CompiledSpec;
use lockstep_ir::types::SignalType;
use rayon::prelude::*;

use crate::coverage::CoverageRegistry;
use crate::obligation::PropertyTracker;
use crate::report::{CoverageReport, PropertyReport, RejectedReport, Report};
use crate::snapshot::{Snapshot, Value};

/// Driver options.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Step properties on the rayon pool instead of serially. Either
    /// way, all updates are committed before `observe` returns.
    pub parallel: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { parallel: false }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ObserveError {
    #[error("Out-of-order snapshot: expected cycle {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("Snapshot for cycle {cycle} is missing declared signal '{name}'")]
    MissingSignal { name: String, cycle: u64 },

    #[error("Snapshot for cycle {cycle} carries the wrong value type for signal '{name}'")]
    WrongType { name: String, cycle: u64 },

    #[error("The monitor has finished; no further snapshots are accepted")]
    Finished,

    #[error("The monitor halted after a malformed snapshot; build a new monitor to continue")]
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RunState {
    Running,
    /// A sequencing or shape error was observed; input is refused.
    Halted,
    Finished,
}

/// The per-cycle entry point for a compiled monitor spec.
pub struct Monitor {
    trackers: Vec<PropertyTracker>,
    coverage: CoverageRegistry,
    rejected: Vec<RejectedReport>,
    /// Declared signals and their types, sorted by name for
    /// deterministic shape errors.
    signals: Vec<(String, SignalType)>,
    config: MonitorConfig,
    /// The most recently accepted snapshot; becomes "previous" on the
    /// next call.
    last: Option<Snapshot>,
    cycles: u64,
    state: RunState,
}

impl Monitor {
    pub fn new(compiled: CompiledSpec) -> Self {
        Self::with_config(compiled, MonitorConfig::default())
    }

    pub fn with_config(compiled: CompiledSpec, config: MonitorConfig) -> Self {
        let trackers = compiled
            .properties
            .into_iter()
            .map(PropertyTracker::new)
            .collect();
        let coverage = CoverageRegistry::new(compiled.coverage);
        let rejected = compiled
            .rejected
            .iter()
            .map(|r| RejectedReport { label: r.label.clone(), reason: r.error.to_string() })
            .collect();
        let mut signals: Vec<(String, SignalType)> = compiled
            .signals
            .iter()
            .map(|(name, ty)| (name.to_string(), ty))
            .collect();
        signals.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            trackers,
            coverage,
            rejected,
            signals,
            config,
            last: None,
            cycles: 0,
            state: RunState::Running,
        }
    }

    /// Feed one cycle. The first call must carry cycle 0 and each later
    /// call exactly one more than the last; anything else halts the
    /// monitor. The snapshot must carry every declared signal at its
    /// declared type.
    pub fn observe(&mut self, snapshot: Snapshot) -> Result<(), ObserveError> {
        match self.state {
            RunState::Finished => return Err(ObserveError::Finished),
            RunState::Halted => return Err(ObserveError::Halted),
            RunState::Running => {}
        }

        let expected = self.last.as_ref().map_or(0, |s| s.cycle() + 1);
        if snapshot.cycle() != expected {
            self.state = RunState::Halted;
            return Err(ObserveError::OutOfOrder { expected, got: snapshot.cycle() });
        }

        for (name, declared) in &self.signals {
            match snapshot.value(name) {
                None => {
                    self.state = RunState::Halted;
                    return Err(ObserveError::MissingSignal {
                        name: name.clone(),
                        cycle: snapshot.cycle(),
                    });
                }
                Some(value) => {
                    let well_typed = match declared {
                        SignalType::Bool => matches!(value, Value::Bool(_)),
                        SignalType::Int { .. } => matches!(value, Value::Int(_)),
                    };
                    if !well_typed {
                        self.state = RunState::Halted;
                        return Err(ObserveError::WrongType {
                            name: name.clone(),
                            cycle: snapshot.cycle(),
                        });
                    }
                }
            }
        }

        let prev = self.last.take();
        let prev_ref = prev.as_ref();

        if self.config.parallel {
            self.trackers
                .par_iter_mut()
                .for_each(|tracker| tracker.step(prev_ref, &snapshot));
        } else {
            for tracker in &mut self.trackers {
                tracker.step(prev_ref, &snapshot);
            }
        }
        self.coverage.step(prev_ref, &snapshot);

        self.cycles += 1;
        self.last = Some(snapshot);
        Ok(())
    }

    /// End the run: bounded obligations still live resolve as violated,
    /// unbounded ones as indeterminate. Idempotent; stopping early and
    /// calling this is the cancellation path.
    pub fn finish(&mut self) -> Report {
        if self.state != RunState::Finished {
            let final_cycle = self.last.as_ref().map_or(0, |s| s.cycle());
            for tracker in &mut self.trackers {
                tracker.finish(final_cycle);
            }
            self.state = RunState::Finished;
        }
        self.report()
    }

    /// Committed state as of the most recently fully-processed cycle.
    pub fn report(&self) -> Report {
        Report {
            cycles: self.cycles,
            finished: self.state == RunState::Finished,
            properties: self
                .trackers
                .iter()
                .map(|t| PropertyReport {
                    label: t.label().to_string(),
                    counters: t.counters(),
                    live: t.live_count() as u64,
                    first_violation: t.first_violation(),
                })
                .collect(),
            coverage: self
                .coverage
                .counts()
                .map(|(label, hits)| CoverageReport { label: label.to_string(), hits })
                .collect(),
            rejected: self.rejected.clone(),
        }
    }

    pub fn cycles_observed(&self) -> u64 {
        self.cycles
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }
}
