//! Obligation bookkeeping: the per-property core of the monitor.
//!
//! A trigger arms an obligation; each subsequent cycle either satisfies
//! it (consequent true inside its window), violates it (deadline reached
//! first), or aborts it (disable fired). Obligations for one property
//! are independent and may overlap arbitrarily.

use lockstep_compiler::compile::CompiledProperty;
use lockstep_ir::types::OverlapPolicy;
use serde::{Deserialize, Serialize};

use crate::eval::eval_bool;
use crate::snapshot::Snapshot;

/// One in-flight instance of a property's contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obligation {
    pub trigger_cycle: u64,
    /// Fixed at creation. `None` for unbounded windows, which never
    /// time out.
    pub deadline_cycle: Option<u64>,
}

/// Per-property counters. Monotonic: only ever incremented during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyCounters {
    pub triggered: u64,
    pub satisfied: u64,
    pub violated: u64,
    pub aborted: u64,
    pub indeterminate: u64,
}

/// Where a property first failed, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstViolation {
    /// Cycle the violation was recorded.
    pub cycle: u64,
    /// Cycle the failing obligation was armed.
    pub trigger_cycle: u64,
}

/// Tracks every live obligation for one property and resolves them
/// cycle by cycle.
#[derive(Debug)]
pub struct PropertyTracker {
    property: CompiledProperty,
    live: Vec<Obligation>,
    counters: PropertyCounters,
    first_violation: Option<FirstViolation>,
}

impl PropertyTracker {
    pub fn new(property: CompiledProperty) -> Self {
        Self {
            property,
            live: Vec::new(),
            counters: PropertyCounters::default(),
            first_violation: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.property.label
    }

    pub fn counters(&self) -> PropertyCounters {
        self.counters
    }

    pub fn first_violation(&self) -> Option<FirstViolation> {
        self.first_violation
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Advance one cycle. The step order is fixed: disable aborts
    /// everything first, satisfaction resolves before deadline expiry,
    /// and trigger arming always comes last. A freshly armed obligation
    /// is therefore never inspected in its birth cycle (windows start at
    /// offset 1 or later).
    pub fn step(&mut self, prev: Option<&Snapshot>, cur: &Snapshot) {
        let cycle = cur.cycle();

        // 1. Disable suppresses everything else this cycle.
        if let Some(disable) = &self.property.disable {
            if eval_bool(disable, prev, cur) {
                self.counters.aborted += self.live.len() as u64;
                self.live.clear();
                return;
            }
        }

        // 2. + 3. Resolve live obligations in arming order. The
        // consequent is evaluated once and shared across all of them;
        // satisfaction wins over a same-cycle deadline.
        let consequent_holds = eval_bool(&self.property.consequent, prev, cur);
        let mut i = 0;
        while i < self.live.len() {
            let obligation = self.live[i];
            if consequent_holds && self.property.window.contains(obligation.trigger_cycle, cycle) {
                self.counters.satisfied += 1;
                self.live.remove(i);
                continue;
            }
            if obligation.deadline_cycle == Some(cycle) {
                self.record_violation(cycle, obligation.trigger_cycle);
                self.live.remove(i);
                continue;
            }
            i += 1;
        }

        // 4. Arm a new obligation, strictly after resolution.
        if eval_bool(&self.property.trigger, prev, cur) {
            if self.property.overlap == OverlapPolicy::Exclusive && !self.live.is_empty() {
                return;
            }
            self.live.push(Obligation {
                trigger_cycle: cycle,
                deadline_cycle: self.property.window.max.map(|max| cycle + u64::from(max)),
            });
            self.counters.triggered += 1;
        }
    }

    /// End of trace. Bounded obligations still live ran out of stream
    /// and resolve as violated, recorded at the final observed cycle;
    /// unbounded ones end indeterminate.
    pub fn finish(&mut self, final_cycle: u64) {
        for obligation in std::mem::take(&mut self.live) {
            match obligation.deadline_cycle {
                Some(_) => self.record_violation(final_cycle, obligation.trigger_cycle),
                None => self.counters.indeterminate += 1,
            }
        }
    }

    fn record_violation(&mut self, cycle: u64, trigger_cycle: u64) {
        self.counters.violated += 1;
        if self.first_violation.is_none() {
            self.first_violation = Some(FirstViolation { cycle, trigger_cycle });
        }
    }
}
