//! Coverage points: cycle-level occurrence counters, independent of any
//! property's obligations or disable condition.

use lockstep_compiler::compile::CompiledCoverage;

use crate::eval::eval_bool;
use crate::snapshot::Snapshot;

#[derive(Debug)]
struct CoveragePoint {
    def: CompiledCoverage,
    hits: u64,
}

/// Counts, per point, the cycles where its predicate held.
#[derive(Debug)]
pub struct CoverageRegistry {
    points: Vec<CoveragePoint>,
}

impl CoverageRegistry {
    pub fn new(points: Vec<CompiledCoverage>) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|def| CoveragePoint { def, hits: 0 })
                .collect(),
        }
    }

    /// Check every point against this cycle.
    pub fn step(&mut self, prev: Option<&Snapshot>, cur: &Snapshot) {
        for point in &mut self.points {
            if eval_bool(&point.def.predicate, prev, cur) {
                point.hits += 1;
            }
        }
    }

    pub fn hits(&self, label: &str) -> Option<u64> {
        self.points
            .iter()
            .find(|p| p.def.label == label)
            .map(|p| p.hits)
    }

    /// (label, hits) pairs in registration order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.points.iter().map(|p| (p.def.label.as_str(), p.hits))
    }
}
