//! The queryable run summary: the monitor's observability surface.
//!
//! Built on demand from committed tracker state, so a mid-run query
//! always reflects the most recently fully-processed cycle.

use serde::{Deserialize, Serialize};

use crate::obligation::{FirstViolation, PropertyCounters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Cycles fully processed so far.
    pub cycles: u64,
    /// Whether `finish()` has resolved the run.
    pub finished: bool,
    /// Per-property outcomes, in registration order.
    pub properties: Vec<PropertyReport>,
    /// Per-coverage-point hit counts, in registration order.
    pub coverage: Vec<CoverageReport>,
    /// Definitions dropped at setup, with the reason.
    pub rejected: Vec<RejectedReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub label: String,
    #[serde(flatten)]
    pub counters: PropertyCounters,
    /// Obligations still in flight (0 once finished).
    pub live: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_violation: Option<FirstViolation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub label: String,
    pub hits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedReport {
    pub label: String,
    pub reason: String,
}

impl Report {
    /// True when no property recorded a violation.
    pub fn passed(&self) -> bool {
        self.properties.iter().all(|p| p.counters.violated == 0)
    }

    pub fn property(&self, label: &str) -> Option<&PropertyReport> {
        self.properties.iter().find(|p| p.label == label)
    }

    pub fn coverage_hits(&self, label: &str) -> Option<u64> {
        self.coverage
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.hits)
    }

    pub fn total_violations(&self) -> u64 {
        self.properties.iter().map(|p| p.counters.violated).sum()
    }

    pub fn total_triggered(&self) -> u64 {
        self.properties.iter().map(|p| p.counters.triggered).sum()
    }
}
