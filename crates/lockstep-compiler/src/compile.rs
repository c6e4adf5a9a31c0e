use std::collections::HashSet;

use lockstep_ir::types::{CoverageDef, MonitorSpec, OverlapPolicy, PropertyDef};

use crate::predicate::{compile_predicate, CompileError, CompiledExpr, SignalContext};
use crate::validate::{validate_property, ValidationError, Window};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Predicate(#[from] CompileError),
}

/// A definition that failed setup checks. Only that definition is
/// dropped; everything else in the spec registers normally.
#[derive(Debug)]
pub struct Rejection {
    pub label: String,
    pub error: ConfigError,
}

#[derive(Debug, Clone)]
pub struct CompiledProperty {
    pub label: String,
    pub trigger: CompiledExpr,
    pub consequent: CompiledExpr,
    pub disable: Option<CompiledExpr>,
    pub window: Window,
    pub overlap: OverlapPolicy,
}

#[derive(Debug, Clone)]
pub struct CompiledCoverage {
    pub label: String,
    pub predicate: CompiledExpr,
}

#[derive(Debug)]
pub struct CompiledSpec {
    /// Accepted properties, in declaration order.
    pub properties: Vec<CompiledProperty>,
    /// Accepted coverage points, in declaration order.
    pub coverage: Vec<CompiledCoverage>,
    pub rejected: Vec<Rejection>,
    pub signals: SignalContext,
}

/// Compile a monitor spec. Never fails as a whole: each bad definition
/// lands in `rejected` and the rest register. An empty accepted set is a
/// valid (trivial) monitor.
pub fn compile(spec: &MonitorSpec) -> CompiledSpec {
    // 1. Resolve signal declarations
    let ctx = SignalContext::from_spec(spec);

    // 2. Compile properties, rejecting bad definitions individually
    let mut properties = Vec::new();
    let mut rejected = Vec::new();
    let mut property_labels = HashSet::new();

    for def in &spec.properties {
        match compile_property(def, &ctx, &mut property_labels) {
            Ok(property) => properties.push(property),
            Err(error) => rejected.push(Rejection { label: def.label.clone(), error }),
        }
    }

    // 3. Compile coverage points the same way
    let mut coverage = Vec::new();
    let mut coverage_labels = HashSet::new();

    for def in &spec.coverage {
        match compile_coverage(def, &ctx, &mut coverage_labels) {
            Ok(point) => coverage.push(point),
            Err(error) => rejected.push(Rejection { label: def.label.clone(), error }),
        }
    }

    CompiledSpec { properties, coverage, rejected, signals: ctx }
}

fn compile_property(
    def: &PropertyDef,
    ctx: &SignalContext,
    labels: &mut HashSet<String>,
) -> Result<CompiledProperty, ConfigError> {
    if !labels.insert(def.label.clone()) {
        return Err(ValidationError::DuplicateLabel { label: def.label.clone() }.into());
    }
    let window = validate_property(def)?;
    let trigger = compile_predicate(&def.trigger, ctx)?;
    let consequent = compile_predicate(&def.consequent, ctx)?;
    let disable = match &def.disable {
        Some(expr) => Some(compile_predicate(expr, ctx)?),
        None => None,
    };
    Ok(CompiledProperty {
        label: def.label.clone(),
        trigger,
        consequent,
        disable,
        window,
        overlap: def.overlap,
    })
}

fn compile_coverage(
    def: &CoverageDef,
    ctx: &SignalContext,
    labels: &mut HashSet<String>,
) -> Result<CompiledCoverage, ConfigError> {
    if !labels.insert(def.label.clone()) {
        return Err(ValidationError::DuplicateLabel { label: def.label.clone() }.into());
    }
    let predicate = compile_predicate(&def.predicate, ctx)?;
    Ok(CompiledCoverage { label: def.label.clone(), predicate })
}
