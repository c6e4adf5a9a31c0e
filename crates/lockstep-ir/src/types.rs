use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// Top-level monitor specification — all 3 sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSpec {
    pub signals: HashMap<String, SignalDecl>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub coverage: Vec<CoverageDef>,
}

// ── Section 1: Signals ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalDecl {
    #[serde(flatten)]
    pub signal_type: SignalType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalType {
    Bool,
    Int {
        /// Bit width, when known. Bounds bitfield extraction.
        #[serde(default)]
        width: Option<u8>,
    },
}

// ── Section 2: Properties ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    pub label: String,
    pub trigger: Expr,
    pub consequent: Expr,
    /// Required for `eventual` properties; `next_exact` may omit it
    /// (it is fixed to [1,1]).
    #[serde(default)]
    pub window: Option<WindowDef>,
    #[serde(default)]
    pub disable: Option<Expr>,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowDef {
    pub min: u32,
    pub max: WindowBound,
}

/// Upper window bound: a cycle offset, or the string "unbounded".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowBound {
    Cycles(u32),
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Eventual,
    NextExact,
}

impl Default for PropertyKind {
    fn default() -> Self {
        PropertyKind::Eventual
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every trigger arms a fresh obligation, even while others are live.
    Independent,
    /// Triggers arm nothing while any obligation for the property is live.
    Exclusive,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        OverlapPolicy::Independent
    }
}

// ── Section 3: Coverage ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageDef {
    pub label: String,
    pub predicate: Expr,
}

impl Serialize for WindowBound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            WindowBound::Cycles(n) => serializer.serialize_u32(*n),
            WindowBound::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for WindowBound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Number(n) => {
                let max = n
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| serde::de::Error::custom(format!("window max out of range: {n}")))?;
                Ok(WindowBound::Cycles(max))
            }
            serde_json::Value::String(s) if s == "unbounded" => Ok(WindowBound::Unbounded),
            other => Err(serde::de::Error::custom(format!(
                "window max must be an integer or \"unbounded\", got: {other}"
            ))),
        }
    }
}
