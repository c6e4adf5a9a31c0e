use lockstep_ir::types::{PropertyDef, PropertyKind, WindowBound, WindowDef};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Property '{label}' has no window (eventual properties require one)")]
    MissingWindow { label: String },

    #[error("Property '{label}' has window min 0; windows start at offset 1 or later")]
    WindowMinZero { label: String },

    #[error("Property '{label}' has inverted window bounds: min ({min}) > max ({max})")]
    WindowInverted { label: String, min: u32, max: u32 },

    #[error("Property '{label}' is next_exact; its window is fixed at [1,1]")]
    NextExactWindow { label: String },

    #[error("Duplicate label '{label}'")]
    DuplicateLabel { label: String },
}

/// Resolved window offsets: `max` is `None` for unbounded properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub min: u32,
    pub max: Option<u32>,
}

impl Window {
    /// Whether `cycle` falls inside the window of an obligation armed at
    /// `trigger_cycle`.
    pub fn contains(&self, trigger_cycle: u64, cycle: u64) -> bool {
        cycle >= trigger_cycle + u64::from(self.min)
            && self.max.map_or(true, |max| cycle <= trigger_cycle + u64::from(max))
    }
}

/// Check a property's structural fields and resolve its window.
/// `next_exact` properties normalize to [1,1]; an explicit window on one
/// must already be [1,1].
pub fn validate_property(def: &PropertyDef) -> Result<Window, ValidationError> {
    match def.kind {
        PropertyKind::NextExact => match def.window {
            None | Some(WindowDef { min: 1, max: WindowBound::Cycles(1) }) => {
                Ok(Window { min: 1, max: Some(1) })
            }
            Some(_) => Err(ValidationError::NextExactWindow { label: def.label.clone() }),
        },
        PropertyKind::Eventual => {
            let window = def
                .window
                .ok_or_else(|| ValidationError::MissingWindow { label: def.label.clone() })?;
            if window.min == 0 {
                return Err(ValidationError::WindowMinZero { label: def.label.clone() });
            }
            match window.max {
                WindowBound::Cycles(max) if window.min > max => {
                    Err(ValidationError::WindowInverted {
                        label: def.label.clone(),
                        min: window.min,
                        max,
                    })
                }
                WindowBound::Cycles(max) => Ok(Window { min: window.min, max: Some(max) }),
                WindowBound::Unbounded => Ok(Window { min: window.min, max: None }),
            }
        }
    }
}
