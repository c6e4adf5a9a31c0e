use std::collections::HashMap;
use std::fmt;

use lockstep_ir::expr::{Expr, Literal, OpKind};
use lockstep_ir::types::{MonitorSpec, SignalType};

// ── Signal Context ───────────────────────────────────────────────────

/// Declared signals, resolved once per spec. Every name and type check
/// happens against this at compile time so evaluation never fails.
#[derive(Debug, Clone, Default)]
pub struct SignalContext {
    signals: HashMap<String, SignalType>,
}

impl SignalContext {
    pub fn from_spec(spec: &MonitorSpec) -> Self {
        let mut signals = HashMap::new();
        for (name, decl) in &spec.signals {
            signals.insert(name.clone(), decl.signal_type);
        }
        SignalContext { signals }
    }

    pub fn signal_type(&self, name: &str) -> Option<SignalType> {
        self.signals.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalType)> {
        self.signals.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

// ── Expression Types ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprType {
    Bool,
    Int,
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Bool => write!(f, "bool"),
            ExprType::Int => write!(f, "int"),
        }
    }
}

// ── Compiled Expression ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum CompiledExpr {
    Literal(Literal),
    Signal {
        name: String,
        ty: ExprType,
    },
    Prev {
        inner: Box<CompiledExpr>,
        /// Result type, so an absent previous cycle reads as false / 0.
        ty: ExprType,
    },
    Rose {
        inner: Box<CompiledExpr>,
    },
    Fell {
        inner: Box<CompiledExpr>,
    },
    Bits {
        source: Box<CompiledExpr>,
        hi: u8,
        lo: u8,
    },
    InSet {
        value: Box<CompiledExpr>,
        members: Vec<i64>,
    },
    Op {
        op: OpKind,
        args: Vec<CompiledExpr>,
    },
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown signal '{name}'")]
    UnknownSignal { name: String },

    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    #[error("Operator '{op}' expects {expected} argument(s), got {actual}")]
    Arity {
        op: String,
        expected: String,
        actual: usize,
    },

    #[error("Invalid bit range [{hi}:{lo}]")]
    InvalidBitRange { hi: u8, lo: u8 },

    #[error("Bit {hi} is outside the declared width {width} of signal '{name}'")]
    BitRangeExceedsWidth { hi: u8, width: u8, name: String },

    #[error("prev/rose/fell cannot be nested; only one cycle of history is retained")]
    NestedHistory,

    #[error("Predicate must evaluate to bool, got {actual}")]
    NotBoolean { actual: String },
}

// ── Compilation ──────────────────────────────────────────────────────

/// Compile an expression that must produce a boolean (a trigger,
/// consequent, disable, or coverage predicate).
pub fn compile_predicate(expr: &Expr, ctx: &SignalContext) -> Result<CompiledExpr, CompileError> {
    let (compiled, ty) = compile_typed(expr, ctx, false)?;
    if ty != ExprType::Bool {
        return Err(CompileError::NotBoolean { actual: ty.to_string() });
    }
    Ok(compiled)
}

/// Recursive worker. `in_history` is true inside prev/rose/fell, where
/// further history operators are rejected (only two snapshots exist).
fn compile_typed(
    expr: &Expr,
    ctx: &SignalContext,
    in_history: bool,
) -> Result<(CompiledExpr, ExprType), CompileError> {
    match expr {
        Expr::Literal(lit) => {
            let ty = match lit {
                Literal::Bool(_) => ExprType::Bool,
                Literal::Int(_) => ExprType::Int,
            };
            Ok((CompiledExpr::Literal(*lit), ty))
        }

        Expr::Signal { name } => {
            let signal_type = ctx
                .signal_type(name)
                .ok_or_else(|| CompileError::UnknownSignal { name: name.clone() })?;
            let ty = match signal_type {
                SignalType::Bool => ExprType::Bool,
                SignalType::Int { .. } => ExprType::Int,
            };
            Ok((CompiledExpr::Signal { name: name.clone(), ty }, ty))
        }

        Expr::Prev { inner } => {
            if in_history {
                return Err(CompileError::NestedHistory);
            }
            let (compiled, ty) = compile_typed(inner, ctx, true)?;
            Ok((CompiledExpr::Prev { inner: Box::new(compiled), ty }, ty))
        }

        Expr::Rose { inner } | Expr::Fell { inner } => {
            if in_history {
                return Err(CompileError::NestedHistory);
            }
            let (compiled, ty) = compile_typed(inner, ctx, true)?;
            if ty != ExprType::Bool {
                return Err(CompileError::TypeError {
                    expected: "bool".to_string(),
                    actual: ty.to_string(),
                });
            }
            let inner = Box::new(compiled);
            let compiled = match expr {
                Expr::Rose { .. } => CompiledExpr::Rose { inner },
                _ => CompiledExpr::Fell { inner },
            };
            Ok((compiled, ExprType::Bool))
        }

        Expr::Bits { source, hi, lo } => {
            if hi < lo || *hi > 62 {
                return Err(CompileError::InvalidBitRange { hi: *hi, lo: *lo });
            }
            // The declared width bounds the range whether the signal is
            // read directly or through prev.
            let underlying = match source.as_ref() {
                Expr::Signal { name } => Some(name),
                Expr::Prev { inner } => match inner.as_ref() {
                    Expr::Signal { name } => Some(name),
                    _ => None,
                },
                _ => None,
            };
            if let Some(name) = underlying {
                if let Some(SignalType::Int { width: Some(width) }) = ctx.signal_type(name) {
                    if *hi >= width {
                        return Err(CompileError::BitRangeExceedsWidth {
                            hi: *hi,
                            width,
                            name: name.clone(),
                        });
                    }
                }
            }
            let (compiled, ty) = compile_typed(source, ctx, in_history)?;
            if ty != ExprType::Int {
                return Err(CompileError::TypeError {
                    expected: "int".to_string(),
                    actual: ty.to_string(),
                });
            }
            Ok((
                CompiledExpr::Bits { source: Box::new(compiled), hi: *hi, lo: *lo },
                ExprType::Int,
            ))
        }

        Expr::InSet { value, members } => {
            let (compiled, ty) = compile_typed(value, ctx, in_history)?;
            if ty != ExprType::Int {
                return Err(CompileError::TypeError {
                    expected: "int".to_string(),
                    actual: ty.to_string(),
                });
            }
            Ok((
                CompiledExpr::InSet { value: Box::new(compiled), members: members.clone() },
                ExprType::Bool,
            ))
        }

        Expr::Op { op, args } => compile_op(*op, args, ctx, in_history),
    }
}

fn compile_op(
    op: OpKind,
    args: &[Expr],
    ctx: &SignalContext,
    in_history: bool,
) -> Result<(CompiledExpr, ExprType), CompileError> {
    let compiled = args
        .iter()
        .map(|a| compile_typed(a, ctx, in_history))
        .collect::<Result<Vec<_>, _>>()?;

    match op {
        OpKind::Eq | OpKind::Neq => {
            check_arity(op, &compiled, 2)?;
            let (_, left) = &compiled[0];
            let (_, right) = &compiled[1];
            if left != right {
                return Err(CompileError::TypeError {
                    expected: left.to_string(),
                    actual: right.to_string(),
                });
            }
        }
        OpKind::And | OpKind::Or => {
            if compiled.len() < 2 {
                return Err(CompileError::Arity {
                    op: op_name(op).to_string(),
                    expected: "at least 2".to_string(),
                    actual: compiled.len(),
                });
            }
            check_all_bool(&compiled)?;
        }
        OpKind::Not => {
            check_arity(op, &compiled, 1)?;
            check_all_bool(&compiled)?;
        }
        OpKind::Implies => {
            check_arity(op, &compiled, 2)?;
            check_all_bool(&compiled)?;
        }
        OpKind::Lt | OpKind::Lte | OpKind::Gt | OpKind::Gte => {
            check_arity(op, &compiled, 2)?;
            for (_, ty) in &compiled {
                if *ty != ExprType::Int {
                    return Err(CompileError::TypeError {
                        expected: "int".to_string(),
                        actual: ty.to_string(),
                    });
                }
            }
        }
    }

    let args = compiled.into_iter().map(|(expr, _)| expr).collect();
    Ok((CompiledExpr::Op { op, args }, ExprType::Bool))
}

fn check_arity(
    op: OpKind,
    compiled: &[(CompiledExpr, ExprType)],
    want: usize,
) -> Result<(), CompileError> {
    if compiled.len() != want {
        return Err(CompileError::Arity {
            op: op_name(op).to_string(),
            expected: want.to_string(),
            actual: compiled.len(),
        });
    }
    Ok(())
}

fn check_all_bool(compiled: &[(CompiledExpr, ExprType)]) -> Result<(), CompileError> {
    for (_, ty) in compiled {
        if *ty != ExprType::Bool {
            return Err(CompileError::TypeError {
                expected: "bool".to_string(),
                actual: ty.to_string(),
            });
        }
    }
    Ok(())
}

fn op_name(op: OpKind) -> &'static str {
    match op {
        OpKind::Eq => "eq",
        OpKind::Neq => "neq",
        OpKind::And => "and",
        OpKind::Or => "or",
        OpKind::Not => "not",
        OpKind::Implies => "implies",
        OpKind::Lt => "lt",
        OpKind::Lte => "lte",
        OpKind::Gt => "gt",
        OpKind::Gte => "gte",
    }
}
