use lockstep_compiler::predicate::{CompiledExpr, ExprType};
use lockstep_ir::expr::{Literal, OpKind};

use crate::snapshot::{Snapshot, Value};

/// Evaluate a compiled expression at the current cycle, with the
/// previous cycle visible through `prev`.
///
/// Total by construction: names, types, and arity were checked at
/// compile time. On the first cycle (`prev` absent) any previous-cycle
/// reference reads as false / 0. The driver rejects snapshots missing a
/// declared signal or carrying a mistyped value before stepping, so
/// lookups here cannot miss or type-flip.
pub fn eval(expr: &CompiledExpr, prev: Option<&Snapshot>, cur: &Snapshot) -> Value {
    match expr {
        CompiledExpr::Literal(lit) => match lit {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
        },

        CompiledExpr::Signal { name, ty } => cur.value(name).unwrap_or_else(|| absent(*ty)),

        CompiledExpr::Prev { inner, ty } => match prev {
            Some(previous) => eval(inner, None, previous),
            None => absent(*ty),
        },

        CompiledExpr::Rose { inner } => {
            let now = as_bool(eval(inner, None, cur));
            let before = prev.map_or(false, |p| as_bool(eval(inner, None, p)));
            Value::Bool(now && !before)
        }

        CompiledExpr::Fell { inner } => {
            let now = as_bool(eval(inner, None, cur));
            let before = prev.map_or(false, |p| as_bool(eval(inner, None, p)));
            Value::Bool(!now && before)
        }

        CompiledExpr::Bits { source, hi, lo } => {
            let raw = as_int(eval(source, prev, cur)) as u64;
            let width = hi - lo + 1;
            let mask = (1u64 << width) - 1;
            Value::Int(((raw >> lo) & mask) as i64)
        }

        CompiledExpr::InSet { value, members } => {
            let v = as_int(eval(value, prev, cur));
            Value::Bool(members.contains(&v))
        }

        CompiledExpr::Op { op, args } => eval_op(*op, args, prev, cur),
    }
}

/// Evaluate a compiled predicate (an expression the compiler verified
/// to be boolean).
pub fn eval_bool(expr: &CompiledExpr, prev: Option<&Snapshot>, cur: &Snapshot) -> bool {
    as_bool(eval(expr, prev, cur))
}

fn eval_op(op: OpKind, args: &[CompiledExpr], prev: Option<&Snapshot>, cur: &Snapshot) -> Value {
    match op {
        OpKind::Eq => Value::Bool(eval(&args[0], prev, cur) == eval(&args[1], prev, cur)),
        OpKind::Neq => Value::Bool(eval(&args[0], prev, cur) != eval(&args[1], prev, cur)),
        OpKind::And => {
            for arg in args {
                if !as_bool(eval(arg, prev, cur)) {
                    return Value::Bool(false);
                }
            }
            Value::Bool(true)
        }
        OpKind::Or => {
            for arg in args {
                if as_bool(eval(arg, prev, cur)) {
                    return Value::Bool(true);
                }
            }
            Value::Bool(false)
        }
        OpKind::Not => Value::Bool(!as_bool(eval(&args[0], prev, cur))),
        OpKind::Implies => {
            if as_bool(eval(&args[0], prev, cur)) {
                eval(&args[1], prev, cur)
            } else {
                Value::Bool(true)
            }
        }
        OpKind::Lt => eval_int_compare(args, prev, cur, |a, b| a < b),
        OpKind::Lte => eval_int_compare(args, prev, cur, |a, b| a <= b),
        OpKind::Gt => eval_int_compare(args, prev, cur, |a, b| a > b),
        OpKind::Gte => eval_int_compare(args, prev, cur, |a, b| a >= b),
    }
}

fn eval_int_compare(
    args: &[CompiledExpr],
    prev: Option<&Snapshot>,
    cur: &Snapshot,
    cmp: fn(i64, i64) -> bool,
) -> Value {
    let left = as_int(eval(&args[0], prev, cur));
    let right = as_int(eval(&args[1], prev, cur));
    Value::Bool(cmp(left, right))
}

fn absent(ty: ExprType) -> Value {
    match ty {
        ExprType::Bool => Value::Bool(false),
        ExprType::Int => Value::Int(0),
    }
}

// Compilation and the driver's shape check guarantee the variant; the
// fallback keeps eval total.
fn as_bool(value: Value) -> bool {
    match value {
        Value::Bool(b) => b,
        Value::Int(_) => false,
    }
}

fn as_int(value: Value) -> i64 {
    match value {
        Value::Int(i) => i,
        Value::Bool(_) => 0,
    }
}
