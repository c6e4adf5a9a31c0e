use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    Signal {
        name: String,
    },
    /// Value of the inner expression one cycle earlier. Reads as the
    /// absent value (false / 0) on the first cycle.
    Prev {
        inner: Box<Expr>,
    },
    /// True the cycle a boolean expression goes from false to true.
    Rose {
        inner: Box<Expr>,
    },
    /// True the cycle a boolean expression goes from true to false.
    Fell {
        inner: Box<Expr>,
    },
    /// Unsigned extraction of bits [hi:lo] from an integer expression.
    Bits {
        source: Box<Expr>,
        hi: u8,
        lo: u8,
    },
    /// Integer membership in a constant set.
    InSet {
        value: Box<Expr>,
        members: Vec<i64>,
    },
    Op {
        op: OpKind,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Eq,
    Neq,
    And,
    Or,
    Not,
    Implies,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_expr(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_expr(value: &serde_json::Value) -> Result<Expr, String> {
    match value {
        // Literals: bool, integer
        serde_json::Value::Bool(b) => Ok(Expr::Literal(Literal::Bool(*b))),
        serde_json::Value::Number(n) => {
            let i = n.as_i64().ok_or_else(|| format!("unsupported number: {n}"))?;
            Ok(Expr::Literal(Literal::Int(i)))
        }

        // A bare string is shorthand for a signal reference
        serde_json::Value::String(s) => Ok(Expr::Signal { name: s.clone() }),

        // Array forms: ["op", ...args]
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                return Err("empty expression array".to_string());
            }
            let tag = arr[0].as_str().ok_or_else(|| {
                format!("first element of expression array must be a string, got: {:?}", arr[0])
            })?;

            match tag {
                // Signal reference: ["sig", name]
                "sig" => {
                    if arr.len() != 2 {
                        return Err(format!("sig expression requires 2 elements, got {}", arr.len()));
                    }
                    let name = arr[1].as_str().ok_or("signal name must be a string")?.to_string();
                    Ok(Expr::Signal { name })
                }

                // Previous-cycle and edge forms: ["prev"|"rose"|"fell", expr]
                "prev" | "rose" | "fell" => {
                    if arr.len() != 2 {
                        return Err(format!("{tag} expression requires 2 elements, got {}", arr.len()));
                    }
                    let inner = Box::new(parse_expr(&arr[1])?);
                    Ok(match tag {
                        "prev" => Expr::Prev { inner },
                        "rose" => Expr::Rose { inner },
                        "fell" => Expr::Fell { inner },
                        _ => unreachable!(),
                    })
                }

                // Bitfield extraction: ["bits", expr, hi, lo]
                "bits" => {
                    if arr.len() != 4 {
                        return Err(format!("bits expression requires 4 elements, got {}", arr.len()));
                    }
                    let source = Box::new(parse_expr(&arr[1])?);
                    let hi = parse_bit_index(&arr[2], "hi")?;
                    let lo = parse_bit_index(&arr[3], "lo")?;
                    Ok(Expr::Bits { source, hi, lo })
                }

                // Set membership: ["in", expr, [c1, c2, ...]]
                "in" => {
                    if arr.len() != 3 {
                        return Err(format!("in expression requires 3 elements, got {}", arr.len()));
                    }
                    let value = Box::new(parse_expr(&arr[1])?);
                    let set = arr[2].as_array().ok_or("in members must be an array")?;
                    let members = set
                        .iter()
                        .map(|v| v.as_i64().ok_or_else(|| format!("in member must be an integer, got: {v}")))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expr::InSet { value, members })
                }

                // Operators: ["eq"|"neq"|"and"|"or"|"not"|"implies"|"lt"|"lte"|"gt"|"gte", ...args]
                _ => {
                    let op = match tag {
                        "eq" => OpKind::Eq,
                        "neq" => OpKind::Neq,
                        "and" => OpKind::And,
                        "or" => OpKind::Or,
                        "not" => OpKind::Not,
                        "implies" => OpKind::Implies,
                        "lt" => OpKind::Lt,
                        "lte" => OpKind::Lte,
                        "gt" => OpKind::Gt,
                        "gte" => OpKind::Gte,
                        other => return Err(format!("unknown expression operator: {other}")),
                    };
                    let args = arr[1..]
                        .iter()
                        .map(parse_expr)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expr::Op { op, args })
                }
            }
        }

        other => Err(format!("unsupported expression value: {other}")),
    }
}

fn parse_bit_index(value: &serde_json::Value, which: &str) -> Result<u8, String> {
    let n = value
        .as_u64()
        .ok_or_else(|| format!("bits {which} must be a non-negative integer, got: {value}"))?;
    u8::try_from(n).map_err(|_| format!("bits {which} out of range: {n}"))
}
