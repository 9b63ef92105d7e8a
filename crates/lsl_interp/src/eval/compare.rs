use lsl_ast::ast::BinOp;

use crate::value::Value;

/// Comparison with LSL's loose typing.
///
/// Numeric comparison is tried first (numeric strings count). Lists compare
/// by length. Everything else compares as text, where only equality is
/// meaningful and every ordering is false.
pub(super) fn compare(op: BinOp, l: &Value, r: &Value) -> bool {
    if let (Value::List(a), Value::List(b)) = (l, r) {
        return match op {
            BinOp::Eq => a.len() == b.len(),
            BinOp::NotEq => a.len() != b.len(),
            _ => false,
        };
    }

    if let (Some(a), Some(b)) = (l.as_number(), r.as_number()) {
        return match op {
            BinOp::Eq => a == b,
            BinOp::NotEq => a != b,
            BinOp::Lt => a < b,
            BinOp::Gt => a > b,
            BinOp::LtEq => a <= b,
            BinOp::GtEq => a >= b,
            _ => false,
        };
    }

    let (a, b) = (l.to_string(), r.to_string());
    match op {
        BinOp::Eq => a == b,
        BinOp::NotEq => a != b,
        _ => false,
    }
}
