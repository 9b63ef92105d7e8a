use lsl_ast::ast::{BinOp, Expr, UnaryOp};

use crate::value::Value;
use crate::{Env, Fault};

use super::compare::compare;
use super::dispatch::eval_expr;

/// LSL integers are 32-bit and wrap on overflow.
fn wrap(n: i64) -> i64 {
    n as i32 as i64
}

fn symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::BitAnd => "&",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::LtEq => "<=",
        BinOp::GtEq => ">=",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
    }
}

// ── Unary operator evaluation ──────────────────────────────────

pub(super) fn eval_unary(env: &mut Env, op: UnaryOp, operand: &Expr) -> Value {
    let val = eval_expr(env, operand);
    match (op, val) {
        (UnaryOp::Not, val) => Value::bool(!val.is_truthy()),
        (UnaryOp::Neg, Value::Float(f)) => Value::Float(-f),
        (UnaryOp::Neg, val) => Value::Int(wrap(val.as_int().wrapping_neg())),
        (UnaryOp::BitNot, val) => Value::Int(wrap(!val.as_int())),
    }
}

// ── Binary operator evaluation ─────────────────────────────────

pub(super) fn eval_binop(env: &mut Env, op: BinOp, lhs: &Expr, rhs: &Expr) -> Value {
    // Short-circuit for logical operators
    match op {
        BinOp::And => {
            if !eval_expr(env, lhs).is_truthy() {
                return Value::Int(0);
            }
            return Value::bool(eval_expr(env, rhs).is_truthy());
        }
        BinOp::Or => {
            if eval_expr(env, lhs).is_truthy() {
                return Value::Int(1);
            }
            return Value::bool(eval_expr(env, rhs).is_truthy());
        }
        _ => {}
    }

    let l = eval_expr(env, lhs);
    let r = eval_expr(env, rhs);
    apply_binop(env, op, l, r)
}

/// Apply a binary operator to two evaluated operands. Shared with compound
/// assignment.
pub(super) fn apply_binop(env: &mut Env, op: BinOp, l: Value, r: Value) -> Value {
    match op {
        BinOp::And => Value::bool(l.is_truthy() && r.is_truthy()),
        BinOp::Or => Value::bool(l.is_truthy() || r.is_truthy()),
        BinOp::BitOr => Value::Int(wrap(l.as_int() | r.as_int())),
        BinOp::BitXor => Value::Int(wrap(l.as_int() ^ r.as_int())),
        BinOp::BitAnd => Value::Int(wrap(l.as_int() & r.as_int())),
        BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => {
            Value::bool(compare(op, &l, &r))
        }
        BinOp::Add => add(l, r),
        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arithmetic(env, op, l, r),
    }
}

/// `+` appends to lists, adds numbers and otherwise concatenates text.
fn add(l: Value, r: Value) -> Value {
    match (l, r) {
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Value::List(a)
        }
        (Value::List(mut a), other) => {
            a.push(other);
            Value::List(a)
        }
        (other, Value::List(mut b)) => {
            b.insert(0, other);
            Value::List(b)
        }
        (Value::Int(a), Value::Int(b)) => Value::Int(wrap(a.wrapping_add(b))),
        (l, r) if l.is_numeric() && r.is_numeric() => Value::Float(l.as_float() + r.as_float()),
        (l, r) => Value::Str(format!("{}{}", l, r)),
    }
}

fn arithmetic(env: &mut Env, op: BinOp, l: Value, r: Value) -> Value {
    let float = matches!(l, Value::Float(_)) || matches!(r, Value::Float(_));
    if float {
        let (a, b) = (l.as_float(), r.as_float());
        if matches!(op, BinOp::Div | BinOp::Mod) && b == 0.0 {
            return math_error(env, op, Value::Float(0.0));
        }
        return Value::Float(match op {
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
            _ => a % b,
        });
    }

    let (a, b) = (l.as_int() as i32, r.as_int() as i32);
    if matches!(op, BinOp::Div | BinOp::Mod) && b == 0 {
        return math_error(env, op, Value::Int(0));
    }
    let n = match op {
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => a.wrapping_div(b),
        _ => a.wrapping_rem(b),
    };
    Value::Int(n as i64)
}

fn math_error(env: &mut Env, op: BinOp, zero: Value) -> Value {
    env.fault(Fault::MathError {
        op: symbol(op).to_string(),
    });
    zero
}
