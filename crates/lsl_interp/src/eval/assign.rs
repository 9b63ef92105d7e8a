use lsl_ast::ast::{AssignOp, BinOp, Expr, TypeName};
use lsl_ast::Name;

use crate::value::Value;
use crate::Env;

use super::dispatch::{eval_expr, eval_ident};
use super::ops::apply_binop;

/// `TYPE name [= expr];` always binds a local.
pub(super) fn declare(env: &mut Env, ty: TypeName, name: &Name, value: Option<&Expr>) {
    let value = match value {
        Some(init) => eval_expr(env, init).coerce(ty),
        None => Value::default_for(ty),
    };
    env.bind(name.to_string(), value);
}

pub(super) fn assign(env: &mut Env, target: &Name, op: AssignOp, value: &Expr) {
    let rhs = eval_expr(env, value);
    let value = match op {
        AssignOp::Eq => rhs,
        AssignOp::PlusEq => compound(env, target, BinOp::Add, rhs),
        AssignOp::MinusEq => compound(env, target, BinOp::Sub, rhs),
        AssignOp::StarEq => compound(env, target, BinOp::Mul, rhs),
        AssignOp::SlashEq => compound(env, target, BinOp::Div, rhs),
    };
    store(env, target, value);
}

/// `x++` / `x--`.
pub(super) fn step(env: &mut Env, target: &Name, delta: i64) {
    let value = compound(env, target, BinOp::Add, Value::Int(delta));
    store(env, target, value);
}

fn compound(env: &mut Env, target: &Name, op: BinOp, rhs: Value) -> Value {
    let current = eval_ident(env, target);
    apply_binop(env, op, current, rhs)
}

/// Write a value to the slot `target` names.
///
/// An existing local wins. Constants are never written. Otherwise a name
/// already known as a global, or spelled with an upper-case initial, is a
/// global write; anything else becomes a local.
fn store(env: &mut Env, target: &Name, value: Value) {
    if let Some(slot) = env.lookup_mut(target) {
        let ty = slot_type(slot);
        *slot = value.coerce(ty);
        return;
    }

    if env.model.constant(target).is_some() {
        tracing::warn!(name = %target, "assignment to constant ignored");
        return;
    }

    let declared = env.model.global(target).map(|decl| decl.ty);
    if declared.is_some() || env.runtime.has_global(target) || target.is_upper_initial() {
        let value = match declared {
            Some(ty) => value.coerce(ty),
            None => value,
        };
        tracing::trace!(name = %target, %value, "global write");
        env.runtime.set_global(target.as_str(), value);
        return;
    }

    env.bind(target.to_string(), value);
}

fn slot_type(value: &Value) -> TypeName {
    match value {
        Value::Int(_) => TypeName::Integer,
        Value::Float(_) => TypeName::Float,
        Value::Str(_) => TypeName::String,
        Value::Key(_) => TypeName::Key,
        Value::List(_) => TypeName::List,
    }
}
