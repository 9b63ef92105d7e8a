use lsl_ast::ast::{Expr, ExprKind};
use lsl_ast::Name;

use crate::builtins;
use crate::call::eval_call;
use crate::value::Value;
use crate::{Env, Fault};

use super::ops::{eval_binop, eval_unary};

// ── Expression evaluator ───────────────────────────────────────

/// Evaluate an expression. Evaluation never fails: problems are recorded
/// as faults and a default value stands in.
pub(crate) fn eval_expr(env: &mut Env, expr: &Expr) -> Value {
    match &expr.node {
        ExprKind::IntLit(n) => Value::Int(*n),

        ExprKind::FloatLit(f) => Value::Float(*f),

        ExprKind::StringLit(s) => Value::Str(s.clone()),

        ExprKind::Ident(name) => eval_ident(env, name),

        // Lists never nest; a list element that is itself a list is spliced in.
        ExprKind::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match eval_expr(env, item) {
                    Value::List(inner) => out.extend(inner),
                    other => out.push(other),
                }
            }
            Value::List(out)
        }

        ExprKind::Cast { ty, expr } => eval_expr(env, expr).cast(*ty),

        ExprKind::Call { callee, args } => eval_call(env, callee, args),

        ExprKind::Unary { op, operand } => eval_unary(env, *op, operand),

        ExprKind::BinOp { op, lhs, rhs } => eval_binop(env, *op, lhs, rhs),
    }
}

// ── Identifier resolution ──────────────────────────────────────

/// Resolve a bare name: local, execution context, constant, runtime
/// global, initial global, sentinel. Anything else falls back to a
/// documented default and records an `UnresolvedReference` fault.
pub(super) fn eval_ident(env: &mut Env, name: &Name) -> Value {
    if let Some(value) = env.lookup(name) {
        return value.clone();
    }
    if let Some(value) = env.runtime.context.get(name) {
        return value.clone();
    }
    if let Some(value) = env.model.constant(name) {
        return value.clone();
    }
    if let Some(value) = env.runtime.global(name) {
        return value.clone();
    }

    let model = env.model;
    if let Some(decl) = model.global(name) {
        // Park the type default first so a self-referencing initializer
        // terminates.
        env.runtime
            .set_global(name.as_str(), Value::default_for(decl.ty));
        let value = match &decl.value {
            Some(init) => eval_expr(env, init).coerce(decl.ty),
            None => Value::default_for(decl.ty),
        };
        tracing::trace!(name = %name, %value, "initialized global lazily");
        env.runtime.set_global(name.as_str(), value.clone());
        return value;
    }

    if let Some(value) = builtins::sentinel(name) {
        return value;
    }

    env.fault(Fault::UnresolvedReference {
        name: name.to_string(),
    });
    builtins::unresolved_default(name)
}
