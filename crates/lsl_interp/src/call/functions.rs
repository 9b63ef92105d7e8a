use lsl_ast::ast::FnDecl;

use crate::eval::eval_block;
use crate::value::Value;
use crate::{bind_params, Env, Fault, Flow, Scope};

/// Invoke a script function with evaluated positional arguments.
///
/// Each invocation gets a fresh local namespace; the caller's locals are
/// restored afterwards. Once `max_recursion_depth` frames are active the
/// call is skipped, a `RecursionLimitExceeded` fault is recorded and the
/// return type's default stands in.
pub(crate) fn call_user(env: &mut Env, func: &FnDecl, args: Vec<Value>) -> Value {
    let fallback = match func.return_ty {
        Some(ty) => Value::default_for(ty),
        None => Value::str(""),
    };

    let limit = env.config.max_recursion_depth;
    if env.runtime.depth >= limit {
        env.fault(Fault::RecursionLimitExceeded {
            function: func.name.to_string(),
            limit,
        });
        return fallback;
    }

    tracing::trace!(function = %func.name, depth = env.runtime.depth, "call");
    env.runtime.depth += 1;
    let saved = std::mem::replace(&mut env.scopes, vec![Scope::new()]);
    bind_params(env, &func.params, args);
    let flow = eval_block(env, &func.body);
    env.scopes = saved;
    env.runtime.depth -= 1;

    match (flow, func.return_ty) {
        (Flow::Return(Some(value)), Some(ty)) => value.coerce(ty),
        (Flow::Return(Some(value)), None) => value,
        _ => fallback,
    }
}
