mod api;
mod functions;

use lsl_ast::ast::Expr;
use lsl_ast::Name;

use crate::builtins::Builtin;
use crate::eval::eval_expr;
use crate::value::Value;
use crate::{Env, Fault};

// Re-export the crate-visible API.
pub(crate) use functions::call_user;

/// Evaluate a call expression. Script functions shadow library functions
/// of the same name; an unknown callee yields `""` and a fault.
pub(crate) fn eval_call(env: &mut Env, callee: &Name, args: &[Expr]) -> Value {
    let values: Vec<Value> = args.iter().map(|arg| eval_expr(env, arg)).collect();

    let model = env.model;
    if let Some(func) = model.function(callee) {
        return call_user(env, func, values);
    }
    if let Some(builtin) = Builtin::from_name(callee) {
        return api::call_builtin(env, builtin, values);
    }

    env.fault(Fault::UnresolvedReference {
        name: callee.to_string(),
    });
    Value::str("")
}
