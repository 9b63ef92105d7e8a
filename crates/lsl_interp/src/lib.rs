use std::collections::HashMap;

use lsl_ast::ast::{Expr, Param};

pub mod builtins;
mod call;
pub mod config;
pub mod effect;
mod eval;
pub mod json;
pub mod model;
pub mod state;
pub mod value;

use config::{EvalConfig, ScopeMode};
use effect::CallSink;
use model::ScriptModel;
use state::RuntimeState;
use value::Value;

// ── Fault ──────────────────────────────────────────────────────

/// A non-fatal problem met while dispatching or evaluating.
///
/// Faults never abort execution. The evaluator substitutes a default value
/// (or skips the step), logs the fault and appends it to the runtime fault
/// log so tests can assert on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    #[error("no handler for event '{event}'")]
    HandlerAbsent { event: String },
    #[error("unresolved reference '{name}'")]
    UnresolvedReference { name: String },
    #[error("message rejected by {mode} routing: {reason}")]
    RoutingRejected { mode: String, reason: String },
    #[error("call to '{function}' skipped: recursion limit {limit} reached")]
    RecursionLimitExceeded { function: String, limit: usize },
    #[error("math error in '{op}'")]
    MathError { op: String },
    #[error("event '{event}' injected before any script was loaded")]
    NotLoaded { event: String },
}

// ── Interpreter ────────────────────────────────────────────────

/// Executes handlers and functions of one loaded script.
///
/// The interpreter itself is stateless; every mutable piece (globals,
/// execution context, recursion depth, RNG) lives in the `RuntimeState`
/// handed to each call, and side effects go out through the `CallSink`.
pub struct Interpreter<'m> {
    pub(crate) model: &'m ScriptModel,
    pub(crate) config: &'m EvalConfig,
}

impl<'m> Interpreter<'m> {
    pub fn new(model: &'m ScriptModel, config: &'m EvalConfig) -> Self {
        Interpreter { model, config }
    }

    /// Evaluate every global's initializer in declaration order and store
    /// the results as the runtime globals.
    pub fn seed_globals(&self, runtime: &mut RuntimeState, sink: &mut dyn CallSink) {
        let model = self.model;
        let mut env = Env::new(self, runtime, sink);
        for global in model.globals() {
            let value = match &global.value {
                Some(init) => eval::eval_expr(&mut env, init).coerce(global.ty),
                None => Value::default_for(global.ty),
            };
            tracing::trace!(name = %global.name, %value, "seeded global");
            env.runtime.set_global(global.name.as_str(), value);
        }
    }

    /// Run the default-state handler for `event` with positional arguments.
    /// Returns false when the script declares no such handler.
    pub fn run_handler(
        &self,
        runtime: &mut RuntimeState,
        sink: &mut dyn CallSink,
        event: &str,
        args: Vec<Value>,
    ) -> bool {
        let Some(handler) = self.model.handler(event) else {
            return false;
        };
        tracing::debug!(event, "running handler");
        let mut env = Env::new(self, runtime, sink);
        bind_params(&mut env, &handler.params, args);
        eval::eval_block(&mut env, &handler.body);
        true
    }

    /// Call a script function with positional arguments. Returns `None`
    /// when the function does not exist.
    pub fn call_function(
        &self,
        runtime: &mut RuntimeState,
        sink: &mut dyn CallSink,
        name: &str,
        args: Vec<Value>,
    ) -> Option<Value> {
        let func = self.model.function(name)?;
        let mut env = Env::new(self, runtime, sink);
        Some(call::call_user(&mut env, func, args))
    }

    /// Call a script function, filling each parameter from the execution
    /// context entry of the same name. Parameters with no context entry
    /// take their type's default.
    pub fn call_with_context(
        &self,
        runtime: &mut RuntimeState,
        sink: &mut dyn CallSink,
        name: &str,
    ) -> Option<Value> {
        let func = self.model.function(name)?;
        let args = func
            .params
            .iter()
            .map(|p| {
                runtime
                    .context
                    .get(p.name.as_str())
                    .cloned()
                    .unwrap_or_else(|| Value::default_for(p.ty))
            })
            .collect();
        self.call_function(runtime, sink, name, args)
    }

    /// Evaluate a standalone expression against the script's globals.
    pub fn eval_expr(&self, runtime: &mut RuntimeState, sink: &mut dyn CallSink, expr: &Expr) -> Value {
        let mut env = Env::new(self, runtime, sink);
        eval::eval_expr(&mut env, expr)
    }
}

pub(crate) fn bind_params(env: &mut Env, params: &[Param], args: Vec<Value>) {
    let mut args = args.into_iter();
    for param in params {
        let value = args
            .next()
            .map(|v| v.coerce(param.ty))
            .unwrap_or_else(|| Value::default_for(param.ty));
        env.bind(param.name.to_string(), value);
    }
}

// ── Env (execution environment) ────────────────────────────────

/// Mutable execution environment for one top-level call.
pub(crate) struct Env<'a> {
    pub model: &'a ScriptModel,
    pub config: &'a EvalConfig,
    pub runtime: &'a mut RuntimeState,
    pub sink: &'a mut dyn CallSink,
    pub scopes: Vec<Scope>,
}

impl<'a> Env<'a> {
    pub fn new(interp: &Interpreter<'a>, runtime: &'a mut RuntimeState, sink: &'a mut dyn CallSink) -> Self {
        Env {
            model: interp.model,
            config: interp.config,
            runtime,
            sink,
            scopes: vec![Scope::new()],
        }
    }

    /// Enter a branch block. Under flat scoping this is a no-op, so locals
    /// declared inside a branch stay visible after it.
    pub fn push_scope(&mut self) {
        if self.config.scope_mode == ScopeMode::Block {
            self.scopes.push(Scope::new());
        }
    }

    pub fn pop_scope(&mut self) {
        if self.config.scope_mode == ScopeMode::Block && self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind a variable in the current (innermost) scope.
    pub fn bind(&mut self, name: String, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name, value);
        }
    }

    /// Look up a variable by name, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
    }

    /// Record a fault in the runtime log.
    pub fn fault(&mut self, fault: Fault) {
        self.runtime.record_fault(fault);
    }
}

/// A single lexical scope containing variable bindings.
pub(crate) struct Scope {
    pub bindings: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: HashMap::new(),
        }
    }
}

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Flow {
    Normal,
    Return(Option<Value>),
}
