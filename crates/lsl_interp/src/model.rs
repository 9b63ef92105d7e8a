use std::collections::HashMap;

use lsl_ast::ast::{Expr, ExprKind, FnDecl, GlobalDecl, HandlerDecl, Script, TopLevel, UnaryOp};
use lsl_ast::diagnostic::Diagnostic;
use lsl_ast::Span;

use crate::builtins;
use crate::value::Value;

/// Why a script could not be loaded at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("malformed script: {reason}")]
    MalformedScript { reason: String },
    #[error("script source is empty")]
    EmptySource,
}

/// The static view of one loaded script: constants, globals, functions and
/// the default state's handlers. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct ScriptModel {
    source: String,
    constants: HashMap<String, Value>,
    globals: Vec<GlobalDecl>,
    global_index: HashMap<String, usize>,
    functions: HashMap<String, FnDecl>,
    handlers: HashMap<String, HandlerDecl>,
    states: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ScriptModel {
    pub fn build(source: &str) -> Result<ScriptModel, LoadError> {
        if source.trim().is_empty() {
            return Err(LoadError::EmptySource);
        }
        let (script, diagnostics) = lsl_parser::parse(source);
        Self::from_script(source, script, diagnostics)
    }

    fn from_script(
        source: &str,
        script: Script,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<ScriptModel, LoadError> {
        if script.default_state().is_none() {
            return Err(LoadError::MalformedScript {
                reason: "no default state".to_string(),
            });
        }

        let mut model = ScriptModel {
            source: source.to_string(),
            constants: HashMap::new(),
            globals: Vec::new(),
            global_index: HashMap::new(),
            functions: HashMap::new(),
            handlers: HashMap::new(),
            states: Vec::new(),
            diagnostics,
        };

        let mut seen_state = false;
        for item in script.items {
            match item.node {
                TopLevel::Global(decl) => model.add_global(decl, item.span),
                TopLevel::Function(func) if seen_state => {
                    model.warn(
                        format!("function '{}' declared after a state is ignored", func.name),
                        item.span,
                    );
                }
                TopLevel::Function(func) => {
                    if model.functions.contains_key(func.name.as_str()) {
                        model.warn(format!("duplicate function '{}'", func.name), item.span);
                        continue;
                    }
                    model.functions.insert(func.name.to_string(), func);
                }
                TopLevel::State(state) => {
                    seen_state = true;
                    if !state.is_default() {
                        model.states.push(state.name.to_string());
                        continue;
                    }
                    for handler in state.handlers {
                        let event = handler.node.event.to_string();
                        if model.handlers.contains_key(&event) {
                            model.warn(format!("duplicate handler '{}'", event), handler.span);
                            continue;
                        }
                        model.handlers.insert(event, handler.node);
                    }
                }
            }
        }

        tracing::debug!(
            constants = model.constants.len(),
            globals = model.globals.len(),
            functions = model.functions.len(),
            handlers = model.handlers.len(),
            "built script model"
        );
        Ok(model)
    }

    /// A screaming-case declaration with a literal initializer becomes a
    /// constant; anything else is a global.
    fn add_global(&mut self, decl: GlobalDecl, span: Span) {
        let name = decl.name.to_string();
        if self.constants.contains_key(&name) || self.global_index.contains_key(&name) {
            self.warn(format!("duplicate global '{}'", name), span);
            return;
        }
        if decl.name.is_screaming() {
            if let Some(value) = decl
                .value
                .as_ref()
                .and_then(|init| self.literal_value(init))
            {
                self.constants.insert(name, value.coerce(decl.ty));
                return;
            }
        }
        self.global_index.insert(name, self.globals.len());
        self.globals.push(decl);
    }

    fn literal_value(&self, expr: &Expr) -> Option<Value> {
        match &expr.node {
            ExprKind::IntLit(n) => Some(Value::Int(*n)),
            ExprKind::FloatLit(f) => Some(Value::Float(*f)),
            ExprKind::StringLit(s) => Some(Value::str(s.as_str())),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => match self.literal_value(operand)? {
                Value::Int(n) => Some(Value::Int(-n)),
                Value::Float(f) => Some(Value::Float(-f)),
                _ => None,
            },
            ExprKind::Ident(name) => self
                .constants
                .get(name.as_str())
                .cloned()
                .or_else(|| builtins::sentinel(name)),
            ExprKind::List(items) => items
                .iter()
                .map(|item| self.literal_value(item))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            _ => None,
        }
    }

    fn warn(&mut self, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }

    // ── Introspection ──────────────────────────────────────────

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `SCRIPT_ID`, falling back to `PLUGIN_CONTEXT`.
    pub fn identity(&self) -> Option<String> {
        self.constant_text("SCRIPT_ID")
            .or_else(|| self.constant_text("PLUGIN_CONTEXT"))
    }

    pub fn context(&self) -> Option<String> {
        self.constant_text("PLUGIN_CONTEXT")
    }

    /// Raw `ROUTING_MODE` constant, if declared.
    pub fn routing_mode(&self) -> Option<String> {
        self.constant_text("ROUTING_MODE")
    }

    fn constant_text(&self, name: &str) -> Option<String> {
        self.constants.get(name).map(Value::to_string)
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn global(&self, name: &str) -> Option<&GlobalDecl> {
        self.global_index.get(name).map(|&i| &self.globals[i])
    }

    /// Globals in declaration order.
    pub fn globals(&self) -> &[GlobalDecl] {
        &self.globals
    }

    pub fn function(&self, name: &str) -> Option<&FnDecl> {
        self.functions.get(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn handler(&self, event: &str) -> Option<&HandlerDecl> {
        self.handlers.get(event)
    }

    pub fn has_handler(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    /// Names of declared states other than `default`.
    pub fn other_states(&self) -> &[String] {
        &self.states
    }
}
