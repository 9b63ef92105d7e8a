use std::path::Path;

use lsl_ast::ast::Expr;
use lsl_ast::diagnostic::Diagnostic;
use lsl_interp::builtins::NULL_KEY;
use lsl_interp::model::ScriptModel;
use lsl_interp::state::RuntimeState;
use lsl_interp::value::Value;
use lsl_interp::{Fault, Interpreter};

use crate::config::HarnessConfig;
use crate::dispatcher::Dispatcher;
use crate::error::HarnessError;
use crate::recorder::CallRecorder;
use crate::routing::RoutingMode;
use crate::session::Session;

/// LSL reports at most this many detections per event.
const MAX_DETECTED: i64 = 16;

/// What an injected event led to. Injection never fails; anything that
/// goes wrong is described here and in the fault log.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A handler, script function or protocol step ran.
    Handled,
    /// Routing filtered the message out.
    Rejected { reason: String },
    /// Accepted, but inconsistent with the current session.
    Inert { reason: String },
    /// Accepted, but not a message type the protocol reacts to.
    Ignored,
    HandlerAbsent,
    NotLoaded,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled)
    }
}

/// One loaded script together with everything it can touch.
///
/// Each harness owns its model, runtime state, session and recorder, so
/// two harnesses never observe each other.
pub struct Harness {
    config: HarnessConfig,
    model: Option<ScriptModel>,
    runtime: RuntimeState,
    session: Session,
    recorder: CallRecorder,
    routing: RoutingMode,
}

impl Default for Harness {
    fn default() -> Self {
        Harness::new(HarnessConfig::default())
    }
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let runtime = RuntimeState::new(config.rng_seed);
        Harness {
            config,
            model: None,
            runtime,
            session: Session::default(),
            recorder: CallRecorder::new(),
            routing: RoutingMode::default(),
        }
    }

    // ── Loading ────────────────────────────────────────────────

    /// Load a script: build its model, seed the globals and fire
    /// `state_entry`. Replaces any previously loaded script. Returns the
    /// parser diagnostics.
    pub fn load(&mut self, source: &str) -> Result<Vec<Diagnostic>, HarnessError> {
        self.reset();
        let model = ScriptModel::build(source)?;
        self.routing = RoutingMode::from_constant(model.routing_mode().as_deref());
        tracing::debug!(
            identity = ?model.identity(),
            routing = %self.routing,
            diagnostics = model.diagnostics().len(),
            "loaded script"
        );
        let diagnostics = model.diagnostics().to_vec();
        self.model = Some(model);

        if let Some(model) = &self.model {
            Interpreter::new(model, &self.config.eval)
                .seed_globals(&mut self.runtime, &mut self.recorder);
        }
        if self.has_handler("state_entry") {
            self.state_entry();
        }
        Ok(diagnostics)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Diagnostic>, HarnessError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&source)
    }

    /// Forget the script, globals, session, faults and recorded calls, and
    /// reseed the RNG.
    pub fn reset(&mut self) {
        self.model = None;
        self.runtime = RuntimeState::new(self.config.rng_seed);
        self.session = Session::default();
        self.recorder.clear();
        self.routing = RoutingMode::default();
    }

    /// Drop recorded calls and faults; keep the script and its state.
    pub fn clear_outputs(&mut self) {
        self.recorder.clear();
        self.runtime.clear_faults();
    }

    // ── Event injection ────────────────────────────────────────

    fn dispatcher(&mut self, event: &str) -> Option<Dispatcher<'_>> {
        let Some(model) = self.model.as_ref() else {
            self.runtime.record_fault(Fault::NotLoaded {
                event: event.to_string(),
            });
            return None;
        };
        Some(Dispatcher {
            model,
            interp: Interpreter::new(model, &self.config.eval),
            runtime: &mut self.runtime,
            session: &mut self.session,
            recorder: &mut self.recorder,
            routing: self.routing,
            button_handlers: &self.config.button_handlers,
        })
    }

    fn fire(&mut self, event: &str, args: Vec<Value>) -> Outcome {
        match self.dispatcher(event) {
            Some(mut d) => d.event(event, args),
            None => Outcome::NotLoaded,
        }
    }

    pub fn state_entry(&mut self) -> Outcome {
        self.fire("state_entry", Vec::new())
    }

    pub fn on_rez(&mut self, start_param: i64) -> Outcome {
        self.fire("on_rez", vec![Value::Int(start_param)])
    }

    /// `touch_start` from `count` avatars. Each detected key is the owner;
    /// at most `MAX_DETECTED` are recorded.
    pub fn touch_start(&mut self, count: i64) -> Outcome {
        let owner = self.config.eval.owner_key.clone();
        let detected = count.clamp(0, MAX_DETECTED) as usize;
        self.runtime.detected = vec![owner; detected];
        self.fire("touch_start", vec![Value::Int(count)])
    }

    /// `touch_start` from one specific avatar.
    pub fn touch_start_by(&mut self, avatar: &str) -> Outcome {
        self.runtime.detected = vec![avatar.to_string()];
        self.fire("touch_start", vec![Value::Int(1)])
    }

    pub fn timer(&mut self) -> Outcome {
        self.fire("timer", Vec::new())
    }

    pub fn listen(&mut self, channel: i64, name: &str, id: &str, message: &str) -> Outcome {
        self.fire(
            "listen",
            vec![
                Value::Int(channel),
                Value::str(name),
                Value::Key(id.to_string()),
                Value::str(message),
            ],
        )
    }

    pub fn changed(&mut self, mask: i64) -> Outcome {
        self.fire("changed", vec![Value::Int(mask)])
    }

    /// Deliver a bus message. `sender` and `id` are accepted for fidelity
    /// with the event signature; the protocol does not consult them.
    pub fn link_message(&mut self, sender: i64, channel: i64, json: &str, id: &str) -> Outcome {
        tracing::trace!(sender, channel, id, "inject link_message");
        match self.dispatcher("link_message") {
            Some(mut d) => d.link_message(channel, json),
            None => Outcome::NotLoaded,
        }
    }

    /// `link_message` from the root prim with a null id.
    pub fn send(&mut self, channel: i64, json: &str) -> Outcome {
        self.link_message(lsl_interp::builtins::LINK_ROOT, channel, json, NULL_KEY)
    }

    /// Evaluate a standalone expression against the loaded script's
    /// constants and globals. Calls it makes are recorded like any other.
    pub fn eval_expr(&mut self, expr: &Expr) -> Option<Value> {
        let model = self.model.as_ref()?;
        let value = Interpreter::new(model, &self.config.eval).eval_expr(
            &mut self.runtime,
            &mut self.recorder,
            expr,
        );
        Some(value)
    }

    // ── Inspection ─────────────────────────────────────────────

    pub fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    pub fn faults(&self) -> &[Fault] {
        self.runtime.faults()
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.runtime.global(name)
    }

    pub fn globals(&self) -> Vec<(&str, &Value)> {
        self.runtime.globals()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn model(&self) -> Option<&ScriptModel> {
        self.model.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.routing
    }

    pub fn script_identity(&self) -> Option<String> {
        self.model.as_ref().and_then(ScriptModel::identity)
    }

    pub fn script_context(&self) -> Option<String> {
        self.model.as_ref().and_then(ScriptModel::context)
    }

    pub fn has_handler(&self, event: &str) -> bool {
        self.model.as_ref().is_some_and(|m| m.has_handler(event))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.model.as_ref().map(ScriptModel::diagnostics).unwrap_or(&[])
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Evaluator settings take effect on the next event; a new seed takes
    /// effect on the next load or reset.
    pub fn config_mut(&mut self) -> &mut HarnessConfig {
        &mut self.config
    }
}
