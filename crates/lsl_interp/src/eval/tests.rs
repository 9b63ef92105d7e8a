use crate::config::{EvalConfig, ScopeMode};
use crate::effect::{ApiCall, CallSink, Response};
use crate::model::ScriptModel;
use crate::state::RuntimeState;
use crate::value::Value;
use crate::{Fault, Interpreter};

// ── Test infrastructure ────────────────────────────────────

/// Records every call; listens get increasing handles.
#[derive(Default)]
struct Log {
    calls: Vec<ApiCall>,
}

impl CallSink for Log {
    fn handle(&mut self, call: ApiCall) -> Response {
        let listen = matches!(call, ApiCall::Listen { .. });
        self.calls.push(call);
        if listen {
            Response::Handle(self.calls.len() as i64)
        } else {
            Response::Acknowledged
        }
    }
}

impl Log {
    fn said(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ApiCall::OwnerSay { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

struct Fixture {
    model: ScriptModel,
    config: EvalConfig,
    runtime: RuntimeState,
    log: Log,
}

impl Fixture {
    fn new(source: &str) -> Self {
        Self::with_config(source, EvalConfig::default())
    }

    fn with_config(source: &str, config: EvalConfig) -> Self {
        let model = ScriptModel::build(source).expect("script loads");
        let mut fixture = Fixture {
            model,
            config,
            runtime: RuntimeState::new(Some(42)),
            log: Log::default(),
        };
        let interp = Interpreter::new(&fixture.model, &fixture.config);
        interp.seed_globals(&mut fixture.runtime, &mut fixture.log);
        fixture
    }

    fn fire(&mut self, event: &str, args: Vec<Value>) -> bool {
        let interp = Interpreter::new(&self.model, &self.config);
        interp.run_handler(&mut self.runtime, &mut self.log, event, args)
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Option<Value> {
        let interp = Interpreter::new(&self.model, &self.config);
        interp.call_function(&mut self.runtime, &mut self.log, name, args)
    }

    fn global(&self, name: &str) -> Option<Value> {
        self.runtime.global(name).cloned()
    }

    fn faults(&self) -> &[Fault] {
        self.runtime.faults()
    }
}

fn handler_script(body: &str) -> String {
    format!("default {{\n    touch_start(integer n) {{\n{}\n    }}\n}}\n", body)
}

// ── Scoping ────────────────────────────────────────────────

#[test]
fn branch_locals_survive_under_flat_scoping() {
    let src = handler_script(r#"if (TRUE) { string x = "inner"; } llOwnerSay(x);"#);
    let mut fx = Fixture::new(&src);
    assert!(fx.fire("touch_start", vec![Value::Int(1)]));
    assert_eq!(fx.log.said(), ["inner"]);
    assert!(fx.faults().is_empty(), "faults: {:?}", fx.faults());
}

#[test]
fn branch_locals_vanish_under_block_scoping() {
    let src = handler_script(r#"if (TRUE) { string x = "inner"; } llOwnerSay(x);"#);
    let config = EvalConfig {
        scope_mode: ScopeMode::Block,
        ..EvalConfig::default()
    };
    let mut fx = Fixture::with_config(&src, config);
    fx.fire("touch_start", vec![Value::Int(1)]);
    assert_eq!(fx.log.said(), [""]);
    assert_eq!(
        fx.faults(),
        [Fault::UnresolvedReference { name: "x".into() }]
    );
}

// ── Assignment ─────────────────────────────────────────────

#[test]
fn upper_initial_assignment_writes_global() {
    let src = handler_script("Mode = 3; temp = 4;");
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.global("Mode"), Some(Value::Int(3)));
    assert_eq!(fx.global("temp"), None);
}

#[test]
fn declared_lowercase_global_is_written() {
    let src = "integer counter = 5;\ndefault { touch_start(integer n) { counter = counter + n; } }";
    let mut fx = Fixture::new(src);
    fx.fire("touch_start", vec![Value::Int(2)]);
    fx.fire("touch_start", vec![Value::Int(2)]);
    assert_eq!(fx.global("counter"), Some(Value::Int(9)));
}

#[test]
fn local_shadows_global_on_assignment() {
    let src = "integer Counter = 5;\ndefault { touch_start(integer n) { integer Counter = 1; Counter = 2; llOwnerSay((string)Counter); } }";
    let mut fx = Fixture::new(src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["2"]);
    assert_eq!(fx.global("Counter"), Some(Value::Int(5)));
}

#[test]
fn constants_are_read_only() {
    let src = "integer LIMIT = 3;\ndefault { touch_start(integer n) { LIMIT = 9; llOwnerSay((string)LIMIT); } }";
    let mut fx = Fixture::new(src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["3"]);
}

#[test]
fn compound_assignment_and_steps() {
    let src = handler_script(
        r#"integer i = 1; i += 4; i *= 3; i -= 1; i /= 2; i++; ++i; i--;
           string s = "a"; s += "b";
           list l = ["x"]; l += "y"; l += ["z"];
           llOwnerSay((string)i + s + (string)llGetListLength(l));"#,
    );
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["8ab3"]);
}

#[test]
fn float_slot_keeps_its_type() {
    let src = handler_script("float f = 1; f = 2; llOwnerSay((string)f);");
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["2.000000"]);
}

// ── Control flow ───────────────────────────────────────────

#[test]
fn else_if_chain_runs_one_branch() {
    let src = r#"
string grade(integer n) {
    if (n >= 5) return "high";
    else if (n >= 3) return "mid";
    else return "low";
}
default { state_entry() { } }
"#;
    let mut fx = Fixture::new(src);
    assert_eq!(fx.call("grade", vec![Value::Int(6)]), Some(Value::str("high")));
    assert_eq!(fx.call("grade", vec![Value::Int(3)]), Some(Value::str("mid")));
    assert_eq!(fx.call("grade", vec![Value::Int(0)]), Some(Value::str("low")));
}

#[test]
fn return_from_nested_branch_yields_executed_value() {
    let src = r#"
integer pick(integer n) {
    if (n > 2) {
        if (n > 5) {
            return 10;
        }
        return 5;
    }
    return 1;
}
default { state_entry() { } }
"#;
    let mut fx = Fixture::new(src);
    assert_eq!(fx.call("pick", vec![Value::Int(9)]), Some(Value::Int(10)));
    assert_eq!(fx.call("pick", vec![Value::Int(4)]), Some(Value::Int(5)));
    assert_eq!(fx.call("pick", vec![Value::Int(0)]), Some(Value::Int(1)));
}

#[test]
fn guard_return_stops_handler() {
    let src = handler_script(r#"if (n == 0) return; llOwnerSay("ran");"#);
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![Value::Int(0)]);
    assert!(fx.log.said().is_empty());
    fx.fire("touch_start", vec![Value::Int(1)]);
    assert_eq!(fx.log.said(), ["ran"]);
}

#[test]
fn falling_off_the_end_yields_type_default() {
    let src = "string nothing() { }\ndefault { state_entry() { } }";
    let mut fx = Fixture::new(src);
    assert_eq!(fx.call("nothing", vec![]), Some(Value::str("")));
    assert_eq!(fx.call("missing", vec![]), None);
}

#[test]
fn unsupported_loop_is_skipped() {
    let src = handler_script(r#"integer i; while (i < 3) { i++; } llOwnerSay("after");"#);
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["after"]);
}

// ── Recursion ──────────────────────────────────────────────

#[test]
fn recursion_is_capped_with_one_fault() {
    let src = r#"
integer Frames = 0;
integer dive(integer n) {
    Frames = Frames + 1;
    return dive(n + 1);
}
default { state_entry() { } }
"#;
    let mut fx = Fixture::new(src);
    assert_eq!(fx.call("dive", vec![Value::Int(0)]), Some(Value::Int(0)));
    assert_eq!(fx.global("Frames"), Some(Value::Int(10)));
    assert_eq!(
        fx.faults(),
        [Fault::RecursionLimitExceeded {
            function: "dive".into(),
            limit: 10
        }]
    );
    assert_eq!(fx.runtime.depth, 0);
}

// ── Expressions ────────────────────────────────────────────

#[test]
fn integer_arithmetic_wraps() {
    let src = handler_script("llOwnerSay((string)(2147483647 + 1));");
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["-2147483648"]);
}

#[test]
fn division_by_zero_is_a_math_fault() {
    let src = handler_script("integer z = 0; llOwnerSay((string)(7 / z));");
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["0"]);
    assert_eq!(fx.faults(), [Fault::MathError { op: "/".into() }]);
}

#[test]
fn plus_concatenates_non_numbers() {
    let src = handler_script(r#"llOwnerSay("level " + 3 + " of " + 5.5);"#);
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["level 3 of 5.500000"]);
}

#[test]
fn unresolved_session_globals_take_documented_defaults() {
    let src = handler_script(
        "llOwnerSay((string)CurrentUser); llOwnerSay((string)UserAcl); llOwnerSay(Other);",
    );
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(
        fx.log.said(),
        ["00000000-0000-0000-0000-000000000000", "-999", ""]
    );
    assert_eq!(fx.faults().len(), 3);
}

#[test]
fn globals_initialize_lazily_out_of_order() {
    let src = "string Greeting = Name + \"!\";\nstring Name = \"bob\";\ndefault { state_entry() { } }";
    let fx = Fixture::new(src);
    assert_eq!(fx.global("Greeting"), Some(Value::str("bob!")));
}

#[test]
fn context_entries_resolve_before_constants() {
    let src = "string MSG = \"constant\";\nstring show(string msg) { return msg + MSG; }\ndefault { state_entry() { } }";
    let mut fx = Fixture::new(src);
    fx.runtime.context.set("msg", Value::str("ctx-"));
    fx.runtime.context.set("MSG", Value::str("shadowed-"));
    let interp = Interpreter::new(&fx.model, &fx.config);
    let out = interp.call_with_context(&mut fx.runtime, &mut fx.log, "show");
    assert_eq!(out, Some(Value::str("ctx-shadowed-")));
}

#[test]
fn json_has_is_available_and_shadowable() {
    let builtin = handler_script(
        r#"string j = "{\"a\":{\"b\":1}}";
           if (json_has(j, ["a", "b"])) llOwnerSay("yes");
           if (!json_has(j, ["a", "c"])) llOwnerSay("no");"#,
    );
    let mut fx = Fixture::new(&builtin);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["yes", "no"]);

    let shadowed = "integer json_has(string j, list p) { return 7; }\ndefault { touch_start(integer n) { llOwnerSay((string)json_has(\"\", [])); } }";
    let mut fx = Fixture::new(shadowed);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["7"]);
}

#[test]
fn listen_returns_sink_handle() {
    let src = handler_script(r#"integer h = llListen(-5, "", NULL_KEY, ""); llOwnerSay((string)h);"#);
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(fx.log.said(), ["1"]);
}

#[test]
fn unknown_function_is_unresolved() {
    let src = handler_script("llTeleportAgent(NULL_KEY);");
    let mut fx = Fixture::new(&src);
    fx.fire("touch_start", vec![]);
    assert_eq!(
        fx.faults(),
        [Fault::UnresolvedReference {
            name: "llTeleportAgent".into()
        }]
    );
}

#[test]
fn missing_handler_reports_false() {
    let mut fx = Fixture::new(&handler_script(""));
    assert!(!fx.fire("timer", vec![]));
}
