use lsl_interp::config::{Clock, EvalConfig};
use lsl_interp::effect::{ApiCall, CallSink, Response};
use lsl_interp::json::{JSON_INVALID, JSON_OBJECT};
use lsl_interp::model::ScriptModel;
use lsl_interp::state::RuntimeState;
use lsl_interp::value::Value;
use lsl_interp::Interpreter;

#[derive(Default)]
struct Calls(Vec<ApiCall>);

impl CallSink for Calls {
    fn handle(&mut self, call: ApiCall) -> Response {
        self.0.push(call);
        Response::Acknowledged
    }
}

const SCRIPT: &str = r#"
string PLUGIN_CONTEXT = "core_probe";

string describe(string msg) {
    string kind = llJsonGetValue(msg, ["type"]);
    if (kind == JSON_INVALID) return "invalid";
    integer level = (integer)llJsonGetValue(msg, ["level"]);
    return kind + ":" + (string)(level + 1);
}

string build(key avatar) {
    return llList2Json(JSON_OBJECT, [
        "type", "dialog_open",
        "context", PLUGIN_CONTEXT,
        "user", avatar,
        "buttons", llList2Json(JSON_ARRAY, ["Pose", "Back"]),
        "session_id", PLUGIN_CONTEXT + "_" + (string)llGetUnixTime()
    ]);
}

string fresh_key() {
    return (string)llGenerateKey();
}

default {
    touch_start(integer n) {
        llOwnerSay("toucher " + (string)llDetectedKey(0));
        llMessageLinked(LINK_SET, 900, build(llDetectedKey(0)), NULL_KEY);
    }
}
"#;

fn setup(seed: u64) -> (ScriptModel, EvalConfig, RuntimeState) {
    let model = ScriptModel::build(SCRIPT).expect("loads");
    let config = EvalConfig {
        clock: Clock::Fixed(1_700_000_000),
        ..EvalConfig::default()
    };
    (model, config, RuntimeState::new(Some(seed)))
}

#[test]
fn json_reads_drive_branches() {
    let (model, config, mut runtime) = setup(1);
    let interp = Interpreter::new(&model, &config);
    let mut sink = Calls::default();

    let ok = interp.call_function(
        &mut runtime,
        &mut sink,
        "describe",
        vec![Value::str(r#"{"type":"acl_result","level":"4"}"#)],
    );
    assert_eq!(ok, Some(Value::str("acl_result:5")));

    let bad = interp.call_function(&mut runtime, &mut sink, "describe", vec![Value::str("nope")]);
    assert_eq!(bad, Some(Value::str("invalid")));
}

#[test]
fn list_to_json_embeds_nested_arrays() {
    let (model, config, mut runtime) = setup(1);
    let interp = Interpreter::new(&model, &config);
    let mut sink = Calls::default();

    let avatar = "11111111-1111-1111-1111-111111111111";
    let out = interp
        .call_function(&mut runtime, &mut sink, "build", vec![Value::Key(avatar.into())])
        .expect("function exists")
        .to_string();
    let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(parsed["type"], "dialog_open");
    assert_eq!(parsed["user"], avatar);
    assert_eq!(parsed["buttons"], serde_json::json!(["Pose", "Back"]));
    assert_eq!(parsed["session_id"], "core_probe_1700000000");
    assert_ne!(out, JSON_INVALID);
    assert_ne!(out, JSON_OBJECT);
}

#[test]
fn generated_keys_follow_the_seed() {
    let run = |seed| {
        let (model, config, mut runtime) = setup(seed);
        let interp = Interpreter::new(&model, &config);
        interp
            .call_function(&mut runtime, &mut Calls::default(), "fresh_key", vec![])
            .expect("function exists")
    };
    let a = run(9);
    assert_eq!(a, run(9));
    assert_ne!(a, run(10));
    assert_eq!(a.to_string().len(), 36);
}

#[test]
fn detected_avatar_flows_into_calls() {
    let (model, config, mut runtime) = setup(1);
    let interp = Interpreter::new(&model, &config);
    let mut sink = Calls::default();
    let avatar = "22222222-2222-2222-2222-222222222222";
    runtime.detected = vec![avatar.to_string()];

    assert!(interp.run_handler(&mut runtime, &mut sink, "touch_start", vec![Value::Int(1)]));
    assert_eq!(
        sink.0[0],
        ApiCall::OwnerSay {
            text: format!("toucher {}", avatar)
        }
    );
    let ApiCall::MessageLinked { link, num, msg, .. } = &sink.0[1] else {
        panic!("expected bus message, got {:?}", sink.0[1]);
    };
    assert_eq!((*link, *num), (-1, 900));
    assert!(msg.contains(avatar));
}
