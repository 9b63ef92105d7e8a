//! Lifecycle replies, plain events, faults and harness isolation.

use pretty_assertions::assert_eq;
use serde_json::json;

use lsl_harness::message::{self, Address};
use lsl_harness::{
    Harness, HarnessConfig, HarnessError, ListenCall, Outcome, RecordedCall, LIFECYCLE_CHANNEL,
    UI_CHANNEL,
};
use lsl_interp::builtins::{LINK_SET, NULL_KEY};
use lsl_interp::config::Clock;
use lsl_interp::model::LoadError;
use lsl_interp::value::Value;
use lsl_interp::Fault;

const ANIMATE: &str = include_str!("fixtures/plugin_animate.lsl");
const SETTINGS: &str = include_str!("fixtures/core_settings.lsl");
const STATUS: &str = include_str!("fixtures/ui_status.lsl");

const AV: &str = "5c1a7e00-0000-4000-8000-000000000001";

fn config() -> HarnessConfig {
    HarnessConfig::default()
        .with_seed(11)
        .with_clock(Clock::Fixed(1_700_000_000))
        .with_script_name("animate.lsl")
}

fn harness(source: &str) -> Harness {
    let mut h = Harness::new(config());
    h.load(source).expect("script loads");
    h.clear_outputs();
    h
}

// ── Loading ────────────────────────────────────────────────────

#[test]
fn load_runs_state_entry() {
    let mut h = Harness::new(config());
    h.load(ANIMATE).expect("script loads");

    let sent = h.recorder().bus_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].link, LINK_SET);
    assert_eq!(sent[0].channel, LIFECYCLE_CHANNEL);
    assert_eq!(
        sent[0].json(),
        json!({
            "type": "register",
            "context": "plugin_animate",
            "label": "Animate",
            "min_acl": 3,
            "script": "animate.lsl",
        })
    );
    assert_eq!(h.script_identity().as_deref(), Some("plugin_animate"));
}

#[test]
fn load_rejects_empty_source() {
    let mut h = Harness::new(config());
    let err = h.load("  \n\t\n").unwrap_err();
    assert!(matches!(err, HarnessError::Load(LoadError::EmptySource)), "{:?}", err);
    assert!(!h.is_loaded());
}

#[test]
fn load_file_reports_missing_path() {
    let mut h = Harness::new(config());
    let err = h.load_file("does/not/exist.lsl").unwrap_err();
    assert!(matches!(err, HarnessError::Io { .. }), "{:?}", err);
}

#[test]
fn events_before_load_are_faults() {
    let mut h = Harness::new(config());
    assert_eq!(h.timer(), Outcome::NotLoaded);
    assert_eq!(h.send(UI_CHANNEL, "{}"), Outcome::NotLoaded);
    assert_eq!(
        h.faults(),
        [
            Fault::NotLoaded { event: "timer".into() },
            Fault::NotLoaded { event: "link_message".into() },
        ]
    );
}

#[test]
fn reload_replaces_state() {
    let mut h = harness(ANIMATE);
    h.send(UI_CHANNEL, &message::ui_start(Address::To("plugin_animate"), AV));
    assert!(h.session().current_user().is_some());

    h.load(SETTINGS).expect("script loads");
    assert!(h.session().current_user().is_none());
    assert_eq!(h.global("CurrentPose"), None);
    assert_eq!(h.recorder().notifications(), ["settings ready"]);
}

// ── Lifecycle ──────────────────────────────────────────────────

#[test]
fn lifecycle_calls_script_functions() {
    let mut h = harness(ANIMATE);
    assert_eq!(h.send(LIFECYCLE_CHANNEL, &message::lifecycle("ping")), Outcome::Handled);
    assert_eq!(h.send(LIFECYCLE_CHANNEL, &message::lifecycle("register_now")), Outcome::Handled);

    let types: Vec<String> = h
        .recorder()
        .bus_messages_on(LIFECYCLE_CHANNEL)
        .iter()
        .map(|m| m.message_type())
        .collect();
    assert_eq!(types, ["pong", "register"]);
}

#[test]
fn lifecycle_reply_is_synthesized_when_script_has_none() {
    let mut h = harness(SETTINGS);
    h.send(LIFECYCLE_CHANNEL, &message::lifecycle("register_now"));
    h.send(LIFECYCLE_CHANNEL, &message::lifecycle("ping"));

    let sent = h.recorder().bus_messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].id, NULL_KEY);
    assert_eq!(
        sent[0].json(),
        json!({"type": "register", "context": "core_settings", "label": "Settings", "min_acl": 1})
    );
    assert_eq!(sent[1].json(), json!({"type": "pong", "context": "core_settings"}));
}

#[test]
fn unknown_lifecycle_type_is_ignored() {
    let mut h = harness(ANIMATE);
    assert_eq!(h.send(LIFECYCLE_CHANNEL, &message::lifecycle("shutdown")), Outcome::Ignored);
    assert!(h.recorder().is_empty());
}

#[test]
fn link_message_needs_a_handler() {
    let mut h = harness("default { state_entry() { } }");
    assert_eq!(h.send(LIFECYCLE_CHANNEL, &message::lifecycle("ping")), Outcome::HandlerAbsent);
    assert_eq!(
        h.faults(),
        [Fault::HandlerAbsent { event: "link_message".into() }]
    );
}

// ── Plain events ───────────────────────────────────────────────

#[test]
fn rez_and_owner_change() {
    let mut h = harness(ANIMATE);
    assert_eq!(h.on_rez(7), Outcome::Handled);
    assert_eq!(h.changed(0x80), Outcome::Handled);
    assert_eq!(h.changed(0x1), Outcome::Handled);
    assert_eq!(h.recorder().notifications(), ["rezzed 7", "owner changed"]);
}

#[test]
fn missing_handler_is_a_fault() {
    let mut h = harness(ANIMATE);
    assert_eq!(h.timer(), Outcome::HandlerAbsent);
    assert_eq!(h.faults(), [Fault::HandlerAbsent { event: "timer".into() }]);
    assert!(h.recorder().is_empty());
}

#[test]
fn listen_passes_all_arguments() {
    let mut h = harness(SETTINGS);
    h.listen(5, "Bob", AV, "hi");
    assert_eq!(h.recorder().notifications(), ["Bob said hi on 5"]);
}

#[test]
fn listen_handles_touches_and_timer() {
    let mut h = Harness::new(config());
    h.load(STATUS).expect("script loads");
    assert_eq!(
        h.recorder().listens(),
        [&ListenCall {
            channel: -77,
            name: String::new(),
            id: NULL_KEY.into(),
            message: String::new(),
            handle: 1,
        }]
    );
    assert_eq!(h.global("ListenHandle"), Some(&Value::Int(1)));
    h.clear_outputs();

    h.touch_start_by(AV);
    h.touch_start(2);
    h.timer();

    let owner = h.config().eval.owner_key.clone();
    assert_eq!(
        h.recorder().calls(),
        [
            RecordedCall::Notification { text: format!("touched by {} x1", AV) },
            RecordedCall::Notification { text: format!("touched by {} x2", owner) },
            RecordedCall::ListenRemove { handle: 1 },
            RecordedCall::Notification { text: "tick".into() },
        ]
    );
    assert_eq!(h.global("Touches"), Some(&Value::Int(2)));
}

const DETECTS: &str = r#"
default {
    touch_start(integer n) {
        llOwnerSay((string)n + " " + (string)llDetectedKey(15) + " " + (string)llDetectedKey(16));
    }
}
"#;

#[test]
fn touch_detections_are_capped() {
    let mut h = harness(DETECTS);
    assert_eq!(h.touch_start(i64::MAX), Outcome::Handled);
    let owner = h.config().eval.owner_key.clone();
    assert_eq!(
        h.recorder().notifications(),
        [format!("{} {} {}", i64::MAX, owner, NULL_KEY)]
    );
}

// ── Recursion ──────────────────────────────────────────────────

const RECURSIVE: &str = r#"
integer Frames = 0;

dive() {
    Frames++;
    dive();
}

default {
    touch_start(integer n) {
        dive();
        llOwnerSay("surfaced at " + (string)Frames);
    }
}
"#;

#[test]
fn runaway_recursion_is_cut_off() {
    let mut h = harness(RECURSIVE);
    assert_eq!(h.touch_start(1), Outcome::Handled);
    assert_eq!(h.recorder().notifications(), ["surfaced at 10"]);
    assert_eq!(
        h.faults(),
        [Fault::RecursionLimitExceeded { function: "dive".into(), limit: 10 }]
    );
}

#[test]
fn recursion_limit_is_configurable() {
    let mut h = Harness::new(config().with_max_recursion_depth(3));
    h.load(RECURSIVE).expect("script loads");
    h.touch_start(1);
    assert_eq!(h.recorder().notifications(), ["surfaced at 3"]);
}

// ── Isolation ──────────────────────────────────────────────────

#[test]
fn harnesses_do_not_share_state() {
    let mut a = harness(ANIMATE);
    let mut b = harness(ANIMATE);

    a.send(UI_CHANNEL, &message::ui_start(Address::To("plugin_animate"), AV));
    assert_eq!(a.recorder().len(), 1);
    assert!(b.recorder().is_empty());
    assert!(b.session().current_user().is_none());
    assert_eq!(b.global("AclPending"), Some(&Value::Int(0)));

    b.on_rez(1);
    assert_eq!(a.recorder().notifications(), Vec::<&str>::new());
}

#[test]
fn same_seed_same_dialog_channel() {
    let open = |seed: u64| {
        let mut h = Harness::new(config().with_seed(seed));
        h.load(ANIMATE).expect("script loads");
        h.send(UI_CHANNEL, &message::ui_start(Address::To("plugin_animate"), AV));
        h.send(700, &message::acl_result(AV, 5));
        h.recorder().dialogs()[0].channel
    };
    assert_eq!(open(42), open(42));
}
