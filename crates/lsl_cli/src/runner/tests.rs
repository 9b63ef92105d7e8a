use super::*;

use lsl_interp::config::Clock;

fn fixture(name: &str) -> String {
    format!(
        "{}/../lsl_harness/tests/fixtures/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    )
}

fn loaded(name: &str) -> Runner {
    let config = HarnessConfig::default()
        .with_seed(3)
        .with_clock(Clock::Fixed(1_700_000_000));
    let mut runner = Runner::with_config(config);
    runner.exec(&format!("load {}", fixture(name))).unwrap();
    runner.take_output();
    runner.exec("clear").unwrap();
    runner.take_output();
    runner
}

fn exec(runner: &mut Runner, cmd: &str) -> Vec<String> {
    runner.exec(cmd).unwrap();
    runner.take_output()
}

#[test]
fn load_reports_identity_and_state_entry_calls() {
    let mut runner = Runner::new();
    let out = exec(&mut runner, &format!("load {}", fixture("plugin_animate.lsl")));
    assert!(
        out[0].contains("as 'plugin_animate' (STRICT routing, 0 diagnostics)"),
        "got: {:?}",
        out
    );
    assert!(out[1].starts_with("bus ch:500 link:-1 {\"type\":\"register\""), "got: {:?}", out);
}

#[test]
fn load_missing_file_is_an_error() {
    let mut runner = Runner::new();
    let err = runner.exec("load nowhere/missing.lsl").unwrap_err();
    assert!(err.to_string().contains("missing.lsl"), "got: {}", err);
}

#[test]
fn eval_sees_constants_and_globals() {
    let mut runner = loaded("plugin_animate.lsl");
    assert_eq!(runner.eval("PLUGIN_MIN_ACL + 1").unwrap(), Value::Int(4));
    assert_eq!(
        runner.eval("llGetListLength(POSES)").unwrap(),
        Value::Int(3)
    );
    assert_eq!(exec(&mut runner, "eval SessionId"), vec!["\"\""]);
}

#[test]
fn eval_parse_error() {
    let mut runner = loaded("plugin_animate.lsl");
    let err = runner.eval("1 +").unwrap_err();
    assert!(err.to_string().contains("parse error"), "got: {}", err);
}

#[test]
fn eval_without_script_fails() {
    let mut runner = Runner::new();
    let err = runner.eval("1 + 1").unwrap_err();
    assert_eq!(err.to_string(), "no script loaded");
}

#[test]
fn link_prints_produced_calls() {
    let mut runner = loaded("plugin_animate.lsl");
    let out = exec(
        &mut runner,
        r#"link 1 900 {"type":"start","to":"plugin_animate","avatar":"av-1"}"#,
    );
    assert_eq!(
        out,
        vec![r#"bus ch:700 link:-1 {"type":"acl_query","avatar":"av-1"} id:00000000-0000-0000-0000-000000000000"#]
    );
}

#[test]
fn rejected_link_reports_outcome() {
    let mut runner = loaded("plugin_animate.lsl");
    let out = exec(&mut runner, r#"link 1 900 {"type":"start","to":"other"}"#);
    assert_eq!(out, vec!["=> rejected: 'to' is 'other', not 'plugin_animate'"]);
    let faults = exec(&mut runner, "faults");
    assert_eq!(faults.len(), 1);
    assert!(faults[0].contains("STRICT"), "got: {:?}", faults);
}

#[test]
fn link_usage_errors() {
    let mut runner = loaded("plugin_animate.lsl");
    assert!(runner.exec("link 1 900").is_err());
    assert!(runner.exec("link x 900 {}").is_err());
}

#[test]
fn calls_filters_and_json() {
    let mut runner = loaded("ui_status.lsl");
    exec(&mut runner, "touch av-9");
    exec(&mut runner, "timer");

    assert_eq!(
        exec(&mut runner, "calls notes"),
        vec!["say touched by av-9 x1", "say tick"]
    );
    assert_eq!(exec(&mut runner, "calls listens"), vec!["listen_remove #1"]);
    assert_eq!(exec(&mut runner, "calls bus"), vec!["(no calls)"]);
    assert_eq!(
        exec(&mut runner, "calls listens --json"),
        vec![r#"{"kind":"listen_remove","handle":1}"#]
    );
    assert!(runner.exec("calls sideways").is_err());
}

#[test]
fn listen_and_changed_inject() {
    let mut runner = loaded("core_settings.lsl");
    assert_eq!(
        exec(&mut runner, "listen 5 Bob av-2 hello there"),
        vec!["say Bob said hello there on 5"]
    );
    assert_eq!(exec(&mut runner, "changed 0x80"), vec!["=> no handler"]);
}

#[test]
fn globals_are_listed_sorted() {
    let mut runner = loaded("ui_status.lsl");
    assert_eq!(
        exec(&mut runner, "globals"),
        vec!["ListenHandle = 1", "Touches = 0"]
    );
}

#[test]
fn configuration_commands() {
    let mut runner = loaded("plugin_animate.lsl");
    exec(&mut runner, "depth 4");
    exec(&mut runner, "scoping block");
    exec(&mut runner, "clock 42");
    let eval = &runner.harness().config().eval;
    assert_eq!(eval.max_recursion_depth, 4);
    assert_eq!(eval.scope_mode, lsl_interp::config::ScopeMode::Block);
    assert_eq!(eval.clock, Clock::Fixed(42));
    assert_eq!(runner.eval("llGetUnixTime()").unwrap(), Value::Int(42));

    assert!(runner.exec("scoping wide").is_err());
    assert!(runner.exec("seed -1").is_err());
}

#[test]
fn events_before_load_fail() {
    let mut runner = Runner::new();
    let err = runner.exec("timer").unwrap_err();
    assert_eq!(err.to_string(), "no script loaded");
    assert!(runner.exec("globals").is_err());
}

#[test]
fn unknown_command() {
    let mut runner = Runner::new();
    let err = runner.exec("teleport").unwrap_err();
    assert_eq!(err.to_string(), "unknown command: teleport");
}

#[test]
fn help_lists_commands() {
    let mut runner = Runner::new();
    let out = exec(&mut runner, "help");
    assert!(out.iter().any(|l| l.trim_start().starts_with("calls [all")));
}
