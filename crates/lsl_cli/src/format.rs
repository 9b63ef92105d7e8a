use lsl_harness::{Outcome, RecordedCall};
use lsl_interp::value::Value;

/// Format a runtime value for CLI output. Strings are quoted and escaped,
/// keys are tagged, lists are bracketed.
pub fn format_value(val: &Value) -> String {
    match val {
        Value::Int(_) | Value::Float(_) => val.to_string(),
        Value::Str(s) => quote(s),
        Value::Key(k) => format!("(key){}", quote(k)),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}

/// One line per recorded call.
pub fn format_call(call: &RecordedCall) -> String {
    match call {
        RecordedCall::Bus(msg) => {
            format!("bus ch:{} link:{} {} id:{}", msg.channel, msg.link, msg.payload, msg.id)
        }
        RecordedCall::Notification { text } => format!("say {}", text),
        RecordedCall::Dialog(d) => format!(
            "dialog {} ch:{} {} [{}]",
            d.avatar,
            d.channel,
            quote(&d.prompt),
            d.buttons.join(", ")
        ),
        RecordedCall::Listen(l) => format!(
            "listen #{} ch:{} name:{} id:{} msg:{}",
            l.handle,
            l.channel,
            quote(&l.name),
            l.id,
            quote(&l.message)
        ),
        RecordedCall::ListenRemove { handle } => format!("listen_remove #{}", handle),
    }
}

pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Handled => "handled".into(),
        Outcome::Rejected { reason } => format!("rejected: {}", reason),
        Outcome::Inert { reason } => format!("inert: {}", reason),
        Outcome::Ignored => "ignored".into(),
        Outcome::HandlerAbsent => "no handler".into(),
        Outcome::NotLoaded => "no script loaded".into(),
    }
}
