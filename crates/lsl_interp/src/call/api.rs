use rand::Rng;

use crate::builtins::{Builtin, NULL_KEY};
use crate::effect::{ApiCall, Response};
use crate::json;
use crate::value::Value;
use crate::Env;

/// Positional argument access with LSL-style defaults for missing values.
struct Args(Vec<Value>);

impl Args {
    fn value(&self, i: usize) -> Value {
        self.0.get(i).cloned().unwrap_or_else(|| Value::str(""))
    }

    fn text(&self, i: usize) -> String {
        self.0.get(i).map(Value::to_string).unwrap_or_default()
    }

    fn int(&self, i: usize) -> i64 {
        self.0.get(i).map(Value::as_int).unwrap_or(0)
    }

    fn float(&self, i: usize) -> f64 {
        self.0.get(i).map(Value::as_float).unwrap_or(0.0)
    }

    fn list(&self, i: usize) -> Vec<Value> {
        self.value(i).into_list()
    }

    fn texts(&self, i: usize) -> Vec<String> {
        self.list(i).iter().map(Value::to_string).collect()
    }
}

// ── Dispatch ───────────────────────────────────────────────────

pub(super) fn call_builtin(env: &mut Env, builtin: Builtin, args: Vec<Value>) -> Value {
    tracing::trace!(?builtin, recorded = builtin.is_recorded(), "library call");
    let args = Args(args);
    match builtin {
        // Recorded side effects
        Builtin::MessageLinked => emit(
            env,
            ApiCall::MessageLinked {
                link: args.int(0),
                num: args.int(1),
                msg: args.text(2),
                id: args.text(3),
            },
        ),
        Builtin::OwnerSay => emit(env, ApiCall::OwnerSay { text: args.text(0) }),
        Builtin::RegionSayTo => emit(
            env,
            ApiCall::RegionSayTo {
                target: args.text(0),
                channel: args.int(1),
                text: args.text(2),
            },
        ),
        Builtin::Dialog => emit(
            env,
            ApiCall::Dialog {
                avatar: args.text(0),
                message: args.text(1),
                buttons: args.texts(2),
                channel: args.int(3),
            },
        ),
        Builtin::Listen => {
            let call = ApiCall::Listen {
                channel: args.int(0),
                name: args.text(1),
                id: args.text(2),
                message: args.text(3),
            };
            match env.sink.handle(call) {
                Response::Handle(handle) => Value::Int(handle),
                Response::Acknowledged => Value::Int(0),
            }
        }
        Builtin::ListenRemove => emit(env, ApiCall::ListenRemove { handle: args.int(0) }),

        Builtin::SetTimerEvent => {
            tracing::debug!(seconds = args.float(0), "timer request ignored");
            Value::str("")
        }

        // Environment reads
        Builtin::GetUnixTime => Value::Int(env.config.clock.unix_time()),
        Builtin::GetScriptName => Value::str(env.config.script_name.as_str()),
        Builtin::GetOwner => Value::Key(env.config.owner_key.clone()),
        Builtin::DetectedKey => {
            let key = usize::try_from(args.int(0))
                .ok()
                .and_then(|i| env.runtime.detected.get(i).cloned())
                .unwrap_or_else(|| NULL_KEY.to_string());
            Value::Key(key)
        }
        Builtin::GenerateKey => {
            let mut bytes = [0u8; 16];
            env.runtime.rng().fill(&mut bytes);
            Value::Key(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
        }
        Builtin::Frand => Value::Float(env.runtime.rng().random::<f64>() * args.float(0)),

        // JSON
        Builtin::JsonGetValue => Value::Str(json::get_value(&args.text(0), &args.list(1))),
        Builtin::JsonSetValue => Value::Str(json::set_value(
            &args.text(0),
            &args.list(1),
            &args.value(2),
        )),
        Builtin::JsonValueType => Value::Str(json::value_type(&args.text(0), &args.list(1))),
        Builtin::List2Json => Value::Str(json::list_to_json(&args.text(0), &args.list(1))),
        Builtin::Json2List => Value::List(json::json_to_list(&args.text(0))),
        Builtin::JsonHas => Value::bool(json::has_path(&args.text(0), &args.list(1))),

        // Lists
        Builtin::GetListLength => Value::Int(args.list(0).len() as i64),
        Builtin::List2String => {
            let list = args.list(0);
            Value::Str(list_item(&list, args.int(1)).map(Value::to_string).unwrap_or_default())
        }
        Builtin::List2Integer => {
            let list = args.list(0);
            Value::Int(list_item(&list, args.int(1)).map(Value::as_int).unwrap_or(0))
        }
        Builtin::List2Key => {
            let list = args.list(0);
            Value::Key(list_item(&list, args.int(1)).map(Value::to_string).unwrap_or_default())
        }
        Builtin::ListFindList => Value::Int(find_list(&args.list(0), &args.list(1))),
        Builtin::DumpList2String => {
            let sep = args.text(1);
            Value::Str(args.texts(0).join(&sep))
        }
        Builtin::ParseString2List => Value::List(
            parse_string(&args.text(0), &args.texts(1), &args.texts(2))
                .into_iter()
                .map(Value::Str)
                .collect(),
        ),

        // Strings
        Builtin::StringLength => Value::Int(args.text(0).chars().count() as i64),
        Builtin::GetSubString => Value::Str(substring(&args.text(0), args.int(1), args.int(2))),
        Builtin::SubStringIndex => {
            let (haystack, needle) = (args.text(0), args.text(1));
            let index = haystack
                .find(&needle)
                .map(|byte| haystack[..byte].chars().count() as i64)
                .unwrap_or(-1);
            Value::Int(index)
        }
        Builtin::ToLower => Value::Str(args.text(0).to_lowercase()),
        Builtin::ToUpper => Value::Str(args.text(0).to_uppercase()),
        Builtin::StringTrim => {
            let text = args.text(0);
            let trimmed = match args.int(1) {
                1 => text.trim_start(),
                2 => text.trim_end(),
                _ => text.trim(),
            };
            Value::str(trimmed)
        }
    }
}

fn emit(env: &mut Env, call: ApiCall) -> Value {
    env.sink.handle(call);
    Value::str("")
}

// ── Helpers ────────────────────────────────────────────────────

/// Index into a list; negative indices count from the end.
fn list_item(list: &[Value], index: i64) -> Option<&Value> {
    let len = list.len() as i64;
    let index = if index < 0 { index + len } else { index };
    usize::try_from(index).ok().and_then(|i| list.get(i))
}

fn find_list(haystack: &[Value], needle: &[Value]) -> i64 {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i as i64)
        .unwrap_or(-1)
}

/// `llGetSubString`: inclusive indices, negative from the end. A start past
/// the end selects everything outside the range.
fn substring(text: &str, start: i64, end: i64) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;
    if len == 0 {
        return String::new();
    }
    let start = if start < 0 { start + len } else { start };
    let end = if end < 0 { end + len } else { end };

    if start <= end {
        if end < 0 || start >= len {
            return String::new();
        }
        let (s, e) = (start.max(0) as usize, end.min(len - 1) as usize);
        return chars[s..=e].iter().collect();
    }

    let head: String = if end >= 0 {
        chars[..=end.min(len - 1) as usize].iter().collect()
    } else {
        String::new()
    };
    let tail: String = if start < len {
        chars[start.max(0) as usize..].iter().collect()
    } else {
        String::new()
    };
    head + &tail
}

/// `llParseString2List`: separators are dropped, spacers are kept as their
/// own entries, empty entries are discarded.
fn parse_string(source: &str, separators: &[String], spacers: &[String]) -> Vec<String> {
    let delimiters: Vec<(&str, bool)> = separators
        .iter()
        .map(|s| (s.as_str(), false))
        .chain(spacers.iter().map(|s| (s.as_str(), true)))
        .filter(|(s, _)| !s.is_empty())
        .collect();

    let mut out = Vec::new();
    let mut token_start = 0;
    let mut i = 0;
    while i < source.len() {
        let rest = &source[i..];
        match delimiters.iter().find(|(d, _)| rest.starts_with(*d)) {
            Some((delim, keep)) => {
                if token_start < i {
                    out.push(source[token_start..i].to_string());
                }
                if *keep {
                    out.push(delim.to_string());
                }
                i += delim.len();
                token_start = i;
            }
            None => i += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if token_start < source.len() {
        out.push(source[token_start..].to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_ranges() {
        assert_eq!(substring("abcdef", 1, 3), "bcd");
        assert_eq!(substring("abcdef", -3, -1), "def");
        assert_eq!(substring("abcdef", 0, 99), "abcdef");
        assert_eq!(substring("abcdef", 4, 1), "abef");
        assert_eq!(substring("", 0, 1), "");
    }

    #[test]
    fn parse_string_keeps_spacers() {
        let seps = vec!["|".to_string()];
        let spacers = vec![":".to_string()];
        assert_eq!(
            parse_string("a|b:c||d", &seps, &spacers),
            vec!["a", "b", ":", "c", "d"]
        );
    }

    #[test]
    fn find_list_by_window() {
        let hay = vec![Value::str("a"), Value::str("b"), Value::Int(1)];
        assert_eq!(find_list(&hay, &[Value::str("b")]), 1);
        assert_eq!(find_list(&hay, &[Value::Int(2)]), -1);
        assert_eq!(find_list(&hay, &[]), 0);
    }

    #[test]
    fn negative_list_index() {
        let list = vec![Value::str("a"), Value::str("b")];
        assert_eq!(list_item(&list, -1), Some(&Value::str("b")));
        assert_eq!(list_item(&list, 2), None);
    }
}
