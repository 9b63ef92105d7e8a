//! The LSL JSON functions, on top of `serde_json`.
//!
//! LSL signals types and failures with private-use marker strings rather
//! than errors; the same markers are used here so scripts comparing against
//! `JSON_INVALID` behave as they do in-world.

use serde_json::{Map, Value as Json};

use crate::value::Value;

pub const JSON_INVALID: &str = "\u{FDD0}";
pub const JSON_OBJECT: &str = "\u{FDD1}";
pub const JSON_ARRAY: &str = "\u{FDD2}";
pub const JSON_NUMBER: &str = "\u{FDD3}";
pub const JSON_STRING: &str = "\u{FDD4}";
pub const JSON_NULL: &str = "\u{FDD5}";
pub const JSON_TRUE: &str = "\u{FDD6}";
pub const JSON_FALSE: &str = "\u{FDD7}";
pub const JSON_DELETE: &str = "\u{FDD8}";

/// Array index that appends in `llJsonSetValue`.
const JSON_APPEND: i64 = -1;

// ── Reads ──────────────────────────────────────────────────────

/// `llJsonGetValue`: the value at `path`, or `JSON_INVALID` when the text
/// is not JSON or the path does not exist.
pub fn get_value(text: &str, path: &[Value]) -> String {
    let Ok(root) = serde_json::from_str::<Json>(text) else {
        return JSON_INVALID.to_string();
    };
    match walk(&root, path) {
        Some(node) => render(node),
        None => JSON_INVALID.to_string(),
    }
}

/// `llJsonValueType`: the type marker of the value at `path`.
pub fn value_type(text: &str, path: &[Value]) -> String {
    let Ok(root) = serde_json::from_str::<Json>(text) else {
        return JSON_INVALID.to_string();
    };
    let marker = match walk(&root, path) {
        Some(Json::Object(_)) => JSON_OBJECT,
        Some(Json::Array(_)) => JSON_ARRAY,
        Some(Json::Number(_)) => JSON_NUMBER,
        Some(Json::String(_)) => JSON_STRING,
        Some(Json::Null) => JSON_NULL,
        Some(Json::Bool(true)) => JSON_TRUE,
        Some(Json::Bool(false)) => JSON_FALSE,
        None => JSON_INVALID,
    };
    marker.to_string()
}

/// True when `path` resolves to something in `text`.
pub fn has_path(text: &str, path: &[Value]) -> bool {
    get_value(text, path) != JSON_INVALID
}

fn walk<'j>(root: &'j Json, path: &[Value]) -> Option<&'j Json> {
    let mut node = root;
    for segment in path {
        node = match (node, segment) {
            (Json::Array(items), Value::Int(i)) => items.get(usize::try_from(*i).ok()?)?,
            (Json::Object(map), segment) => map.get(&segment.to_string())?,
            _ => return None,
        };
    }
    Some(node)
}

/// Strings come back unquoted; containers come back as compact JSON text.
fn render(node: &Json) -> String {
    match node {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        Json::Bool(true) => JSON_TRUE.to_string(),
        Json::Bool(false) => JSON_FALSE.to_string(),
        Json::Null => JSON_NULL.to_string(),
        container => container.to_string(),
    }
}

// ── Construction ───────────────────────────────────────────────

/// Convert a script value into JSON. Strings holding a JSON object or
/// array are embedded rather than quoted, and the marker strings map to
/// their JSON literals.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Int(n) => Json::from(*n),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Key(k) => Json::String(k.clone()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Str(s) => match s.as_str() {
            JSON_TRUE => Json::Bool(true),
            JSON_FALSE => Json::Bool(false),
            JSON_NULL => Json::Null,
            t if t.starts_with('{') || t.starts_with('[') => {
                serde_json::from_str(t).unwrap_or_else(|_| Json::String(s.clone()))
            }
            _ => Json::String(s.clone()),
        },
    }
}

/// `llList2Json`: an object from alternating key/value entries, or an array.
pub fn list_to_json(kind: &str, items: &[Value]) -> String {
    match kind {
        JSON_OBJECT => {
            if items.len() % 2 != 0 {
                return JSON_INVALID.to_string();
            }
            let map: Map<String, Json> = items
                .chunks(2)
                .map(|pair| (pair[0].to_string(), to_json(&pair[1])))
                .collect();
            Json::Object(map).to_string()
        }
        JSON_ARRAY => Json::Array(items.iter().map(to_json).collect()).to_string(),
        _ => JSON_INVALID.to_string(),
    }
}

/// `llJson2List`: objects flatten to alternating keys and values.
pub fn json_to_list(text: &str) -> Vec<Value> {
    let Ok(root) = serde_json::from_str::<Json>(text) else {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![Value::str(text)]
        };
    };
    match root {
        Json::Object(map) => map
            .iter()
            .flat_map(|(k, v)| [Value::str(k.as_str()), to_value(v)])
            .collect(),
        Json::Array(items) => items.iter().map(to_value).collect(),
        scalar => vec![to_value(&scalar)],
    }
}

fn to_value(node: &Json) -> Value {
    match node {
        Json::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or(0.0))),
        other => Value::Str(render(other)),
    }
}

// ── Writes ─────────────────────────────────────────────────────

/// `llJsonSetValue`: set (or with `JSON_DELETE`, remove) the value at
/// `path`, creating intermediate objects. Returns the new JSON text, or
/// `JSON_INVALID` when the input is not JSON or an index is out of range.
pub fn set_value(text: &str, path: &[Value], value: &Value) -> String {
    let mut root = if text.trim().is_empty() {
        Json::Null
    } else {
        match serde_json::from_str::<Json>(text) {
            Ok(root) => root,
            Err(_) => return JSON_INVALID.to_string(),
        }
    };
    if path.is_empty() {
        return to_json(value).to_string();
    }
    let delete = matches!(value, Value::Str(s) if s == JSON_DELETE);
    match set_in(&mut root, path, value, delete) {
        Some(()) => root.to_string(),
        None => JSON_INVALID.to_string(),
    }
}

fn set_in(node: &mut Json, path: &[Value], value: &Value, delete: bool) -> Option<()> {
    let (segment, rest) = path.split_first()?;

    if let Value::Int(i) = segment {
        if node.is_null() {
            *node = Json::Array(Vec::new());
        }
        let items = node.as_array_mut()?;
        let idx = if *i == JSON_APPEND {
            items.len()
        } else {
            usize::try_from(*i).ok()?
        };
        if idx > items.len() {
            return None;
        }
        if rest.is_empty() {
            if delete {
                if idx < items.len() {
                    items.remove(idx);
                }
            } else if idx == items.len() {
                items.push(to_json(value));
            } else {
                items[idx] = to_json(value);
            }
            return Some(());
        }
        if idx == items.len() {
            items.push(Json::Null);
        }
        return set_in(&mut items[idx], rest, value, delete);
    }

    if !node.is_object() {
        *node = Json::Object(Map::new());
    }
    let map = node.as_object_mut()?;
    let key = segment.to_string();
    if rest.is_empty() {
        if delete {
            map.remove(&key);
        } else {
            map.insert(key, to_json(value));
        }
        return Some(());
    }
    set_in(map.entry(key).or_insert(Json::Null), rest, value, delete)
}
