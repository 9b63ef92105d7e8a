//! Builders for the JSON payloads injected into a harness.

use serde_json::{json, Map, Value as Json};

/// How a routed message names its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address<'a> {
    /// `"to": <id>`; STRICT and BROADCAST targets, or the wildcard.
    To(&'a str),
    /// `"context": <ctx>`; CONTEXT targets.
    Context(&'a str),
    Unaddressed,
}

/// A routed message of type `ty` with its address fields filled in.
pub fn routed(ty: &str, address: Address) -> Map<String, Json> {
    let mut map = Map::new();
    map.insert("type".into(), Json::from(ty));
    match address {
        Address::To(to) => {
            map.insert("to".into(), Json::from(to));
        }
        Address::Context(ctx) => {
            map.insert("context".into(), Json::from(ctx));
        }
        Address::Unaddressed => {}
    }
    map
}

/// UI `start` for `avatar`.
pub fn ui_start(address: Address, avatar: &str) -> String {
    let mut map = routed("start", address);
    map.insert("avatar".into(), Json::from(avatar));
    Json::Object(map).to_string()
}

pub fn acl_result(avatar: &str, level: i64) -> String {
    json!({"type": "acl_result", "avatar": avatar, "level": level}).to_string()
}

pub fn dialog_response(session_id: &str, avatar: &str, button: &str) -> String {
    json!({
        "type": "dialog_response",
        "session_id": session_id,
        "avatar": avatar,
        "button": button,
    })
    .to_string()
}

pub fn dialog_timeout(session_id: &str) -> String {
    json!({"type": "dialog_timeout", "session_id": session_id}).to_string()
}

/// `register_now`, `ping` and friends.
pub fn lifecycle(ty: &str) -> String {
    json!({ "type": ty }).to_string()
}
