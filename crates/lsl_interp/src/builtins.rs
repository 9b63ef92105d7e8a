use crate::json;
use crate::value::Value;

/// The all-zero key meaning "no avatar".
pub const NULL_KEY: &str = "00000000-0000-0000-0000-000000000000";

pub const LINK_ROOT: i64 = 1;
pub const LINK_SET: i64 = -1;
pub const LINK_ALL_OTHERS: i64 = -2;
pub const LINK_ALL_CHILDREN: i64 = -3;
pub const LINK_THIS: i64 = -4;

/// Value of a predefined LSL constant, if `name` is one.
pub fn sentinel(name: &str) -> Option<Value> {
    let value = match name {
        "NULL_KEY" => Value::Key(NULL_KEY.to_string()),
        "TRUE" => Value::Int(1),
        "FALSE" => Value::Int(0),
        "EOF" => Value::str("\n\n\n"),
        "PUBLIC_CHANNEL" => Value::Int(0),
        "DEBUG_CHANNEL" => Value::Int(0x7FFF_FFFF),
        "LINK_ROOT" => Value::Int(LINK_ROOT),
        "LINK_SET" => Value::Int(LINK_SET),
        "LINK_ALL_OTHERS" => Value::Int(LINK_ALL_OTHERS),
        "LINK_ALL_CHILDREN" => Value::Int(LINK_ALL_CHILDREN),
        "LINK_THIS" => Value::Int(LINK_THIS),
        "CHANGED_INVENTORY" => Value::Int(0x1),
        "CHANGED_COLOR" => Value::Int(0x2),
        "CHANGED_SHAPE" => Value::Int(0x4),
        "CHANGED_SCALE" => Value::Int(0x8),
        "CHANGED_TEXTURE" => Value::Int(0x10),
        "CHANGED_LINK" => Value::Int(0x20),
        "CHANGED_ALLOWED_DROP" => Value::Int(0x40),
        "CHANGED_OWNER" => Value::Int(0x80),
        "CHANGED_REGION" => Value::Int(0x100),
        "CHANGED_TELEPORT" => Value::Int(0x200),
        "JSON_INVALID" => Value::str(json::JSON_INVALID),
        "JSON_OBJECT" => Value::str(json::JSON_OBJECT),
        "JSON_ARRAY" => Value::str(json::JSON_ARRAY),
        "JSON_NUMBER" => Value::str(json::JSON_NUMBER),
        "JSON_STRING" => Value::str(json::JSON_STRING),
        "JSON_NULL" => Value::str(json::JSON_NULL),
        "JSON_TRUE" => Value::str(json::JSON_TRUE),
        "JSON_FALSE" => Value::str(json::JSON_FALSE),
        "JSON_DELETE" => Value::str(json::JSON_DELETE),
        "JSON_APPEND" => Value::Int(-1),
        "STRING_TRIM_HEAD" => Value::Int(1),
        "STRING_TRIM_TAIL" => Value::Int(2),
        "STRING_TRIM" => Value::Int(3),
        _ => return None,
    };
    Some(value)
}

/// Fallback for a name that resolves nowhere. Session bookkeeping globals
/// the plugins rely on get their conventional "nobody / nothing" values.
pub fn unresolved_default(name: &str) -> Value {
    match name {
        "CurrentUser" => Value::Key(NULL_KEY.to_string()),
        "AclPending" => Value::Int(0),
        "UserAcl" => Value::Int(-999),
        _ => Value::str(""),
    }
}

// ── Builtin ─────────────────────────────────────────────────────

/// The LSL library functions the evaluator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    // Recorded side effects
    MessageLinked,
    OwnerSay,
    RegionSayTo,
    Dialog,
    Listen,
    ListenRemove,
    // Accepted and ignored
    SetTimerEvent,
    // Environment reads
    GetUnixTime,
    GetScriptName,
    GetOwner,
    DetectedKey,
    GenerateKey,
    Frand,
    // JSON
    JsonGetValue,
    JsonSetValue,
    JsonValueType,
    List2Json,
    Json2List,
    JsonHas,
    // Lists
    GetListLength,
    List2String,
    List2Integer,
    List2Key,
    ListFindList,
    DumpList2String,
    ParseString2List,
    // Strings
    StringLength,
    GetSubString,
    SubStringIndex,
    ToLower,
    ToUpper,
    StringTrim,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        let builtin = match name {
            "llMessageLinked" => Builtin::MessageLinked,
            "llOwnerSay" => Builtin::OwnerSay,
            "llRegionSayTo" => Builtin::RegionSayTo,
            "llDialog" => Builtin::Dialog,
            "llListen" => Builtin::Listen,
            "llListenRemove" => Builtin::ListenRemove,
            "llSetTimerEvent" => Builtin::SetTimerEvent,
            "llGetUnixTime" => Builtin::GetUnixTime,
            "llGetScriptName" => Builtin::GetScriptName,
            "llGetOwner" => Builtin::GetOwner,
            "llDetectedKey" => Builtin::DetectedKey,
            "llGenerateKey" => Builtin::GenerateKey,
            "llFrand" => Builtin::Frand,
            "llJsonGetValue" => Builtin::JsonGetValue,
            "llJsonSetValue" => Builtin::JsonSetValue,
            "llJsonValueType" => Builtin::JsonValueType,
            "llList2Json" => Builtin::List2Json,
            "llJson2List" => Builtin::Json2List,
            "json_has" => Builtin::JsonHas,
            "llGetListLength" => Builtin::GetListLength,
            "llList2String" => Builtin::List2String,
            "llList2Integer" => Builtin::List2Integer,
            "llList2Key" => Builtin::List2Key,
            "llListFindList" => Builtin::ListFindList,
            "llDumpList2String" => Builtin::DumpList2String,
            "llParseString2List" => Builtin::ParseString2List,
            "llStringLength" => Builtin::StringLength,
            "llGetSubString" => Builtin::GetSubString,
            "llSubStringIndex" => Builtin::SubStringIndex,
            "llToLower" => Builtin::ToLower,
            "llToUpper" => Builtin::ToUpper,
            "llStringTrim" => Builtin::StringTrim,
            _ => return None,
        };
        Some(builtin)
    }

    /// True for calls that are forwarded to the `CallSink`.
    pub fn is_recorded(self) -> bool {
        matches!(
            self,
            Builtin::MessageLinked
                | Builtin::OwnerSay
                | Builtin::RegionSayTo
                | Builtin::Dialog
                | Builtin::Listen
                | Builtin::ListenRemove
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_targets() {
        assert_eq!(sentinel("LINK_SET"), Some(Value::Int(-1)));
        assert_eq!(sentinel("LINK_THIS"), Some(Value::Int(-4)));
        assert_eq!(sentinel("LINK_ROOT"), Some(Value::Int(1)));
        assert_eq!(sentinel("PLUGIN_CONTEXT"), None);
    }

    #[test]
    fn session_globals_default_to_nobody() {
        assert_eq!(unresolved_default("CurrentUser"), Value::Key(NULL_KEY.into()));
        assert_eq!(unresolved_default("UserAcl"), Value::Int(-999));
        assert_eq!(unresolved_default("Anything"), Value::str(""));
    }

    #[test]
    fn recorded_calls_are_side_effects_only() {
        assert!(Builtin::from_name("llMessageLinked").is_some_and(Builtin::is_recorded));
        assert!(Builtin::from_name("llJsonGetValue").is_some_and(|b| !b.is_recorded()));
        assert_eq!(Builtin::from_name("llTeleportAgent"), None);
    }
}
