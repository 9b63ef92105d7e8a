// ── ApiCall enum ────────────────────────────────────────────────

/// A side-effecting LSL library call made by the script.
///
/// Pure library reads (JSON, list and string helpers, time) are answered
/// inside the evaluator and never reach the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `llMessageLinked(link, num, msg, id)`
    MessageLinked {
        link: i64,
        num: i64,
        msg: String,
        id: String,
    },
    /// `llOwnerSay(text)`
    OwnerSay { text: String },
    /// `llRegionSayTo(target, channel, text)`
    RegionSayTo {
        target: String,
        channel: i64,
        text: String,
    },
    /// `llDialog(avatar, message, buttons, channel)`
    Dialog {
        avatar: String,
        message: String,
        buttons: Vec<String>,
        channel: i64,
    },
    /// `llListen(channel, name, id, message)`
    Listen {
        channel: i64,
        name: String,
        id: String,
        message: String,
    },
    /// `llListenRemove(handle)`
    ListenRemove { handle: i64 },
}

// ── Response enum ───────────────────────────────────────────────

/// The sink's answer to an `ApiCall`.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Acknowledged,
    /// Listen handle (expected response for `Listen`).
    Handle(i64),
}

// ── CallSink trait ──────────────────────────────────────────────

/// The host implements this trait to receive the script's side effects.
///
/// Calls are delivered synchronously, in the order the script makes them.
pub trait CallSink {
    fn handle(&mut self, call: ApiCall) -> Response;
}

