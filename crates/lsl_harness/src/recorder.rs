use serde::Serialize;

use lsl_interp::effect::{ApiCall, CallSink, Response};

use crate::payload::Payload;

/// `llMessageLinked` as seen on the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusMessage {
    pub link: i64,
    pub channel: i64,
    pub payload: String,
    pub id: String,
}

impl BusMessage {
    pub fn payload(&self) -> Payload {
        Payload::parse(&self.payload)
    }

    pub fn message_type(&self) -> String {
        self.payload().message_type()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.payload).unwrap_or(serde_json::Value::Null)
    }
}

/// A dialog presented to an avatar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogCall {
    pub avatar: String,
    pub prompt: String,
    pub buttons: Vec<String>,
    pub channel: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListenCall {
    pub channel: i64,
    pub name: String,
    pub id: String,
    pub message: String,
    pub handle: i64,
}

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedCall {
    Bus(BusMessage),
    Notification { text: String },
    Dialog(DialogCall),
    Listen(ListenCall),
    ListenRemove { handle: i64 },
}

/// Collects the calls a script makes. Implements [`CallSink`] so the
/// evaluator can hand calls straight to it.
#[derive(Debug, Default)]
pub struct CallRecorder {
    calls: Vec<RecordedCall>,
    next_handle: i64,
}

impl CallRecorder {
    pub fn new() -> Self {
        CallRecorder::default()
    }

    pub(crate) fn record(&mut self, call: RecordedCall) {
        tracing::trace!(?call, "recorded");
        self.calls.push(call);
    }

    /// Every call, in order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn notifications(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Notification { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn bus_messages(&self) -> Vec<&BusMessage> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Bus(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn bus_messages_on(&self, channel: i64) -> Vec<&BusMessage> {
        self.bus_messages()
            .into_iter()
            .filter(|m| m.channel == channel)
            .collect()
    }

    pub fn bus_messages_of_type(&self, ty: &str) -> Vec<&BusMessage> {
        self.bus_messages()
            .into_iter()
            .filter(|m| m.message_type() == ty)
            .collect()
    }

    pub fn dialogs(&self) -> Vec<&DialogCall> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Dialog(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn listens(&self) -> Vec<&ListenCall> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Listen(l) => Some(l),
                _ => None,
            })
            .collect()
    }
}

impl CallSink for CallRecorder {
    fn handle(&mut self, call: ApiCall) -> Response {
        match call {
            ApiCall::MessageLinked { link, num, msg, id } => {
                self.record(RecordedCall::Bus(BusMessage {
                    link,
                    channel: num,
                    payload: msg,
                    id,
                }));
            }
            ApiCall::OwnerSay { text } => self.record(RecordedCall::Notification { text }),
            ApiCall::RegionSayTo {
                target,
                channel,
                text,
            } => self.record(RecordedCall::Notification {
                text: format!("[RegionSayTo {} ch:{}] {}", target, channel, text),
            }),
            ApiCall::Dialog {
                avatar,
                message,
                buttons,
                channel,
            } => self.record(RecordedCall::Dialog(DialogCall {
                avatar,
                prompt: message,
                buttons,
                channel,
            })),
            ApiCall::Listen {
                channel,
                name,
                id,
                message,
            } => {
                self.next_handle += 1;
                let handle = self.next_handle;
                self.record(RecordedCall::Listen(ListenCall {
                    channel,
                    name,
                    id,
                    message,
                    handle,
                }));
                return Response::Handle(handle);
            }
            ApiCall::ListenRemove { handle } => self.record(RecordedCall::ListenRemove { handle }),
        }
        Response::Acknowledged
    }
}
