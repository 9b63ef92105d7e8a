use serde_json::json;

use lsl_interp::builtins::{LINK_SET, NULL_KEY};
use lsl_interp::effect::{ApiCall, CallSink};
use lsl_interp::model::ScriptModel;
use lsl_interp::state::RuntimeState;
use lsl_interp::value::Value;
use lsl_interp::{Fault, Interpreter};

use crate::dialog;
use crate::harness::Outcome;
use crate::payload::Payload;
use crate::recorder::{CallRecorder, RecordedCall};
use crate::routing::RoutingMode;
use crate::session::{is_back_or_close, Session};
use crate::{AUTH_CHANNEL, DIALOG_CHANNEL, LIFECYCLE_CHANNEL, UI_CHANNEL};

/// One dispatch against a loaded script. Borrows the harness's parts for
/// the duration of a single injected event.
pub(crate) struct Dispatcher<'h> {
    pub model: &'h ScriptModel,
    pub interp: Interpreter<'h>,
    pub runtime: &'h mut RuntimeState,
    pub session: &'h mut Session,
    pub recorder: &'h mut CallRecorder,
    pub routing: RoutingMode,
    pub button_handlers: &'h [String],
}

impl Dispatcher<'_> {
    // ── Plain events ───────────────────────────────────────────

    /// Run the handler for `event` with positional arguments.
    pub fn event(&mut self, event: &str, args: Vec<Value>) -> Outcome {
        let mark = self.recorder.len();
        let ran = self
            .interp
            .run_handler(self.runtime, self.recorder, event, args);
        if !ran {
            return self.handler_absent(event);
        }
        self.settle(mark);
        Outcome::Handled
    }

    fn handler_absent(&mut self, event: &str) -> Outcome {
        self.runtime.record_fault(Fault::HandlerAbsent {
            event: event.to_string(),
        });
        Outcome::HandlerAbsent
    }

    // ── link_message ───────────────────────────────────────────

    /// Interpret one bus message. The script's `link_message` body is not
    /// replayed; the dispatcher plays the protocol that body implements.
    pub fn link_message(&mut self, channel: i64, json: &str) -> Outcome {
        if !self.model.has_handler("link_message") {
            return self.handler_absent("link_message");
        }
        let payload = Payload::parse(json);
        let ty = payload.message_type();
        tracing::debug!(channel, ty = %ty, "link_message");

        let mark = self.recorder.len();
        let outcome = match channel {
            LIFECYCLE_CHANNEL => self.lifecycle(&ty),
            AUTH_CHANNEL if ty == "acl_result" => self.acl_result(&payload),
            AUTH_CHANNEL => Outcome::Ignored,
            DIALOG_CHANNEL => match ty.as_str() {
                "dialog_response" => self.dialog_response(&payload),
                "dialog_timeout" => self.dialog_timeout(&payload),
                "dialog_open" => {
                    self.open_dialog(&payload);
                    Outcome::Handled
                }
                _ => Outcome::Ignored,
            },
            _ => self.routed(channel, &payload, &ty),
        };
        self.settle(mark);
        outcome
    }

    fn routed(&mut self, channel: i64, payload: &Payload, ty: &str) -> Outcome {
        let identity = self.model.identity();
        let context = self.model.context();
        if let Err(reason) = self
            .routing
            .accepts(payload, identity.as_deref(), context.as_deref())
        {
            tracing::debug!(mode = %self.routing, %reason, "rejected");
            self.runtime.record_fault(Fault::RoutingRejected {
                mode: self.routing.to_string(),
                reason: reason.clone(),
            });
            return Outcome::Rejected { reason };
        }
        match (channel, ty) {
            (UI_CHANNEL, "start") => self.ui_start(payload),
            _ => Outcome::Ignored,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────

    fn lifecycle(&mut self, ty: &str) -> Outcome {
        let (function, synthesized) = match ty {
            "register_now" => ("register_self", self.register_message()),
            "ping" => ("send_pong", self.pong_message()),
            _ => return Outcome::Ignored,
        };
        if self.model.has_function(function) {
            self.interp
                .call_function(self.runtime, self.recorder, function, Vec::new());
        } else {
            tracing::debug!(function, "absent; synthesizing reply");
            self.send(LIFECYCLE_CHANNEL, synthesized, NULL_KEY);
        }
        Outcome::Handled
    }

    fn register_message(&self) -> String {
        let context = self.model.context().unwrap_or_default();
        let label = self
            .model
            .constant("PLUGIN_LABEL")
            .map(Value::to_string)
            .unwrap_or_else(|| context.clone());
        let min_acl = self.model.constant("PLUGIN_MIN_ACL").map(Value::as_int).unwrap_or(0);
        json!({"type": "register", "context": context, "label": label, "min_acl": min_acl})
            .to_string()
    }

    fn pong_message(&self) -> String {
        json!({"type": "pong", "context": self.model.context().unwrap_or_default()}).to_string()
    }

    // ── ACL handshake ──────────────────────────────────────────

    fn ui_start(&mut self, payload: &Payload) -> Outcome {
        let avatar = payload.text_any(&["avatar", "user"]);
        self.session.start(&avatar);
        self.runtime
            .set_global("CurrentUser", Value::Key(avatar.clone()));
        self.runtime.set_global("AclPending", Value::Int(1));
        let query = json!({"type": "acl_query", "avatar": avatar}).to_string();
        self.send(AUTH_CHANNEL, query, NULL_KEY);
        Outcome::Handled
    }

    fn acl_result(&mut self, payload: &Payload) -> Outcome {
        let avatar = payload.text_any(&["avatar", "user"]);
        if !self.session.admits(&avatar) {
            return Outcome::Inert {
                reason: "acl_result for another avatar".into(),
            };
        }
        self.session.authorize();
        self.runtime.set_global("AclPending", Value::Int(0));

        let level = payload.int("level").unwrap_or(0);
        let ctx = &mut self.runtime.context;
        ctx.set("msg", Value::str(payload.raw()));
        ctx.set("acl_level", Value::Int(level));
        ctx.set("avatar", Value::Key(avatar));
        let ran = self
            .interp
            .call_with_context(self.runtime, self.recorder, "handle_acl_result");
        self.runtime.context.clear();

        match ran {
            Some(_) => Outcome::Handled,
            None => self.handler_absent("handle_acl_result"),
        }
    }

    // ── Dialogs ────────────────────────────────────────────────

    fn open_dialog(&mut self, payload: &Payload) {
        let open = dialog::present(payload, self.runtime.rng());
        tracing::debug!(session_id = %open.session_id, channel = open.call.channel, "dialog open");
        self.session.open_menu(&open.call.avatar, &open.session_id);
        self.recorder.record(RecordedCall::Dialog(open.call));
    }

    fn dialog_response(&mut self, payload: &Payload) -> Outcome {
        let avatar = payload.text_any(&["avatar", "user"]);
        let session_id = payload.text("session_id");
        let button = payload.text("button");

        if self.session.current_user() != Some(avatar.as_str()) {
            return Outcome::Inert {
                reason: "response from another avatar".into(),
            };
        }
        if !self.session.is_menu_open() {
            return Outcome::Inert {
                reason: "no active session".into(),
            };
        }
        if self.session.is_timed_out(&session_id) {
            return Outcome::Inert {
                reason: format!("session '{}' timed out", session_id),
            };
        }
        let matched = self.session.session_id() == Some(session_id.as_str());

        if is_back_or_close(&button) {
            let ret = json!({"type": "return", "session_id": session_id, "avatar": avatar})
                .to_string();
            self.send(UI_CHANNEL, ret, &avatar);
            if matched {
                self.session.close();
            }
            return Outcome::Handled;
        }
        if !matched {
            return Outcome::Inert {
                reason: format!("stale session '{}'", session_id),
            };
        }

        let ctx = &mut self.runtime.context;
        ctx.set("button", Value::str(button.as_str()));
        ctx.set("msg", Value::str(payload.raw()));
        ctx.set("session_id", Value::str(session_id.as_str()));
        ctx.set("avatar", Value::Key(avatar));
        let (model, handlers) = (self.model, self.button_handlers);
        let handler = handlers.iter().find(|name| model.has_function(name));
        match handler {
            Some(name) => {
                tracing::debug!(handler = %name, button = %button, "forwarding button");
                self.interp
                    .call_with_context(self.runtime, self.recorder, name);
            }
            None => {
                self.recorder.handle(ApiCall::OwnerSay {
                    text: format!("Button clicked: {}", button),
                });
            }
        }
        self.runtime.context.clear();
        Outcome::Handled
    }

    fn dialog_timeout(&mut self, payload: &Payload) -> Outcome {
        let session_id = payload.text("session_id");
        let current = self.session.time_out(&session_id);
        tracing::debug!(session_id = %session_id, current, "dialog timeout");
        Outcome::Handled
    }

    // ── Helpers ────────────────────────────────────────────────

    fn send(&mut self, channel: i64, payload: String, id: &str) {
        self.recorder.handle(ApiCall::MessageLinked {
            link: LINK_SET,
            num: channel,
            msg: payload,
            id: id.to_string(),
        });
    }

    /// Present every `dialog_open` the script sent since `mark`.
    fn settle(&mut self, mark: usize) {
        let opened: Vec<Payload> = self.recorder.calls()[mark..]
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Bus(msg) if msg.channel == DIALOG_CHANNEL => Some(msg.payload()),
                _ => None,
            })
            .filter(|payload| payload.message_type() == "dialog_open")
            .collect();
        for payload in &opened {
            self.open_dialog(payload);
        }
    }
}
