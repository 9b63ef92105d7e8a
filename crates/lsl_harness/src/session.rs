use std::collections::HashSet;

use lsl_interp::builtins::NULL_KEY;

/// Where the current user's session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingAcl,
    Authorized,
    MenuOpen,
    Closed,
    TimedOut,
}

/// Dispatcher-side view of the active user session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user: Option<String>,
    acl_pending: bool,
    session_id: Option<String>,
    phase: Phase,
    timed_out: HashSet<String>,
}

impl Session {
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn acl_pending(&self) -> bool {
        self.acl_pending
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_timed_out(&self, id: &str) -> bool {
        self.timed_out.contains(id)
    }

    pub fn is_menu_open(&self) -> bool {
        self.phase == Phase::MenuOpen
    }

    /// True when `avatar` owns the session. With no session every avatar
    /// is accepted.
    pub fn admits(&self, avatar: &str) -> bool {
        self.current_user().is_none_or(|user| user == avatar)
    }

    /// UI `start`: replaces any earlier session.
    pub(crate) fn start(&mut self, avatar: &str) {
        self.current_user = Some(avatar.to_string()).filter(|a| !a.is_empty() && a != NULL_KEY);
        self.acl_pending = true;
        self.session_id = None;
        self.phase = Phase::AwaitingAcl;
    }

    pub(crate) fn authorize(&mut self) {
        self.acl_pending = false;
        self.phase = Phase::Authorized;
    }

    /// A dialog was presented. An empty id keeps the current one.
    pub(crate) fn open_menu(&mut self, avatar: &str, id: &str) {
        if self.current_user.is_none() && !avatar.is_empty() {
            self.current_user = Some(avatar.to_string());
        }
        if !id.is_empty() {
            self.session_id = Some(id.to_string());
        }
        self.phase = Phase::MenuOpen;
    }

    pub(crate) fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    /// Mark `id` timed out; returns true when it was the current session.
    pub(crate) fn time_out(&mut self, id: &str) -> bool {
        self.timed_out.insert(id.to_string());
        let current = self.session_id.as_deref() == Some(id);
        if current {
            self.phase = Phase::TimedOut;
        }
        current
    }
}

/// Back and close buttons, matched case-insensitively.
pub fn is_back_or_close(button: &str) -> bool {
    let b = button.trim();
    b.eq_ignore_ascii_case("back") || b.eq_ignore_ascii_case("close")
}
