use rand::Rng;

use crate::payload::Payload;
use crate::recorder::DialogCall;
use crate::session::is_back_or_close;

pub const MAX_BUTTONS: usize = 12;
pub const BACK_BUTTON: &str = "Back";

/// A `dialog_open` payload turned into what the avatar would see.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOpen {
    pub call: DialogCall,
    pub session_id: String,
}

/// Build the dialog presentation for a `dialog_open` payload.
///
/// The avatar comes from `user` (else `avatar`), the prompt from `message`
/// (else `prompt`). Buttons are capped at twelve and always include a
/// back/close entry. A missing channel is replaced by a random negative one.
pub fn present(payload: &Payload, rng: &mut impl Rng) -> DialogOpen {
    let channel = payload
        .int("channel")
        .unwrap_or_else(|| -(1_000_000 + rng.random_range(0..999_999)));
    DialogOpen {
        call: DialogCall {
            avatar: payload.text_any(&["user", "avatar"]),
            prompt: payload.text_any(&["message", "prompt"]),
            buttons: normalize_buttons(payload.string_list("buttons")),
            channel,
        },
        session_id: payload.text("session_id"),
    }
}

/// Cap at [`MAX_BUTTONS`]; a missing back/close becomes `Back`, taking the
/// last slot when the list is full.
pub fn normalize_buttons(mut buttons: Vec<String>) -> Vec<String> {
    buttons.truncate(MAX_BUTTONS);
    if !buttons.iter().any(|b| is_back_or_close(b)) {
        if buttons.len() == MAX_BUTTONS {
            buttons.pop();
        }
        buttons.push(BACK_BUTTON.to_string());
    }
    buttons
}
