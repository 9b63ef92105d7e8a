//! Behavioral test harness for LSL plugin scripts.
//!
//! A [`Harness`] loads one script, simulates the inbound events a region
//! would deliver, and records every side-effecting call the script makes.
//! Bus messages on the lifecycle, authorization and dialog channels are
//! interpreted by a dispatcher that models the plugin protocol (routing,
//! ACL handshake and dialog sessions).

pub mod config;
pub mod dialog;
mod dispatcher;
pub mod error;
pub mod harness;
pub mod message;
pub mod payload;
pub mod recorder;
pub mod routing;
pub mod session;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use harness::{Harness, Outcome};
pub use recorder::{BusMessage, CallRecorder, DialogCall, ListenCall, RecordedCall};
pub use routing::RoutingMode;
pub use session::{Phase, Session};

/// Plugin registration, ping/pong.
pub const LIFECYCLE_CHANNEL: i64 = 500;
/// ACL queries and results.
pub const AUTH_CHANNEL: i64 = 700;
/// Reserved for settings traffic.
pub const SETTINGS_CHANNEL: i64 = 800;
/// UI start and return-to-parent messages.
pub const UI_CHANNEL: i64 = 900;
/// Dialog open/response/timeout.
pub const DIALOG_CHANNEL: i64 = 950;
