use std::fmt;

use crate::payload::Payload;

/// How a script decides whether a routed bus message is addressed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// `to` must equal the script's identity.
    #[default]
    Strict,
    /// `context` must equal the script's declared context.
    Context,
    /// `to` is the wildcard `*` or the script's context.
    Broadcast,
}

pub const WILDCARD: &str = "*";

impl RoutingMode {
    /// Read the `ROUTING_MODE` constant. Anything unrecognized is STRICT.
    pub fn from_constant(value: Option<&str>) -> RoutingMode {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("CONTEXT") => RoutingMode::Context,
            Some(v) if v.eq_ignore_ascii_case("BROADCAST") => RoutingMode::Broadcast,
            _ => RoutingMode::Strict,
        }
    }

    /// Decide whether `payload` is addressed to a script with the given
    /// identity and context. The error names the reason for rejection.
    pub fn accepts(
        self,
        payload: &Payload,
        identity: Option<&str>,
        context: Option<&str>,
    ) -> Result<(), String> {
        let (field, own) = match self {
            RoutingMode::Strict => ("to", identity),
            RoutingMode::Context => ("context", context),
            RoutingMode::Broadcast => ("to", context),
        };
        let Some(target) = payload.field(field).filter(|t| !t.is_empty()) else {
            return Err(format!("missing '{}'", field));
        };
        if self == RoutingMode::Broadcast && target == WILDCARD {
            return Ok(());
        }
        match own {
            Some(own) if own == target => Ok(()),
            Some(own) => Err(format!("'{}' is '{}', not '{}'", field, target, own)),
            None => Err("script declares no address".to_string()),
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoutingMode::Strict => "STRICT",
            RoutingMode::Context => "CONTEXT",
            RoutingMode::Broadcast => "BROADCAST",
        })
    }
}
