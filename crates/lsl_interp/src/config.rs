/// How locals declared inside `if`/`else` blocks are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeMode {
    /// One local namespace per invocation; branch locals outlive the branch.
    #[default]
    Flat,
    /// Each braced block opens a scope that is discarded when it ends.
    Block,
}

/// Source of `llGetUnixTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Frozen at the given Unix timestamp, for reproducible runs.
    Fixed(i64),
}

impl Clock {
    pub fn unix_time(self) -> i64 {
        match self {
            Clock::System => chrono::Utc::now().timestamp(),
            Clock::Fixed(secs) => secs,
        }
    }
}

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10;
pub const DEFAULT_OWNER_KEY: &str = "00000000-0000-0000-0000-00000000beef";

/// Evaluator settings shared by every call into one loaded script.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub max_recursion_depth: usize,
    pub scope_mode: ScopeMode,
    pub clock: Clock,
    /// Returned by `llGetOwner`.
    pub owner_key: String,
    /// Returned by `llGetScriptName`.
    pub script_name: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            scope_mode: ScopeMode::Flat,
            clock: Clock::System,
            owner_key: DEFAULT_OWNER_KEY.to_string(),
            script_name: "script".to_string(),
        }
    }
}
