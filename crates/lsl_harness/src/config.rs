use lsl_interp::config::{Clock, EvalConfig, ScopeMode};

/// Functions tried, in order, when a dialog button is forwarded to the script.
pub const DEFAULT_BUTTON_HANDLERS: [&str; 3] =
    ["handle_button_click", "handle_dialog_response", "handle_button"];

/// Settings for one harness instance.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub eval: EvalConfig,
    /// Seed for dialog channels, `llFrand` and `llGenerateKey`. `None` draws
    /// from OS entropy.
    pub rng_seed: Option<u64>,
    pub button_handlers: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            eval: EvalConfig::default(),
            rng_seed: None,
            button_handlers: DEFAULT_BUTTON_HANDLERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HarnessConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.eval.max_recursion_depth = depth;
        self
    }

    pub fn with_scope_mode(mut self, mode: ScopeMode) -> Self {
        self.eval.scope_mode = mode;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.eval.clock = clock;
        self
    }

    pub fn with_owner_key(mut self, owner: impl Into<String>) -> Self {
        self.eval.owner_key = owner.into();
        self
    }

    pub fn with_script_name(mut self, name: impl Into<String>) -> Self {
        self.eval.script_name = name.into();
        self
    }

    pub fn with_button_handlers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.button_handlers = names.into_iter().map(Into::into).collect();
        self
    }
}
