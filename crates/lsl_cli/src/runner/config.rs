use lsl_interp::config::{Clock, ScopeMode};

use super::*;

impl Runner {
    pub(super) fn cmd_seed(&mut self, tail: &str) -> Result<(), CliError> {
        let seed: u64 = tail
            .trim()
            .parse()
            .map_err(|_| CliError::Message(format!("invalid seed: {}", tail.trim())))?;
        self.harness.config_mut().rng_seed = Some(seed);
        self.output.push(format!("seed set to {} (applies from the next load)", seed));
        Ok(())
    }

    pub(super) fn cmd_depth(&mut self, tail: &str) -> Result<(), CliError> {
        let depth: usize = tail
            .trim()
            .parse()
            .map_err(|_| CliError::Message(format!("invalid depth: {}", tail.trim())))?;
        self.harness.config_mut().eval.max_recursion_depth = depth;
        self.output.push(format!("recursion depth set to {}", depth));
        Ok(())
    }

    pub(super) fn cmd_scoping(&mut self, tail: &str) -> Result<(), CliError> {
        let mode = match tail.trim() {
            "flat" => ScopeMode::Flat,
            "block" => ScopeMode::Block,
            other => {
                return Err(CliError::Message(format!(
                    "invalid scoping '{}': expected flat or block",
                    other
                )))
            }
        };
        self.harness.config_mut().eval.scope_mode = mode;
        self.output.push(format!("scoping set to {}", tail.trim()));
        Ok(())
    }

    pub(super) fn cmd_clock(&mut self, tail: &str) -> Result<(), CliError> {
        let clock = match tail.trim() {
            "system" => Clock::System,
            secs => Clock::Fixed(parse_int(secs, "clock")?),
        };
        self.harness.config_mut().eval.clock = clock;
        self.output.push(match clock {
            Clock::System => "clock follows system time".to_string(),
            Clock::Fixed(secs) => format!("clock fixed at {}", secs),
        });
        Ok(())
    }
}
