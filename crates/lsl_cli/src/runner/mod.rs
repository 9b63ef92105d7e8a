use std::path::PathBuf;

use lsl_ast::diagnostic::SourceMap;
use lsl_harness::{Harness, HarnessConfig, Outcome};
use lsl_interp::value::Value;

use crate::commands::{self, Command};
use crate::format::{format_call, format_outcome, format_value};

mod config;
mod help;
mod inject;
mod inspect;
mod util;

#[cfg(test)]
mod tests;

use util::*;

/// Errors produced by Runner operations.
#[derive(Debug)]
pub enum CliError {
    /// A user-facing message (not a bug).
    Message(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

/// Executes scenario commands against one harness and collects output.
pub struct Runner {
    harness: Harness,
    last_path: Option<PathBuf>,
    output: Vec<String>,
}

impl Runner {
    pub fn new() -> Self {
        Runner::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        Runner {
            harness: Harness::new(config),
            last_path: None,
            output: Vec::new(),
        }
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Execute a single line of input. Output is collected internally.
    pub fn exec(&mut self, line: &str) -> Result<(), CliError> {
        let Some(cmd) = commands::parse_command(line) else {
            return Ok(());
        };

        match cmd {
            Command::Load(path) => self.cmd_load(&path),
            Command::Reset => self.cmd_reset(),
            Command::Clear => self.cmd_clear(),
            // Injection
            Command::Link(tail) => self.cmd_link(&tail),
            Command::Listen(tail) => self.cmd_listen(&tail),
            Command::Touch(avatar) => self.cmd_touch(avatar.as_deref()),
            Command::Timer => self.inject(|h| h.timer()),
            Command::Rez(tail) => self.cmd_rez(&tail),
            Command::Changed(tail) => self.cmd_changed(&tail),
            Command::StateEntry => self.inject(|h| h.state_entry()),
            // Inspection
            Command::Calls(tail) => self.cmd_calls(&tail),
            Command::Faults => self.cmd_faults(),
            Command::Globals => self.cmd_globals(),
            Command::Errors => self.cmd_errors(),
            Command::Eval(expr) => self.cmd_eval(&expr),
            // Configuration
            Command::Seed(tail) => self.cmd_seed(&tail),
            Command::Depth(tail) => self.cmd_depth(&tail),
            Command::Scoping(tail) => self.cmd_scoping(&tail),
            Command::Clock(tail) => self.cmd_clock(&tail),
            Command::Help => self.cmd_help(),
            Command::Unknown(kw) => Err(CliError::Message(format!("unknown command: {}", kw))),
        }
    }

    /// Drain and return collected output lines.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Evaluate an expression against the loaded script (for testing).
    pub fn eval(&mut self, expr: &str) -> Result<Value, CliError> {
        let (parsed, diags) = lsl_parser::parse_expr(expr);
        if !diags.is_empty() {
            let msgs: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
            return Err(CliError::Message(format!("parse error: {}", msgs.join("; "))));
        }
        let parsed = parsed.ok_or_else(|| CliError::Message("failed to parse expression".into()))?;

        let mark = self.harness.recorder().len();
        let value = self
            .harness
            .eval_expr(&parsed)
            .ok_or_else(|| CliError::Message("no script loaded".into()))?;
        self.push_calls_since(mark);
        Ok(value)
    }

    /// Run one injection and report the calls it produced.
    fn inject(&mut self, event: impl FnOnce(&mut Harness) -> Outcome) -> Result<(), CliError> {
        let mark = self.harness.recorder().len();
        let outcome = event(&mut self.harness);
        self.push_calls_since(mark);
        if outcome == Outcome::NotLoaded {
            return Err(CliError::Message("no script loaded".into()));
        }
        if !outcome.is_handled() {
            self.output.push(format!("=> {}", format_outcome(&outcome)));
        }
        Ok(())
    }

    fn push_calls_since(&mut self, mark: usize) {
        let calls = self.harness.recorder().calls();
        for call in calls.get(mark..).unwrap_or_default() {
            self.output.push(format_call(call));
        }
    }

    fn render_diagnostics(&mut self) -> usize {
        let name = self
            .last_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<script>".into());
        let Some(model) = self.harness.model() else {
            return 0;
        };
        let map = SourceMap::new(&name, model.source());
        for diag in model.diagnostics() {
            self.output.push(map.render(diag));
        }
        model.diagnostics().len()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
