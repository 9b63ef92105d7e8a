use lsl_harness::RecordedCall;

use super::*;

/// Which recorded calls `calls` lists.
enum CallFilter {
    All,
    Bus(Option<i64>),
    Notes,
    Dialogs,
    Listens,
}

impl CallFilter {
    fn matches(&self, call: &RecordedCall) -> bool {
        match (self, call) {
            (CallFilter::All, _) => true,
            (CallFilter::Bus(None), RecordedCall::Bus(_)) => true,
            (CallFilter::Bus(Some(ch)), RecordedCall::Bus(msg)) => msg.channel == *ch,
            (CallFilter::Notes, RecordedCall::Notification { .. }) => true,
            (CallFilter::Dialogs, RecordedCall::Dialog(_)) => true,
            (CallFilter::Listens, RecordedCall::Listen(_) | RecordedCall::ListenRemove { .. }) => {
                true
            }
            _ => false,
        }
    }
}

impl Runner {
    /// `calls [all|bus [ch]|notes|dialogs|listens] [--json]`
    pub(super) fn cmd_calls(&mut self, tail: &str) -> Result<(), CliError> {
        let mut words: Vec<&str> = tail.split_whitespace().collect();
        let json = words.iter().any(|w| *w == "--json");
        words.retain(|w| *w != "--json");

        let filter = match words.as_slice() {
            [] | ["all"] => CallFilter::All,
            ["bus"] => CallFilter::Bus(None),
            ["bus", ch] => CallFilter::Bus(Some(parse_int(ch, "channel")?)),
            ["notes"] => CallFilter::Notes,
            ["dialogs"] => CallFilter::Dialogs,
            ["listens"] => CallFilter::Listens,
            _ => {
                return Err(CliError::Message(
                    "usage: calls [all|bus [ch]|notes|dialogs|listens] [--json]".into(),
                ))
            }
        };

        let calls: Vec<&RecordedCall> = self
            .harness
            .recorder()
            .calls()
            .iter()
            .filter(|c| filter.matches(c))
            .collect();
        if calls.is_empty() {
            self.output.push("(no calls)".into());
            return Ok(());
        }
        for call in calls {
            let line = if json {
                serde_json::to_string(call)
                    .map_err(|e| CliError::Message(format!("cannot serialize call: {}", e)))?
            } else {
                format_call(call)
            };
            self.output.push(line);
        }
        Ok(())
    }

    pub(super) fn cmd_faults(&mut self) -> Result<(), CliError> {
        let faults = self.harness.faults();
        if faults.is_empty() {
            self.output.push("(no faults)".into());
        }
        for fault in faults {
            self.output.push(fault.to_string());
        }
        Ok(())
    }

    pub(super) fn cmd_globals(&mut self) -> Result<(), CliError> {
        if !self.harness.is_loaded() {
            return Err(CliError::Message("no script loaded".into()));
        }
        for (name, value) in self.harness.globals() {
            self.output.push(format!("{} = {}", name, format_value(value)));
        }
        Ok(())
    }

    pub(super) fn cmd_errors(&mut self) -> Result<(), CliError> {
        if !self.harness.is_loaded() {
            return Err(CliError::Message("no script loaded".into()));
        }
        if self.render_diagnostics() == 0 {
            self.output.push("no errors".into());
        }
        Ok(())
    }

    pub(super) fn cmd_eval(&mut self, expr: &str) -> Result<(), CliError> {
        let value = self.eval(expr)?;
        self.output.push(format_value(&value));
        Ok(())
    }
}
