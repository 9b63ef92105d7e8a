use lsl_interp::builtins::NULL_KEY;

use super::*;

impl Runner {
    pub(super) fn cmd_load(&mut self, path: &str) -> Result<(), CliError> {
        let path = PathBuf::from(path);
        self.harness
            .load_file(&path)
            .map_err(|e| CliError::Message(e.to_string()))?;
        self.last_path = Some(path.clone());

        let count = self.render_diagnostics();
        let identity = self
            .harness
            .script_identity()
            .unwrap_or_else(|| "anonymous".into());
        self.output.push(format!(
            "loaded {} as '{}' ({} routing, {} diagnostic{})",
            path.display(),
            identity,
            self.harness.routing_mode(),
            count,
            if count == 1 { "" } else { "s" },
        ));
        self.push_calls_since(0);
        Ok(())
    }

    pub(super) fn cmd_reset(&mut self) -> Result<(), CliError> {
        self.harness.reset();
        self.last_path = None;
        self.output.push("reset".into());
        Ok(())
    }

    pub(super) fn cmd_clear(&mut self) -> Result<(), CliError> {
        self.harness.clear_outputs();
        self.output.push("cleared calls and faults".into());
        Ok(())
    }

    /// `link <sender> <channel> <json>`
    pub(super) fn cmd_link(&mut self, tail: &str) -> Result<(), CliError> {
        let usage = || CliError::Message("usage: link <sender> <channel> <json>".into());
        let (args, json) = split_tokens(tail, 2).ok_or_else(usage)?;
        if json.is_empty() {
            return Err(usage());
        }
        let sender = parse_int(args[0], "sender")?;
        let channel = parse_int(args[1], "channel")?;
        let json = json.to_string();
        self.inject(|h| h.link_message(sender, channel, &json, NULL_KEY))
    }

    /// `listen <channel> <name> <id> <message>`
    pub(super) fn cmd_listen(&mut self, tail: &str) -> Result<(), CliError> {
        let (args, message) = split_tokens(tail, 3).ok_or_else(|| {
            CliError::Message("usage: listen <channel> <name> <id> <message>".into())
        })?;
        let channel = parse_int(args[0], "channel")?;
        let (name, id, message) = (args[1].to_string(), args[2].to_string(), message.to_string());
        self.inject(|h| h.listen(channel, &name, &id, &message))
    }

    pub(super) fn cmd_touch(&mut self, avatar: Option<&str>) -> Result<(), CliError> {
        match avatar {
            Some(avatar) => {
                let avatar = avatar.to_string();
                self.inject(|h| h.touch_start_by(&avatar))
            }
            None => self.inject(|h| h.touch_start(1)),
        }
    }

    pub(super) fn cmd_rez(&mut self, tail: &str) -> Result<(), CliError> {
        let param = if tail.is_empty() { 0 } else { parse_int(tail, "start parameter")? };
        self.inject(|h| h.on_rez(param))
    }

    pub(super) fn cmd_changed(&mut self, tail: &str) -> Result<(), CliError> {
        let mask = parse_int(tail, "change mask")?;
        self.inject(|h| h.changed(mask))
    }
}
