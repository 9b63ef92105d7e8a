use super::*;

const HELP: &str = "\
Script control:
  load <path>                          Load a script and run state_entry
  reset                                Forget the script and all state
  clear                                Drop recorded calls and faults

Events:
  link <sender> <channel> <json>       Deliver a link_message
  listen <channel> <name> <id> <msg>   Deliver a listen event
  touch [avatar]                       touch_start (owner when omitted)
  timer                                Fire timer
  rez <n>                              Fire on_rez
  changed <mask>                       Fire changed (hex accepted)
  state_entry                          Fire state_entry again

Inspection:
  calls [all|bus [ch]|notes|dialogs|listens] [--json]
  faults                               Non-fatal faults so far
  globals                              Current global values
  errors                               Parser diagnostics
  eval <expr>                          Evaluate against the script's globals

Configuration:
  seed <n>                             RNG seed (applies on next load)
  depth <n>                            Recursion limit
  scoping flat|block                   Local variable scoping
  clock <secs>|system                  llGetUnixTime source";

impl Runner {
    pub(super) fn cmd_help(&mut self) -> Result<(), CliError> {
        self.output.extend(HELP.lines().map(str::to_string));
        Ok(())
    }
}
