/// A parsed scenario command.
#[derive(Debug, PartialEq)]
pub enum Command {
    // Script control
    Load(String),
    Reset,
    Clear,
    // Event injection
    Link(String),
    Listen(String),
    Touch(Option<String>),
    Timer,
    Rez(String),
    Changed(String),
    StateEntry,
    // Inspection
    Calls(String),
    Faults,
    Globals,
    Errors,
    Eval(String),
    // Configuration
    Seed(String),
    Depth(String),
    Scoping(String),
    Clock(String),
    Help,
    Unknown(String),
}

/// Parse a line of input into a command.
///
/// Blank lines and `//` comment lines give `None`. Trailing `//` comments
/// are stripped everywhere except after `load`, whose path is taken as the
/// first token.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return None;
    }

    let (keyword, tail) = split_first_token(trimmed);
    let rest = strip_comment(tail).trim().to_string();
    let cmd = match keyword {
        "load" => {
            let (path, _) = split_first_token(tail.trim_start());
            if path.is_empty() {
                Command::Unknown("load".into())
            } else {
                Command::Load(path.into())
            }
        }
        "reset" => Command::Reset,
        "clear" => Command::Clear,
        "link" => Command::Link(rest),
        "listen" => Command::Listen(rest),
        "touch" => Command::Touch(Some(rest).filter(|a| !a.is_empty())),
        "timer" => Command::Timer,
        "rez" => Command::Rez(rest),
        "changed" => Command::Changed(rest),
        "state_entry" => Command::StateEntry,
        "calls" => Command::Calls(rest),
        "faults" => Command::Faults,
        "globals" => Command::Globals,
        "errors" => Command::Errors,
        "eval" if rest.is_empty() => Command::Unknown("eval".into()),
        "eval" => Command::Eval(rest),
        "seed" => Command::Seed(rest),
        "depth" => Command::Depth(rest),
        "scoping" => Command::Scoping(rest),
        "clock" => Command::Clock(rest),
        "help" => Command::Help,
        _ => Command::Unknown(keyword.into()),
    };
    Some(cmd)
}

/// Strip a `//` line comment, skipping `//` inside string literals.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        if in_string {
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == b'"' {
                in_string = false;
            }
        } else if bytes[i] == b'"' {
            in_string = true;
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return &line[..i];
        }
        i += 1;
    }
    line
}

/// Split a trimmed line into the first whitespace-delimited token and the rest.
pub fn split_first_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}
