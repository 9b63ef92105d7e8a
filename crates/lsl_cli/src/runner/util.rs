use super::CliError;

/// Parse an integer argument. `0x` hex is accepted for change masks.
pub(super) fn parse_int(token: &str, what: &str) -> Result<i64, CliError> {
    let token = token.trim();
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed
        .map(|n| if negative { -n } else { n })
        .map_err(|_| CliError::Message(format!("invalid {}: {}", what, token)))
}

/// Split `tail` into `n` leading tokens and the remainder.
pub(super) fn split_tokens(tail: &str, n: usize) -> Option<(Vec<&str>, &str)> {
    let mut rest = tail.trim_start();
    let mut tokens = Vec::with_capacity(n);
    for _ in 0..n {
        if rest.is_empty() {
            return None;
        }
        let (token, after) = crate::commands::split_first_token(rest);
        tokens.push(token);
        rest = after.trim_start();
    }
    Some((tokens, rest))
}
