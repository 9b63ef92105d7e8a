use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identifier as written in the script (variable, function, event or state name).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// LSL convention: names starting with an upper-case letter are globals.
    pub fn is_upper_initial(&self) -> bool {
        self.0.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }

    /// `SCREAMING_CASE` names, the shape constants are declared with.
    pub fn is_screaming(&self) -> bool {
        let mut chars = self.0.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_uppercase() || c == '_')
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(s)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.to_owned())
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screaming_names() {
        assert!(Name::from("PLUGIN_CONTEXT").is_screaming());
        assert!(Name::from("UI_BUS_2").is_screaming());
        assert!(!Name::from("CurrentUser").is_screaming());
        assert!(!Name::from("msg").is_screaming());
    }

    #[test]
    fn upper_initial() {
        assert!(Name::from("CurrentUser").is_upper_initial());
        assert!(!Name::from("_tmp").is_upper_initial());
        assert!(!Name::from("level").is_upper_initial());
    }
}
