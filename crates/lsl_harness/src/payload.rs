use serde_json::{Map, Value as Json};

/// Lenient reader over a bus message's JSON object.
///
/// A payload that is not a JSON object reads as empty: every field is
/// absent and text reads give `""`.
#[derive(Debug, Clone)]
pub struct Payload {
    raw: String,
    fields: Map<String, Json>,
}

impl Payload {
    pub fn parse(raw: &str) -> Payload {
        let fields = match serde_json::from_str::<Json>(raw) {
            Ok(Json::Object(map)) => map,
            _ => Map::new(),
        };
        Payload {
            raw: raw.to_string(),
            fields,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text of a scalar field; `None` when absent or null.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Json::String(s) => Some(s.clone()),
            Json::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn text(&self, name: &str) -> String {
        self.field(name).unwrap_or_default()
    }

    /// The first of `names` that is present.
    pub fn text_any(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|name| self.field(name))
            .unwrap_or_default()
    }

    pub fn message_type(&self) -> String {
        self.text("type")
    }

    /// Integer field, wrapped to 32 bits; numeric strings are accepted.
    pub fn int(&self, name: &str) -> Option<i64> {
        let n: i64 = match self.fields.get(name)? {
            Json::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
            Json::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        Some(n as i32 as i64)
    }

    /// A list field given either as a JSON array or as a string holding one.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        let items = match self.fields.get(name) {
            Some(Json::Array(items)) => items.clone(),
            Some(Json::String(s)) => match serde_json::from_str::<Json>(s) {
                Ok(Json::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        items
            .into_iter()
            .map(|item| match item {
                Json::String(s) => s,
                other => other.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_reads_empty() {
        let p = Payload::parse("{not json");
        assert_eq!(p.text("type"), "");
        assert_eq!(p.field("to"), None);
        assert_eq!(p.int("level"), None);
        assert_eq!(p.raw(), "{not json");
    }

    #[test]
    fn numbers_read_as_text_and_int() {
        let p = Payload::parse(r#"{"level":4,"channel":"-12"}"#);
        assert_eq!(p.text("level"), "4");
        assert_eq!(p.int("level"), Some(4));
        assert_eq!(p.int("channel"), Some(-12));
    }

    #[test]
    fn oversized_ints_wrap_to_32_bits() {
        let p = Payload::parse(r#"{"level":9223372036854775807,"big":"4294967297"}"#);
        assert_eq!(p.int("level"), Some(-1));
        assert_eq!(p.int("big"), Some(1));
    }

    #[test]
    fn buttons_from_array_or_string() {
        let a = Payload::parse(r#"{"buttons":["A","B"]}"#);
        let b = Payload::parse(r#"{"buttons":"[\"A\",\"B\"]"}"#);
        assert_eq!(a.string_list("buttons"), ["A", "B"]);
        assert_eq!(b.string_list("buttons"), ["A", "B"]);
        assert!(Payload::parse("{}").string_list("buttons").is_empty());
    }

    #[test]
    fn text_any_prefers_first_present() {
        let p = Payload::parse(r#"{"avatar":"b"}"#);
        assert_eq!(p.text_any(&["user", "avatar"]), "b");
    }
}
