use std::fmt;

use lsl_ast::ast::TypeName;

use crate::builtins::NULL_KEY;

/// A runtime value.
///
/// Vectors and rotations are not modelled; they travel as their string form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Key(String),
    List(Vec<Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn bool(b: bool) -> Value {
        Value::Int(b as i64)
    }

    pub fn default_for(ty: TypeName) -> Value {
        match ty {
            TypeName::Integer => Value::Int(0),
            TypeName::Float => Value::Float(0.0),
            TypeName::Key => Value::Key(String::new()),
            TypeName::List => Value::List(Vec::new()),
            TypeName::String | TypeName::Vector | TypeName::Rotation => Value::Str(String::new()),
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Key(_) => "key",
            Value::List(_) => "list",
        }
    }

    /// Truthiness used by conditions: zero, the empty string, the `"0"` and
    /// `"FALSE"` sentinels, `NULL_KEY` and the empty list are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0" || s == "FALSE"),
            Value::Key(k) => !(k.is_empty() || k == NULL_KEY),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric reading for comparisons. Strings count only when the whole
    /// trimmed text is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) | Value::Key(s) => {
                let t = s.trim();
                t.parse::<i64>()
                    .map(|n| n as f64)
                    .ok()
                    .or_else(|| t.parse::<f64>().ok())
            }
            Value::List(_) => None,
        }
    }

    /// `(integer)` conversion. Strings read their leading integer, as LSL does.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(f) => *f as i32 as i64,
            Value::Str(s) | Value::Key(s) => leading_int(s),
            Value::List(items) => items.first().map(Value::as_int).unwrap_or(0),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::Str(s) | Value::Key(s) => leading_float(s),
            Value::List(items) => items.first().map(Value::as_float).unwrap_or(0.0),
        }
    }

    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            other => vec![other],
        }
    }

    /// Explicit `(type)` cast.
    pub fn cast(self, ty: TypeName) -> Value {
        match ty {
            TypeName::Integer => Value::Int(self.as_int()),
            TypeName::Float => Value::Float(self.as_float()),
            TypeName::String | TypeName::Vector | TypeName::Rotation => match self {
                Value::Str(_) => self,
                other => Value::Str(other.to_string()),
            },
            TypeName::Key => match self {
                Value::Key(_) => self,
                other => Value::Key(other.to_string()),
            },
            TypeName::List => Value::List(self.into_list()),
        }
    }

    /// Implicit conversion on binding to a typed slot. Only the conversions
    /// LSL performs silently are applied; anything else is kept as-is.
    pub fn coerce(self, ty: TypeName) -> Value {
        match (ty, self) {
            (TypeName::Float, Value::Int(n)) => Value::Float(n as f64),
            (TypeName::Key, Value::Str(s)) => Value::Key(s),
            (TypeName::String, Value::Key(k)) => Value::Str(k),
            (_, v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:.6}", x),
            Value::Str(s) | Value::Key(s) => f.write_str(s),
            Value::List(items) => items.iter().try_for_each(|item| write!(f, "{}", item)),
        }
    }
}

fn leading_int(s: &str) -> i64 {
    let t = s.trim_start();
    let (negative, digits) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let end = hex.find(|c: char| !c.is_ascii_hexdigit()).unwrap_or(hex.len());
        i64::from_str_radix(&hex[..end], 16).unwrap_or(0)
    } else {
        let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
        digits[..end].parse::<i64>().unwrap_or(0)
    };
    let n = if negative { -magnitude } else { magnitude };
    n as i32 as i64
}

fn leading_float(s: &str) -> f64 {
    let t = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in t.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    t[..end].parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_sentinels() {
        assert!(Value::Int(1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(!Value::str("0").is_truthy());
        assert!(!Value::str("FALSE").is_truthy());
        assert!(Value::str("no").is_truthy());
        assert!(!Value::Key(NULL_KEY.into()).is_truthy());
        assert!(Value::Key("12345678-1234-1234-1234-123456789012".into()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
    }

    #[test]
    fn integer_cast_reads_leading_digits() {
        assert_eq!(Value::str("42abc").cast(TypeName::Integer), Value::Int(42));
        assert_eq!(Value::str("  -7").cast(TypeName::Integer), Value::Int(-7));
        assert_eq!(Value::str("0x1A").cast(TypeName::Integer), Value::Int(26));
        assert_eq!(Value::str("abc").cast(TypeName::Integer), Value::Int(0));
        assert_eq!(Value::Float(3.9).cast(TypeName::Integer), Value::Int(3));
    }

    #[test]
    fn float_cast_and_display() {
        assert_eq!(Value::str("2.5x").cast(TypeName::Float), Value::Float(2.5));
        assert_eq!(Value::Float(1.5).to_string(), "1.500000");
    }

    #[test]
    fn list_display_joins_without_separator() {
        let list = Value::List(vec![Value::str("a"), Value::Int(1), Value::str("b")]);
        assert_eq!(list.to_string(), "a1b");
    }

    #[test]
    fn as_number_requires_whole_text() {
        assert_eq!(Value::str("5").as_number(), Some(5.0));
        assert_eq!(Value::str(" 2.5 ").as_number(), Some(2.5));
        assert_eq!(Value::str("5a").as_number(), None);
    }

    #[test]
    fn coerce_int_into_float_slot() {
        assert_eq!(Value::Int(2).coerce(TypeName::Float), Value::Float(2.0));
        assert_eq!(Value::str("k").coerce(TypeName::Key), Value::Key("k".into()));
        assert_eq!(Value::str("k").coerce(TypeName::Integer), Value::str("k"));
    }
}
