use serde_json::{Number, Value};
use std::{collections::BTreeMap, fmt};

/// Merged defaults keyed by flag name.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A value read from a defaults file.
///
/// Only the JSON shapes a flag can consume are represented; `null` and
/// nested objects have no counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Number(Number),
    Bool(bool),
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Converts a decoded JSON value, `None` when it has no flag form.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s)),
            Value::Number(n) => Some(Self::Number(n)),
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_accepts_flag_shapes() {
        assert_eq!(
            ConfigValue::from_json(json!("https://ca")),
            Some(ConfigValue::from("https://ca"))
        );
        assert_eq!(ConfigValue::from_json(json!(true)), Some(ConfigValue::Bool(true)));
        assert_eq!(
            ConfigValue::from_json(json!(["a", 1])),
            Some(ConfigValue::List(vec![
                ConfigValue::from("a"),
                ConfigValue::from(1i64)
            ]))
        );
    }

    #[test]
    fn from_json_rejects_null_and_objects() {
        assert_eq!(ConfigValue::from_json(json!(null)), None);
        assert_eq!(ConfigValue::from_json(json!({"a": 1})), None);
        assert_eq!(ConfigValue::from_json(json!(["a", null])), None);
    }

    #[test]
    fn display() {
        assert_eq!(ConfigValue::from("x").to_string(), "x");
        assert_eq!(ConfigValue::from(42i64).to_string(), "42");
        assert_eq!(
            ConfigValue::List(vec![ConfigValue::from("a"), ConfigValue::from("b")]).to_string(),
            "[a b]"
        );
    }
}
