use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};
use thiserror::Error;

use super::loader;

/// Prefix for environment variables that override config keys, e.g.
/// `ISSUE_LENS_KEYWORD` for `keyword`.
pub const ENV_PREFIX: &str = "ISSUE_LENS_";

/// Prefix marking an environment value as a JSON payload.
pub const JSON_PREFIX: &str = "json:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the '{key}' parameter is required for this analysis")]
    MissingParameter { key: String },
    #[error("parameter '{key}' must be {expected}, got {value}")]
    InvalidParameter {
        key: String,
        expected: &'static str,
        value: Value,
    },
}

/// One layer of configuration values.
#[derive(Debug, Clone)]
pub enum Source {
    /// Environment variables with [`ENV_PREFIX`] stripped and the remainder
    /// lower-cased. Values are kept raw and typed on lookup.
    Env(HashMap<String, String>),
    /// Top-level keys of a config file.
    File(Map<String, Value>),
}

impl Source {
    /// Snapshot the process environment.
    pub fn env() -> Self {
        Self::env_from(std::env::vars())
    }

    pub fn env_from<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(k, v)| {
                let key = k.as_ref().strip_prefix(ENV_PREFIX)?.to_lowercase();
                Some((key, v.into()))
            })
            .collect();
        Source::Env(vars)
    }

    fn get(&self, key: &str) -> Option<Value> {
        let value = match self {
            Source::Env(vars) => vars.get(&key.to_lowercase()).map(|raw| typed_value(raw)),
            Source::File(values) => values.get(key).cloned(),
        };
        value.filter(|v| !v.is_null())
    }
}

/// Layered key/value lookup.
///
/// Programmatic overrides (CLI flags) win, then each source in order.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    overrides: Map<String, Value>,
    sources: Vec<Source>,
}

impl Resolver {
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            overrides: Map::new(),
            sources,
        }
    }

    /// Environment first, then the discovered config file (if any).
    pub fn discover(explicit_path: Option<&Path>) -> Result<Self> {
        let file = loader::load_file_source(explicit_path)?;
        Ok(Self::new(vec![Source::env(), file]))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = self.overrides.get(key) {
            return Some(v.clone());
        }
        self.sources.iter().find_map(|s| s.get(key))
    }

    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Scalar value rendered as text. Blank strings count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        let text = match self.get(key)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    pub fn require_str(&self, key: &str) -> Result<String, ConfigError> {
        self.get_str(key).ok_or_else(|| ConfigError::MissingParameter {
            key: key.to_owned(),
        })
    }

    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let parsed = match &value {
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| ConfigError::InvalidParameter {
            key: key.to_owned(),
            expected: "a non-negative integer",
            value,
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Set `key` only when a value is present; `None` leaves lower layers
    /// visible.
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }
}

/// Interpret a raw string value.
///
/// `json:<payload>` is parsed as JSON. Otherwise anything that is valid JSON
/// (`123`, `true`, `{"a": 1}`) takes that type, and the rest stays a string.
pub fn typed_value(raw: &str) -> Value {
    if let Some(payload) = raw.strip_prefix(JSON_PREFIX) {
        return serde_json::from_str(payload)
            .unwrap_or_else(|_| Value::String(payload.to_owned()));
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn typed_value_coerces_json_scalars() {
        assert_eq!(typed_value("123"), json!(123));
        assert_eq!(typed_value("true"), json!(true));
        assert_eq!(typed_value(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(typed_value("just text"), json!("just text"));
    }

    #[test]
    fn typed_value_honours_json_prefix() {
        assert_eq!(typed_value("json:123"), json!(123));
        assert_eq!(typed_value("json:[1, 2]"), json!([1, 2]));
        assert_eq!(typed_value("json:{oops"), json!("{oops"));
    }

    #[test]
    fn env_source_strips_prefix_and_ignores_others() {
        let src = Source::env_from([("ISSUE_LENS_KEYWORD", "crash"), ("HOME", "/root")]);
        assert_eq!(src.get("keyword"), Some(json!("crash")));
        assert_eq!(src.get("home"), None);
    }
}
