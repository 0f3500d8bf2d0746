//! Key/value context attached to a log entry

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A context value: string, number, bool, null or any nested JSON
pub type FieldValue = serde_json::Value;

/// Structured extra data for one entry
///
/// Keys are kept sorted so text and JSON renderings are stable. Serializes as
/// a plain JSON object.
///
/// ```
/// use policy_engine_logger::LogContext;
///
/// let ctx = LogContext::new()
///     .with_field("policy_id", "password.min_length")
///     .with_field("attempt", 2);
/// assert_eq!(ctx.to_string(), "attempt=2 policy_id=password.min_length");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext(BTreeMap<String, FieldValue>);

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.add_field(key, value);
        self
    }

    /// Insert or replace `key`
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.0.insert(key.into(), value.into());
    }

    /// Copy every field of `other` in, overwriting duplicates
    pub fn merge(&mut self, other: LogContext) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for LogContext {
    /// `key=value` pairs in key order; strings are written unquoted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                FieldValue::String(s) => write!(f, "{}={}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

impl IntoIterator for LogContext {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_of_every_kind() {
        let ctx = LogContext::new()
            .with_field("policy_id", "max_login_attempts")
            .with_field("attempts", 3)
            .with_field("ratio", 0.5)
            .with_field("enforced", true)
            .with_field("override", FieldValue::Null)
            .with_field("scope", json!({"screens": ["Login"]}));

        assert_eq!(ctx.len(), 6);
        assert_eq!(ctx.get("attempts"), Some(&json!(3)));
        assert_eq!(ctx.get("scope").and_then(|s| s["screens"].get(0)), Some(&json!("Login")));
    }

    #[test]
    fn test_later_value_wins() {
        let mut ctx = LogContext::new().with_field("retry", 1);
        ctx.add_field("retry", 2);
        ctx.merge(LogContext::new().with_field("retry", 3).with_field("final", true));

        assert_eq!(ctx.get("retry"), Some(&json!(3)));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_display_is_sorted() {
        let ctx: LogContext = [("screen", "Home"), ("action", "tap")].into_iter().collect();
        assert_eq!(ctx.to_string(), "action=tap screen=Home");
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let ctx = LogContext::new().with_field("count", 2);
        assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({"count": 2}));

        let back: LogContext = serde_json::from_str(r#"{"count":2}"#).unwrap();
        assert_eq!(back, ctx);
    }
}
