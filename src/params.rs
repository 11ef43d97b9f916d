//! The parameter bag handed to a [`Facade`](crate::Facade).
//!
//! Every source (query, url-encoded form, multipart form, JSON) ends up here
//! as a flat `key → Value` map. Later sources overwrite earlier ones.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::str::FromStr;

/// One parameter value.
///
/// Query strings and forms only ever produce `Text` and `List`. A JSON body
/// keeps its native types under `Json`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A bare key: only the first occurrence survives.
    Text(String),
    /// An array-notation key (`name[]`): every occurrence, in order.
    List(Vec<String>),
    /// A top-level field of a JSON object body.
    Json(serde_json::Value),
}

impl Value {
    /// The value as a string, if it is one (`Text` or a JSON string).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Json(serde_json::Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The value as a list of strings.
    ///
    /// A JSON array qualifies only if every item is a string.
    pub fn to_list(&self) -> Option<Vec<&str>> {
        match self {
            Self::List(items) => Some(items.iter().map(String::as_str).collect()),
            Self::Json(serde_json::Value::Array(items)) => {
                items.iter().map(serde_json::Value::as_str).collect()
            }
            _ => None,
        }
    }
}

/// Why [`Params::parse`] could not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("parameter `{0}` not found")]
    Missing(String),

    #[error("parameter `{0}` is not a string")]
    NotText(String),

    #[error("cannot parse parameter `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

/// The merged parameter map built fresh for each request.
///
/// Iteration order is unspecified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    inner: HashMap<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Sets `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.inner.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.inner.iter()
    }

    /// Shorthand for `get(key).and_then(Value::as_str)`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Shorthand for `get(key).and_then(Value::to_list)`.
    pub fn list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).and_then(Value::to_list)
    }

    /// Parses a string parameter with [`FromStr`].
    ///
    /// ```rust
    /// use paramconv::{Params, Value};
    ///
    /// let mut params = Params::new();
    /// params.insert("page", Value::Text("3".into()));
    ///
    /// let page: u32 = params.parse("page").unwrap();
    /// assert_eq!(page, 3);
    /// assert!(params.parse::<u32>("limit").is_err());
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T, ParamError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.get(key).ok_or_else(|| ParamError::Missing(key.to_owned()))?;
        let raw = value.as_str().ok_or_else(|| ParamError::NotText(key.to_owned()))?;
        raw.parse::<T>().map_err(|e| ParamError::Invalid {
            key: key.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_reads_plain_and_json_strings() {
        let mut params = Params::new();
        params.insert("a", Value::Text("1".into()));
        params.insert("b", Value::Json(json!("2")));
        params.insert("c", Value::Json(json!(3)));

        assert_eq!(params.text("a"), Some("1"));
        assert_eq!(params.text("b"), Some("2"));
        assert_eq!(params.text("c"), None);
        assert_eq!(params.text("missing"), None);
    }

    #[test]
    fn list_accepts_only_string_arrays() {
        let mut params = Params::new();
        params.insert("tags", Value::List(vec!["x".into(), "y".into()]));
        params.insert("json", Value::Json(json!(["p", "q"])));
        params.insert("mixed", Value::Json(json!(["p", 1])));

        assert_eq!(params.list("tags"), Some(vec!["x", "y"]));
        assert_eq!(params.list("json"), Some(vec!["p", "q"]));
        assert_eq!(params.list("mixed"), None);
    }

    #[test]
    fn insert_overwrites() {
        let mut params = Params::new();
        params.insert("k", Value::Text("1".into()));
        let old = params.insert("k", Value::Text("8".into()));

        assert_eq!(old, Some(Value::Text("1".into())));
        assert_eq!(params.text("k"), Some("8"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn parse_reports_the_key() {
        let mut params = Params::new();
        params.insert("param", Value::Text("not an int".into()));
        params.insert("list", Value::List(vec!["1".into()]));

        let err = params.parse::<i64>("param").unwrap_err();
        assert!(matches!(err, ParamError::Invalid { ref key, .. } if key == "param"));
        assert!(matches!(params.parse::<i64>("nope"), Err(ParamError::Missing(_))));
        assert!(matches!(params.parse::<i64>("list"), Err(ParamError::NotText(_))));
    }
}
