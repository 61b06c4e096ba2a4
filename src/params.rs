//! Flat query-string encoding used by every UAM request.
//!
//! The API reads both URL and POST parameters as `key=value` pairs joined
//! with `&`. Parallel arrays (several assignment ids with their types, for
//! example) are sent by repeating the key once per element.
//!
//! Values are written verbatim: nothing is percent-escaped. A value that
//! contains `&` or `=` will therefore split into extra pairs on the server
//! side. The UAM server expects exactly this encoding, so callers are
//! responsible for keeping such characters out of identifiers.

use std::fmt;

/// A single parameter value: either one scalar or a sequence of scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Rendered as one `key=value` pair.
    Scalar(String),
    /// Rendered as one `key=value` pair per element, in order.
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Scalar(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl<T: fmt::Display> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: fmt::Display> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// An insertion-ordered set of request parameters.
///
/// Keys are not deduplicated; pushing the same key twice emits it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter and returns the set, for chained construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the parameters as `k=v&k=v`, expanding lists into repeated keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use uamir::params::Params;
    ///
    /// let params = Params::new()
    ///     .with("RSSUserID", 42u64)
    ///     .with("IDs", vec!["5", "7"]);
    ///
    /// assert_eq!(params.encode(), "RSSUserID=42&IDs=5&IDs=7");
    /// ```
    pub fn encode(&self) -> String {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            match value {
                ParamValue::Scalar(v) => pairs.push(format!("{key}={v}")),
                ParamValue::List(values) => {
                    pairs.extend(values.iter().map(|v| format!("{key}={v}")));
                }
            }
        }
        pairs.join("&")
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Joins an endpoint with encoded parameters: `<endpoint>?<params>`.
pub fn build_url(endpoint: &str, params: &Params) -> String {
    format!("{endpoint}?{}", params.encode())
}
