//! Search query parameters and their canonical forms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Flag(bool),
    Integer(i64),
    Text(String),
    /// Multi-valued parameter, sent as repeated `name=value` pairs
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Flatten into the plain strings sent on the wire, in order.
    pub fn to_params(&self) -> Vec<String> {
        match self {
            QueryValue::Flag(b) => vec![b.to_string()],
            QueryValue::Integer(n) => vec![n.to_string()],
            QueryValue::Text(s) => vec![s.clone()],
            QueryValue::List(items) => items.iter().flat_map(QueryValue::to_params).collect(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Integer(n)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Flag(b)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Vacancy search query: parameter name to value, in insertion order.
///
/// Two queries with the same parameters in a different order are the same
/// query once encoded; see [`crate::pipeline::encode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "toml::Table", into = "toml::Table")]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an earlier value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Builder form of [`Query::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn params(&self) -> &[(String, QueryValue)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl From<toml::Table> for Query {
    fn from(table: toml::Table) -> Self {
        let mut query = Query::new();
        for (name, value) in table {
            if let Some(value) = from_toml(value) {
                query.set(name, value);
            }
        }
        query
    }
}

impl From<Query> for toml::Table {
    fn from(query: Query) -> Self {
        query
            .params
            .into_iter()
            .map(|(name, value)| (name, to_toml(value)))
            .collect()
    }
}

fn from_toml(value: toml::Value) -> Option<QueryValue> {
    match value {
        toml::Value::String(s) => Some(QueryValue::Text(s)),
        toml::Value::Integer(n) => Some(QueryValue::Integer(n)),
        toml::Value::Boolean(b) => Some(QueryValue::Flag(b)),
        toml::Value::Float(f) => Some(QueryValue::Text(f.to_string())),
        toml::Value::Array(items) => Some(QueryValue::List(
            items.into_iter().filter_map(from_toml).collect(),
        )),
        toml::Value::Datetime(d) => Some(QueryValue::Text(d.to_string())),
        toml::Value::Table(_) => None,
    }
}

fn to_toml(value: QueryValue) -> toml::Value {
    match value {
        QueryValue::Flag(b) => toml::Value::Boolean(b),
        QueryValue::Integer(n) => toml::Value::Integer(n),
        QueryValue::Text(s) => toml::Value::String(s),
        QueryValue::List(items) => toml::Value::Array(items.into_iter().map(to_toml).collect()),
    }
}

/// Canonical, URL-ready encoding of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedQuery(pub(crate) String);

impl EncodedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex SHA-256 of an [`EncodedQuery`]; the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub(crate) String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
