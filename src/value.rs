//! The closed value type for bound parameters and predicate literals.
//!
//! Every value that can ride along with a query — a positional parameter in
//! a relational query, a literal inside a search predicate — is one of
//! these variants. Keeping the set closed means serialization and
//! comparison logic stay exhaustive instead of trailing off into an
//! untyped "anything" bag.

use std::fmt;

use serde::Serialize;

/// A value bound into a query.
///
/// `Display` renders the SQL-literal form (for diagnostics and logs only;
/// query text always carries `?` placeholders instead of inline literals).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// True for the `List` variant.
    pub fn is_list(&self) -> bool {
        matches!(self, QueryValue::List(_))
    }

    /// Element count for `List`, `None` for scalars.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            QueryValue::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Convert to a JSON value at the document boundary.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            QueryValue::Null => serde_json::Value::Null,
            QueryValue::Bool(b) => serde_json::Value::Bool(*b),
            QueryValue::Integer(i) => serde_json::Value::from(*i),
            // Non-finite floats have no JSON representation; fall back to null.
            QueryValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            QueryValue::String(s) => serde_json::Value::String(s.clone()),
            QueryValue::List(items) => {
                serde_json::Value::Array(items.iter().map(QueryValue::to_json).collect())
            }
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => write!(f, "NULL"),
            QueryValue::Bool(true) => write!(f, "TRUE"),
            QueryValue::Bool(false) => write!(f, "FALSE"),
            QueryValue::Integer(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            QueryValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<i32> for QueryValue {
    fn from(i: i32) -> Self {
        QueryValue::Integer(i64::from(i))
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Integer(i)
    }
}

impl From<f64> for QueryValue {
    fn from(x: f64) -> Self {
        QueryValue::Float(x)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => QueryValue::Null,
        }
    }
}
