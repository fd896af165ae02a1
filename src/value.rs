use serde::Serialize;

use crate::ast::Number;

/// A value bound to one `?` placeholder of a [`Fragment`].
///
/// Serializes untagged, so a parameter list prints as plain JSON:
/// `["red", 3, 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<Number> for Param {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(i) => Param::Integer(i),
            Number::Float(f) => Param::Real(f),
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Text(s)
    }
}

impl From<i64> for Param {
    fn from(i: i64) -> Self {
        Param::Integer(i)
    }
}

impl From<f64> for Param {
    fn from(f: f64) -> Self {
        Param::Real(f)
    }
}

/// Compiled SQL text plus the parameters for its placeholders, in order.
///
/// The text can be embedded as-is in a boolean or `ORDER BY` position of a
/// larger prepared statement; it never needs further escaping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single `?` bound to `param`.
    pub fn placeholder(param: impl Into<Param>) -> Self {
        Fragment {
            sql: "?".to_string(),
            params: vec![param.into()],
        }
    }

    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append another fragment's text and parameters.
    pub fn push(&mut self, other: &Fragment) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}
