use crate::ast::{BinOp, PrefixOp};

/// Numeric literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// Expression that evaluates to a JSON value.
///
/// JSON-valued nodes can be navigated further (`.prop`, `[key]`) and iterated
/// by `includes`/`some`/`every`. To compare one against a scalar it must first
/// go through [`SqlNode::CoercedFromJson`].
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// Bound name: `_`, `id` or a closure parameter
    Identifier(String),

    /// Dotted property access, one or more segments
    ///
    /// # Examples
    /// ```text
    /// _.foo        // PropertyChain(_, ["foo"])
    /// _.foo.bar    // PropertyChain(_, ["foo", "bar"]) once optimized
    /// ```
    PropertyChain {
        object: Box<JsonNode>,
        properties: Vec<String>,
    },

    /// Bracket access with a computed key
    ///
    /// # Examples
    /// ```text
    /// _.tags[0]
    /// _.foo[_.key]
    /// ```
    Index {
        object: Box<JsonNode>,
        key: Box<SqlNode>,
    },

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, "two", _.three]
    /// ```
    ArrayLiteral(Vec<JsonNode>),

    /// A SQL scalar standing in for a JSON value
    CoercedFromSql(Box<SqlNode>),
}

/// Expression that evaluates to a SQL scalar (text, number, boolean or NULL).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    StringLiteral(String),
    NumberLiteral(Number),

    /// `like(haystack, pattern)`
    Like {
        haystack: Box<SqlNode>,
        pattern: Box<SqlNode>,
    },

    /// `glob(haystack, pattern)`
    Glob {
        haystack: Box<SqlNode>,
        pattern: Box<SqlNode>,
    },

    /// `.length`: string length, array element count, or the value's own
    /// `length` property, decided at run time
    Length(Box<JsonNode>),

    /// `haystack.includes(needle)`
    Includes {
        haystack: Box<JsonNode>,
        needle: Box<SqlNode>,
    },

    /// `haystack.some(param => predicate)`
    Some {
        haystack: Box<JsonNode>,
        param: String,
        predicate: Box<SqlNode>,
    },

    /// `haystack.every(param => predicate)`
    Every {
        haystack: Box<JsonNode>,
        param: String,
        predicate: Box<SqlNode>,
    },

    /// `.toLowerCase()`
    ToLower(Box<SqlNode>),

    /// `.toUpperCase()`
    ToUpper(Box<SqlNode>),

    /// `!x` or `-x`
    Prefix {
        op: PrefixOp,
        operand: Box<SqlNode>,
    },

    /// The scalar extracted from a JSON value
    CoercedFromJson(Box<JsonNode>),

    /// Comparison or boolean operation
    BinaryOp {
        op: BinOp,
        left: Box<SqlNode>,
        right: Box<SqlNode>,
    },
}

impl JsonNode {
    pub fn identifier(name: impl Into<String>) -> Self {
        JsonNode::Identifier(name.into())
    }

    /// Single-segment property access. Chains are merged by the optimizer.
    pub fn property(object: JsonNode, name: impl Into<String>) -> Self {
        JsonNode::PropertyChain {
            object: Box::new(object),
            properties: vec![name.into()],
        }
    }

    pub fn index(object: JsonNode, key: SqlNode) -> Self {
        JsonNode::Index {
            object: Box::new(object),
            key: Box::new(key),
        }
    }

    /// Treat a scalar as JSON, unwrapping instead of stacking coercions.
    pub fn from_sql(node: SqlNode) -> Self {
        match node {
            SqlNode::CoercedFromJson(inner) => *inner,
            other => JsonNode::CoercedFromSql(Box::new(other)),
        }
    }
}

impl SqlNode {
    pub fn string(value: impl Into<String>) -> Self {
        SqlNode::StringLiteral(value.into())
    }

    pub fn integer(value: i64) -> Self {
        SqlNode::NumberLiteral(Number::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        SqlNode::NumberLiteral(Number::Float(value))
    }

    /// Scalarise a JSON value, unwrapping instead of stacking coercions.
    pub fn from_json(node: JsonNode) -> Self {
        match node {
            JsonNode::CoercedFromSql(inner) => *inner,
            other => SqlNode::CoercedFromJson(Box::new(other)),
        }
    }

    pub fn binary(op: BinOp, left: SqlNode, right: SqlNode) -> Self {
        SqlNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn prefix(op: PrefixOp, operand: SqlNode) -> Self {
        SqlNode::Prefix {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn like(haystack: SqlNode, pattern: SqlNode) -> Self {
        SqlNode::Like {
            haystack: Box::new(haystack),
            pattern: Box::new(pattern),
        }
    }

    pub fn glob(haystack: SqlNode, pattern: SqlNode) -> Self {
        SqlNode::Glob {
            haystack: Box::new(haystack),
            pattern: Box::new(pattern),
        }
    }

    pub fn length(object: JsonNode) -> Self {
        SqlNode::Length(Box::new(object))
    }

    pub fn includes(haystack: JsonNode, needle: SqlNode) -> Self {
        SqlNode::Includes {
            haystack: Box::new(haystack),
            needle: Box::new(needle),
        }
    }

    pub fn some(haystack: JsonNode, param: impl Into<String>, predicate: SqlNode) -> Self {
        SqlNode::Some {
            haystack: Box::new(haystack),
            param: param.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn every(haystack: JsonNode, param: impl Into<String>, predicate: SqlNode) -> Self {
        SqlNode::Every {
            haystack: Box::new(haystack),
            param: param.into(),
            predicate: Box::new(predicate),
        }
    }
}
