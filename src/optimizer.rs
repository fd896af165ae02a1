//! Single bottom-up rewrite pass over the AST.
//!
//! - `(_.foo).bar` becomes one `PropertyChain(_, [foo, bar])`, so the compiler
//!   emits a single JSON path instead of nested extractions.
//! - `CoercedFromJson(CoercedFromSql(x))` and `CoercedFromSql(CoercedFromJson(x))`
//!   collapse to `x`.
//!
//! Children are always rewritten before their parent looks at them, which makes
//! one pass sufficient: `optimize_json(optimize_json(x)) == optimize_json(x)`.

use crate::ast::{JsonNode, SqlNode};

pub fn optimize_json(node: JsonNode) -> JsonNode {
    match node {
        JsonNode::Identifier(_) => node,
        JsonNode::PropertyChain { object, properties } => match optimize_json(*object) {
            JsonNode::PropertyChain {
                object: inner,
                properties: mut head,
            } => {
                head.extend(properties);
                JsonNode::PropertyChain {
                    object: inner,
                    properties: head,
                }
            }
            object => JsonNode::PropertyChain {
                object: Box::new(object),
                properties,
            },
        },
        JsonNode::Index { object, key } => JsonNode::Index {
            object: Box::new(optimize_json(*object)),
            key: Box::new(optimize_sql(*key)),
        },
        JsonNode::ArrayLiteral(values) => {
            JsonNode::ArrayLiteral(values.into_iter().map(optimize_json).collect())
        }
        JsonNode::CoercedFromSql(value) => match optimize_sql(*value) {
            SqlNode::CoercedFromJson(inner) => *inner,
            value => JsonNode::CoercedFromSql(Box::new(value)),
        },
    }
}

pub fn optimize_sql(node: SqlNode) -> SqlNode {
    match node {
        SqlNode::StringLiteral(_) | SqlNode::NumberLiteral(_) => node,
        SqlNode::Like { haystack, pattern } => SqlNode::like(optimize_sql(*haystack), optimize_sql(*pattern)),
        SqlNode::Glob { haystack, pattern } => SqlNode::glob(optimize_sql(*haystack), optimize_sql(*pattern)),
        SqlNode::Length(object) => SqlNode::length(optimize_json(*object)),
        SqlNode::Includes { haystack, needle } => {
            SqlNode::includes(optimize_json(*haystack), optimize_sql(*needle))
        }
        SqlNode::Some {
            haystack,
            param,
            predicate,
        } => SqlNode::some(optimize_json(*haystack), param, optimize_sql(*predicate)),
        SqlNode::Every {
            haystack,
            param,
            predicate,
        } => SqlNode::every(optimize_json(*haystack), param, optimize_sql(*predicate)),
        SqlNode::ToLower(value) => SqlNode::ToLower(Box::new(optimize_sql(*value))),
        SqlNode::ToUpper(value) => SqlNode::ToUpper(Box::new(optimize_sql(*value))),
        SqlNode::Prefix { op, operand } => SqlNode::prefix(op, optimize_sql(*operand)),
        SqlNode::CoercedFromJson(value) => match optimize_json(*value) {
            JsonNode::CoercedFromSql(inner) => *inner,
            value => SqlNode::CoercedFromJson(Box::new(value)),
        },
        SqlNode::BinaryOp { op, left, right } => {
            SqlNode::binary(op, optimize_sql(*left), optimize_sql(*right))
        }
    }
}
