//! SQLite code generation.
//!
//! JSON-valued nodes compile to expressions producing JSON text (`->`,
//! `json_quote`, `json_array`); scalar nodes compile to plain SQL values
//! (`->>`, literals, comparisons). Every literal becomes a `?` placeholder and
//! its value is appended to the parameter list in emission order.

use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{JsonNode, PrefixOp, SqlNode},
    error::{ExprError, ExprResult},
    value::Fragment,
};

/// Default column holding the row identifier.
pub const DEFAULT_ROW_ID_COLUMN: &str = "records.id";

/// How a bound name is referenced from SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// SQL producing the value as JSON
    pub json: String,
    /// SQL producing the value as a scalar
    pub scalar: String,
}

impl Binding {
    /// The document root: a column holding JSON.
    pub fn document(column: &str) -> Self {
        Binding {
            json: column.to_string(),
            scalar: format!("({column} ->> '$')"),
        }
    }

    /// A plain SQL column, such as the row identifier.
    pub fn column(column: &str) -> Self {
        Binding {
            json: format!("json_quote({column})"),
            scalar: column.to_string(),
        }
    }

    /// The current element of a `json_each` aliased as `alias`. Containers are
    /// already JSON text; everything else has to be quoted back into JSON.
    pub fn element(alias: &str) -> Self {
        Binding {
            json: format!(
                "IIF({alias}.type IN ('object', 'array'), {alias}.value, json_quote({alias}.value))"
            ),
            scalar: format!("{alias}.value"),
        }
    }
}

#[derive(Debug)]
struct Scope {
    name: String,
    binding: Binding,
    parent: Option<Rc<Scope>>,
}

/// Lexical environment for compilation.
///
/// A persistent association list: [`Env::bind`] returns a new environment that
/// shares its tail with the old one, which is left untouched. `depth` counts
/// enclosing correlated sub-selects and is used to mint aliases (`json_1`,
/// `json_2`, ...) that never collide with an enclosing one.
#[derive(Debug, Clone, Default)]
pub struct Env {
    head: Option<Rc<Scope>>,
    depth: usize,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment binding `_` to the document column and `id` to the row
    /// identifier column.
    pub fn root(root_column: &str, row_id_column: &str) -> Self {
        Env::new()
            .bind("id", Binding::column(row_id_column))
            .bind("_", Binding::document(root_column))
    }

    pub fn bind(&self, name: impl Into<String>, binding: Binding) -> Self {
        Env {
            head: Some(Rc::new(Scope {
                name: name.into(),
                binding,
                parent: self.head.clone(),
            })),
            depth: self.depth,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let mut scope = self.head.as_deref();
        while let Some(s) = scope {
            if s.name == name {
                return Some(&s.binding);
            }
            scope = s.parent.as_deref();
        }
        None
    }

    /// Enter a sub-select: returns the nested environment and its alias.
    fn nested(&self) -> (Env, String) {
        let depth = self.depth + 1;
        let env = Env {
            head: self.head.clone(),
            depth,
        };
        (env, format!("json_{depth}"))
    }
}

fn sql_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `'$.a.b'` for the given property names. Names that are not plain
/// identifiers are quoted as path labels.
fn json_path(properties: &[String]) -> String {
    let mut path = String::from("$");
    for property in properties {
        path.push('.');
        if !property.is_empty()
            && property
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            path.push_str(property);
        } else {
            path.push('"');
            path.push_str(property);
            path.push('"');
        }
    }
    sql_string(&path)
}

fn lookup<'e>(env: &'e Env, name: &str) -> ExprResult<&'e Binding> {
    env.lookup(name)
        .ok_or_else(|| ExprError::compile(format!("Unknown identifier: {name}")))
}

/// Compile a JSON-valued node to SQL producing JSON.
pub fn compile_json(node: &JsonNode, env: &Env) -> ExprResult<Fragment> {
    let mut out = Fragment::new();

    match node {
        JsonNode::Identifier(name) => {
            out.push_str(&lookup(env, name)?.json);
        }
        JsonNode::PropertyChain { object, properties } => {
            out.push_str("(")
                .push(&compile_json(object, env)?)
                .push_str(" -> ")
                .push_str(&json_path(properties))
                .push_str(")");
        }
        JsonNode::Index { object, key } => {
            out.push_str("(")
                .push(&compile_json(object, env)?)
                .push_str(" -> ")
                .push(&compile_sql(key, env)?)
                .push_str(")");
        }
        JsonNode::ArrayLiteral(values) => {
            out.push_str("json_array(");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push(&compile_json(value, env)?);
            }
            out.push_str(")");
        }
        JsonNode::CoercedFromSql(value) => {
            out.push_str("json_quote(")
                .push(&compile_sql(value, env)?)
                .push_str(")");
        }
    }

    Ok(out)
}

/// The scalar of a JSON-valued node, i.e. `CoercedFromJson(node)`.
fn compile_scalar(node: &JsonNode, env: &Env) -> ExprResult<Fragment> {
    let mut out = Fragment::new();

    match node {
        JsonNode::Identifier(name) => {
            out.push_str(&lookup(env, name)?.scalar);
        }
        JsonNode::PropertyChain { object, properties } => {
            out.push_str("(")
                .push(&compile_json(object, env)?)
                .push_str(" ->> ")
                .push_str(&json_path(properties))
                .push_str(")");
        }
        other => {
            out.push_str("(")
                .push(&compile_json(other, env)?)
                .push_str(" ->> '$')");
        }
    }

    Ok(out)
}

/// Compile a scalar-valued node to SQL.
pub fn compile_sql(node: &SqlNode, env: &Env) -> ExprResult<Fragment> {
    let mut out = Fragment::new();

    match node {
        SqlNode::StringLiteral(s) => return Ok(Fragment::placeholder(s.as_str())),
        SqlNode::NumberLiteral(n) => return Ok(Fragment::placeholder(*n)),
        // Pattern first: SQLite's like(X, Y) is `Y LIKE X`.
        SqlNode::Like { haystack, pattern } => {
            out.push_str("like(")
                .push(&compile_sql(pattern, env)?)
                .push_str(", ")
                .push(&compile_sql(haystack, env)?)
                .push_str(")");
        }
        SqlNode::Glob { haystack, pattern } => {
            out.push_str("glob(")
                .push(&compile_sql(pattern, env)?)
                .push_str(", ")
                .push(&compile_sql(haystack, env)?)
                .push_str(")");
        }
        // The operand must appear once in the output: `length_arg` names it.
        SqlNode::Length(object) => {
            out.push_str(
                "(SELECT CASE json_type(length_arg) \
                 WHEN 'text' THEN length(length_arg ->> '$') \
                 WHEN 'array' THEN json_array_length(length_arg) \
                 ELSE (length_arg ->> '$.length') END FROM (SELECT ",
            )
            .push(&compile_json(object, env)?)
            .push_str(" AS length_arg))");
        }
        SqlNode::Includes { haystack, needle } => {
            let (_, alias) = env.nested();
            out.push_str("EXISTS (SELECT 1 FROM json_each(")
                .push(&compile_json(haystack, env)?)
                .push_str(&format!(") AS {alias} WHERE {alias}.value = "))
                .push(&compile_sql(needle, env)?)
                .push_str(")");
        }
        SqlNode::Some {
            haystack,
            param,
            predicate,
        } => {
            let (inner, alias) = env.nested();
            trace!(%param, %alias, "binding closure parameter");
            let inner = inner.bind(param.as_str(), Binding::element(&alias));
            out.push_str("EXISTS (SELECT 1 FROM json_each(")
                .push(&compile_json(haystack, env)?)
                .push_str(&format!(") AS {alias} WHERE "))
                .push(&compile_sql(predicate, &inner)?)
                .push_str(")");
        }
        SqlNode::Every {
            haystack,
            param,
            predicate,
        } => {
            let (inner, alias) = env.nested();
            trace!(%param, %alias, "binding closure parameter");
            let inner = inner.bind(param.as_str(), Binding::element(&alias));
            out.push_str("NOT EXISTS (SELECT 1 FROM json_each(")
                .push(&compile_json(haystack, env)?)
                .push_str(&format!(") AS {alias} WHERE NOT ("))
                .push(&compile_sql(predicate, &inner)?)
                .push_str("))");
        }
        SqlNode::ToLower(value) => {
            out.push_str("lower(")
                .push(&compile_sql(value, env)?)
                .push_str(")");
        }
        SqlNode::ToUpper(value) => {
            out.push_str("upper(")
                .push(&compile_sql(value, env)?)
                .push_str(")");
        }
        SqlNode::Prefix { op, operand } => {
            let prefix = match op {
                PrefixOp::Negate => "(NOT ",
                PrefixOp::Minus => "(- ",
            };
            out.push_str(prefix)
                .push(&compile_sql(operand, env)?)
                .push_str(")");
        }
        SqlNode::CoercedFromJson(value) => return compile_scalar(value, env),
        SqlNode::BinaryOp { op, left, right } => {
            out.push_str("(")
                .push(&compile_sql(left, env)?)
                .push_str(" ")
                .push_str(op.sql())
                .push_str(" ")
                .push(&compile_sql(right, env)?)
                .push_str(")");
        }
    }

    Ok(out)
}

/// Compile a parsed expression for use in a `WHERE` or `ORDER BY` position.
///
/// The top-level node is scalarised, so `_.size >= 3` yields the comparison
/// itself and `_.name` yields the property's scalar value.
pub fn compile(node: &JsonNode, env: &Env) -> ExprResult<Fragment> {
    match node {
        JsonNode::CoercedFromSql(value) => compile_sql(value, env),
        other => compile_scalar(other, env),
    }
}
