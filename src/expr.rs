//! Entry points wiring lexer, parser, optimizer and compiler together.

use std::panic::{self, UnwindSafe};

use tracing::{debug, error};

use crate::{
    ast::JsonNode,
    compiler::{self, DEFAULT_ROW_ID_COLUMN, Env},
    error::{ExprError, ExprResult},
    lexer::tokenize,
    optimizer::optimize_json,
    parser::{DEFAULT_MAX_DEPTH, Parser},
    value::Fragment,
};

/// Default column holding the document root.
pub const DEFAULT_ROOT_COLUMN: &str = "data";

/// Default cap on expression length, in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Options for compiling an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Column holding each record's JSON document (what `_` refers to)
    pub root_column: String,
    /// Column holding the row identifier (what `id` refers to)
    pub row_id_column: String,
    /// Reject expressions longer than this many bytes
    pub max_length: Option<usize>,
    /// Reject expressions nested deeper than this
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            root_column: DEFAULT_ROOT_COLUMN.to_string(),
            row_id_column: DEFAULT_ROW_ID_COLUMN.to_string(),
            max_length: Some(DEFAULT_MAX_LENGTH),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn with_root(root_column: impl Into<String>) -> Self {
        CompileOptions {
            root_column: root_column.into(),
            ..Self::default()
        }
    }
}

/// Runs `f`, turning a panic into [`ExprError::unexpected`] so that an internal
/// defect never escapes as a crash nor passes for a user error.
fn guarded<T>(expression: &str, f: impl FnOnce() -> ExprResult<T> + UnwindSafe) -> ExprResult<T> {
    match panic::catch_unwind(f) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            debug!(expression, kind = %e.kind, message = %e.message, "rejected expression");
            Err(e)
        }
        Err(_) => {
            error!(expression, "internal error compiling expression");
            Err(ExprError::unexpected())
        }
    }
}

fn parse_optimized(expression: &str, options: &CompileOptions) -> ExprResult<JsonNode> {
    if let Some(max) = options.max_length
        && expression.len() > max
    {
        return Err(ExprError::limit(format!(
            "Expression too long ({} bytes, limit is {max})",
            expression.len()
        )));
    }

    let tokens = tokenize(expression)?;
    let ast = Parser::new(tokens, expression.len())
        .with_max_depth(options.max_depth)
        .parse()?;
    Ok(optimize_json(ast))
}

/// Parse and optimize an expression without compiling it.
pub fn parse_expr_with(expression: &str, options: &CompileOptions) -> ExprResult<JsonNode> {
    guarded(expression, || parse_optimized(expression, options))
}

pub fn parse_expr(expression: &str) -> ExprResult<JsonNode> {
    parse_expr_with(expression, &CompileOptions::default())
}

/// Compile an expression into a SQL fragment.
///
/// # Examples
///
/// ```
/// use docexpr::{compile_expr, Param};
///
/// let fragment = compile_expr("_.size >= 3", "data").unwrap();
/// assert_eq!(fragment.sql, "((data ->> '$.size') >= ?)");
/// assert_eq!(fragment.params, vec![Param::Integer(3)]);
/// ```
pub fn compile_expr(expression: &str, root_column: &str) -> ExprResult<Fragment> {
    compile_expr_with(expression, &CompileOptions::with_root(root_column))
}

pub fn compile_expr_with(expression: &str, options: &CompileOptions) -> ExprResult<Fragment> {
    let fragment = guarded(expression, || {
        let ast = parse_optimized(expression, options)?;
        let env = Env::root(&options.root_column, &options.row_id_column);
        compiler::compile(&ast, &env)
    })?;

    debug!(
        expression,
        sql = %fragment.sql,
        params = fragment.params.len(),
        "compiled expression"
    );
    Ok(fragment)
}
