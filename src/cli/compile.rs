//! Compile expressions from the command line

use super::CliError;
use crate::{
    CompileOptions, Fragment, JsonNode, Token, compile_expr_with,
    ast::SpannedToken,
    output::{to_json, to_json_pretty},
    parse_expr_with, tokenize,
};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileCommand {
    /// The expression to compile
    pub expression: String,
    /// Column holding the document root (defaults to `data`)
    pub root_column: Option<String>,
    /// Column holding the row identifier (defaults to `records.id`)
    pub row_id_column: Option<String>,
    /// Print the optimized AST instead of SQL
    pub ast: bool,
}

impl CompileCommand {
    fn options(&self) -> CompileOptions {
        let mut options = CompileOptions::default();
        if let Some(root) = &self.root_column {
            options.root_column = root.clone();
        }
        if let Some(row_id) = &self.row_id_column {
            options.row_id_column = row_id.clone();
        }
        options
    }
}

/// Result of a compile command
#[derive(Debug)]
pub enum CompileOutput {
    /// SQL fragment and its parameters
    Fragment(Fragment),
    /// Optimized syntax tree
    Ast(JsonNode),
}

impl CompileOutput {
    pub fn render(&self, pretty: bool) -> String {
        match (self, pretty) {
            (CompileOutput::Fragment(f), false) => to_json(f),
            (CompileOutput::Fragment(f), true) => to_json_pretty(f),
            (CompileOutput::Ast(ast), false) => format!("{ast:?}"),
            (CompileOutput::Ast(ast), true) => format!("{ast:#?}"),
        }
    }
}

pub fn execute_compile(command: &CompileCommand) -> Result<CompileOutput, CliError> {
    // Error positions refer to the expression as given.
    let expression = command.expression.as_str();
    if expression.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let options = command.options();
    if command.ast {
        Ok(CompileOutput::Ast(parse_expr_with(expression, &options)?))
    } else {
        Ok(CompileOutput::Fragment(compile_expr_with(expression, &options)?))
    }
}

/// Tokens of `expression`, one `offset<TAB>NAME<TAB>text` line each.
pub fn execute_tokens(expression: &str) -> Result<Vec<String>, CliError> {
    let tokens = tokenize(expression)?;
    Ok(tokens.iter().map(describe).collect())
}

fn describe(spanned: &SpannedToken) -> String {
    let SpannedToken { token, offset } = spanned;
    match token {
        Token::Identifier(_) | Token::String(_) | Token::Integer(_) | Token::Float(_) => {
            format!("{offset}\t{}\t{token}", token.name())
        }
        _ => format!("{offset}\t{}", token.name()),
    }
}
