//! CLI support for docexpr
//!
//! The command implementations live here rather than in `main.rs` so they can
//! be driven from tests and embedded in other tools.

mod compile;
mod docs;

pub use compile::{CompileCommand, CompileOutput, execute_compile, execute_tokens};
pub use docs::get_docs;

use std::io;

use crate::ExprError;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The expression was rejected
    #[error("Expression error: {0}")]
    Expr(#[from] ExprError),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No expression provided
    #[error("No expression provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,
}
