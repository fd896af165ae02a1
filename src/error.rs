//! The single error type surfaced by every stage of the expression pipeline.

use std::fmt;

/// Which stage rejected the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unterminated literal, invalid escape, unrecognised character
    Lex,
    /// Grammar violation: EOF, unexpected token, wrong arity, unknown method
    Parse,
    /// Identifier that is not bound in the compile environment
    Compile,
    /// Expression exceeds a configured size limit
    Limit,
    /// Internal defect. Never caused by user input.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "lex",
            ErrorKind::Parse => "parse",
            ErrorKind::Compile => "compile",
            ErrorKind::Limit => "limit",
            ErrorKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

/// An expression error.
///
/// Every failure carries one discriminated `kind` plus the user-facing `message`.
/// `position` is a byte offset into the expression when the failing stage knows
/// one. Callers serving HTTP can map any error with [`ExprError::is_user_error`]
/// to a 4xx response and show `message` verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ExprError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<usize>,
}

impl ExprError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ExprError {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn lex(message: impl Into<String>, position: usize) -> Self {
        Self::new(ErrorKind::Lex, message).at(position)
    }

    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        Self::new(ErrorKind::Parse, message).at(position)
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Compile, message)
    }

    pub fn limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Limit, message)
    }

    pub fn unexpected() -> Self {
        Self::new(ErrorKind::Unexpected, "Unexpected error compiling expression")
    }

    /// False only for internal defects.
    pub fn is_user_error(&self) -> bool {
        self.kind != ErrorKind::Unexpected
    }
}

pub type ExprResult<T> = Result<T, ExprError>;
