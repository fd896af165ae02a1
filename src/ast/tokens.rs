use std::fmt;

/// Lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Integer(i64),

    /// Decimal literal, or an integer too large for `i64`
    ///
    /// # Examples
    /// ```text
    /// 0.5
    /// 3.25
    /// ```
    Float(f64),

    /// String literal enclosed in double or single quotes, escapes resolved
    ///
    /// # Examples
    /// ```text
    /// "red"
    /// 'it\'s'
    /// "é"
    /// ```
    String(String),

    /// Identifier: `_`, `id`, closure parameters, property and method names
    ///
    /// Starts with a Unicode `ID_Start` character, `_` or `$`.
    Identifier(String),

    // Punctuation
    Dot,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    /// `=>` separating an arrow function's parameter from its body
    Arrow,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Logical
    AndAnd,
    OrOr,

    // Prefix
    /// `!`
    Exclamation,
    /// `-`
    Minus,

    /// End of input
    Eof,
}

impl Token {
    /// Upper-case name used in "Unexpected ..." parse errors.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Integer(_) | Token::Float(_) => "NUMBER_LITERAL",
            Token::String(_) => "STRING_LITERAL",
            Token::Identifier(_) => "IDENTIFIER",
            Token::Dot => "DOT",
            Token::Comma => "COMMA",
            Token::LBracket => "OPEN_BRACKET",
            Token::RBracket => "CLOSE_BRACKET",
            Token::LParen => "OPEN_PAREN",
            Token::RParen => "CLOSE_PAREN",
            Token::Arrow => "ARROW",
            Token::EqEq => "OP_EQ",
            Token::NotEq => "OP_NEQ",
            Token::Lt => "OP_LT",
            Token::Gt => "OP_GT",
            Token::LtEq => "OP_LTE",
            Token::GtEq => "OP_GTE",
            Token::AndAnd => "OP_AND",
            Token::OrOr => "OP_OR",
            Token::Exclamation => "OP_NEGATE",
            Token::Minus => "OP_MINUS",
            Token::Eof => "EOF",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n}"),
            Token::String(s) => write!(f, "{s:?}"),
            Token::Identifier(name) => f.write_str(name),
            Token::Dot => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Arrow => f.write_str("=>"),
            Token::EqEq => f.write_str("=="),
            Token::NotEq => f.write_str("!="),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::LtEq => f.write_str("<="),
            Token::GtEq => f.write_str(">="),
            Token::AndAnd => f.write_str("&&"),
            Token::OrOr => f.write_str("||"),
            Token::Exclamation => f.write_str("!"),
            Token::Minus => f.write_str("-"),
            Token::Eof => f.write_str("<eof>"),
        }
    }
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}
