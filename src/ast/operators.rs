use crate::ast::Token;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

impl BinOp {
    pub fn comparison(token: &Token) -> Option<BinOp> {
        match token {
            Token::EqEq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn boolean(token: &Token) -> Option<BinOp> {
        match token {
            Token::AndAnd => Some(BinOp::And),
            Token::OrOr => Some(BinOp::Or),
            _ => None,
        }
    }

    /// SQL spelling of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            BinOp::Equal => "=",
            BinOp::NotEqual => "<>",
            BinOp::LessThan => "<",
            BinOp::GreaterThan => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// Logical negation (`!`)
    Negate,
    /// Arithmetic negation (`-`)
    Minus,
}
