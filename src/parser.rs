//! Recursive-descent parser.
//!
//! ```text
//! expr       := boolean
//! boolean    := comparison ( ('&&'|'||') comparison )*
//! comparison := negated ( ('>'|'>='|'=='|'<'|'<='|'!=') negated )*
//! negated    := ('!'|'-') negated | accessor
//! accessor   := atom ( '.' IDENT ['(' args ')'] | '[' expr ']' )*
//! atom       := STRING | NUMBER | IDENT ['(' args ')'] | '(' expr ')' | '[' elements ']'
//! args       := [ arg (',' arg)* ]
//! arg        := IDENT '=>' expr | expr
//! ```
//!
//! Both binary tiers are left-associative and do not chain: `a > b > c` parses
//! as `(a > b) > c`.
//!
//! The height of the tree is bounded by `max_depth`. Prefix operators,
//! parentheses, accessor suffixes and each operator of a binary chain count
//! one level.

use crate::{
    ast::{BinOp, JsonNode, PrefixOp, SpannedToken, SqlNode, Token},
    error::{ExprError, ExprResult},
    lexer::tokenize,
};

/// Default limit on how deeply expressions may nest.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A call argument. Arrow functions are only meaningful to `some`/`every`.
#[derive(Debug, Clone, PartialEq)]
enum Argument {
    Expr(JsonNode),
    Arrow { param: String, body: JsonNode },
}

pub struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
    /// Offset reported for errors at end of input
    end: usize,
    depth: usize,
    /// Deepest level reached by the node being measured
    peak: usize,
    max_depth: usize,
}

impl Parser {
    /// `end` is the length of the source text the tokens came from.
    pub fn new(tokens: Vec<SpannedToken>, end: usize) -> Self {
        Parser {
            tokens,
            position: 0,
            end,
            depth: 0,
            peak: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|t| &t.token)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n).map(|t| &t.token)
    }

    /// Offset of the next token, or the end of input.
    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .map_or(self.end, |t| t.offset)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned()?;
        self.position += 1;
        Some(token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn is_eof(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError::parse(message, self.offset())
    }

    /// Parse a complete expression; every token must be consumed.
    pub fn parse(&mut self) -> ExprResult<JsonNode> {
        let expr = self.parse_expression()?;
        if !self.is_eof() {
            return Err(self.error("Trailing tokens"));
        }
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> ExprResult<JsonNode> {
        self.parse_boolean()
    }

    /// Enter one level of recursion. Every recursive path passes through
    /// `parse_negated`, so this bounds the parser's own stack.
    fn descend(&mut self) -> ExprResult<()> {
        if self.depth >= self.max_depth {
            return Err(self.error("Expression nested too deeply"));
        }
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        Ok(())
    }

    /// Record that the tree under construction reaches `level`.
    fn reach(&mut self, level: usize) -> ExprResult<()> {
        if level > self.max_depth {
            return Err(self.error("Expression nested too deeply"));
        }
        self.peak = self.peak.max(level);
        Ok(())
    }

    /// Run `parse` and return its result with the height it reached above
    /// the current depth.
    fn measure<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ExprResult<T>,
    ) -> ExprResult<(T, usize)> {
        let outer = std::mem::replace(&mut self.peak, self.depth);
        let node = parse(self)?;
        let height = self.peak - self.depth;
        self.peak = self.peak.max(outer);
        Ok((node, height))
    }

    // Chains nest to the left, so each operator adds a level on top of the
    // tallest operand so far.
    fn parse_boolean(&mut self) -> ExprResult<JsonNode> {
        let (mut left, mut height) = self.measure(Self::parse_comparison)?;

        while let Some(op) = self.peek().and_then(BinOp::boolean) {
            self.advance();
            let (right, right_height) = self.measure(Self::parse_comparison)?;
            height = height.max(right_height) + 1;
            self.reach(self.depth + height)?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ExprResult<JsonNode> {
        let (mut left, mut height) = self.measure(Self::parse_negated)?;

        while let Some(op) = self.peek().and_then(BinOp::comparison) {
            self.advance();
            let (right, right_height) = self.measure(Self::parse_negated)?;
            height = height.max(right_height) + 1;
            self.reach(self.depth + height)?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_negated(&mut self) -> ExprResult<JsonNode> {
        let depth = self.depth;
        let result = self.descend().and_then(|()| self.parse_negated_inner());
        self.depth = depth;
        result
    }

    fn parse_negated_inner(&mut self) -> ExprResult<JsonNode> {
        let op = match self.peek() {
            Some(Token::Exclamation) => PrefixOp::Negate,
            Some(Token::Minus) => PrefixOp::Minus,
            _ => return self.parse_accessor(),
        };

        self.advance();
        let operand = self.parse_negated()?;
        Ok(JsonNode::from_sql(SqlNode::prefix(
            op,
            SqlNode::from_json(operand),
        )))
    }

    /// Every suffix wraps the node built so far and counts as a level.
    fn parse_accessor(&mut self) -> ExprResult<JsonNode> {
        let (mut expr, mut height) = self.measure(Self::parse_atom)?;

        loop {
            if self.check(&Token::Dot) {
                self.advance();

                let name_offset = self.offset();
                let name = match self.advance() {
                    Some(SpannedToken {
                        token: Token::Identifier(name),
                        ..
                    }) => name,
                    _ => {
                        return Err(ExprError::parse(
                            r#"Missing identifier after ".""#,
                            name_offset,
                        ));
                    }
                };

                if self.check(&Token::LParen) {
                    self.advance();
                    let (args, args_height) = self.measure(Self::parse_args)?;
                    height = height.max(args_height);
                    expr = method_call(expr, &name, args, name_offset)?;
                } else if name == "length" {
                    expr = JsonNode::from_sql(SqlNode::length(expr));
                } else {
                    expr = JsonNode::property(expr, name);
                }
            } else if self.check(&Token::LBracket) {
                self.advance();
                let (key, key_height) = self.measure(Self::parse_expression)?;
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::RBracket,
                        ..
                    }) => {}
                    _ => return Err(self.error(r#"Missing "]""#)),
                }
                height = height.max(key_height);
                expr = JsonNode::index(expr, SqlNode::from_json(key));
            } else {
                return Ok(expr);
            }

            height += 1;
            self.reach(self.depth + height)?;
        }
    }

    fn parse_atom(&mut self) -> ExprResult<JsonNode> {
        let Some(SpannedToken { token, offset }) = self.advance() else {
            return Err(self.error("Unexpected EOF reading expression"));
        };

        match token {
            Token::String(s) => Ok(JsonNode::from_sql(SqlNode::string(s))),
            Token::Integer(n) => Ok(JsonNode::from_sql(SqlNode::integer(n))),
            Token::Float(n) => Ok(JsonNode::from_sql(SqlNode::float(n))),
            Token::Identifier(name) => {
                if self.check(&Token::LParen) {
                    self.advance();
                    let args = self.parse_args()?;
                    function_call(&name, args, offset)
                } else {
                    Ok(JsonNode::Identifier(name))
                }
            }
            Token::LParen => {
                let expr = self.parse_expression()?;
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::RParen,
                        ..
                    }) => Ok(expr),
                    _ => Err(ExprError::parse("Unclosed parenthetical", offset)),
                }
            }
            Token::LBracket => self.parse_array_literal(),
            other => Err(ExprError::parse(format!("Unexpected {}", other.name()), offset)),
        }
    }

    /// Elements after the opening `[`.
    fn parse_array_literal(&mut self) -> ExprResult<JsonNode> {
        if self.is_eof() {
            return Err(self.error("Unexpected EOF in array literal"));
        }

        let mut elements = vec![];
        if self.check(&Token::RBracket) {
            self.advance();
            return Ok(JsonNode::ArrayLiteral(elements));
        }

        loop {
            elements.push(self.parse_expression()?);

            let offset = self.offset();
            match self.advance().map(|t| t.token) {
                Some(Token::Comma) => continue,
                Some(Token::RBracket) => return Ok(JsonNode::ArrayLiteral(elements)),
                _ => {
                    return Err(ExprError::parse(
                        "Expected closing bracket for array literal",
                        offset,
                    ));
                }
            }
        }
    }

    /// Arguments after the opening `(`.
    fn parse_args(&mut self) -> ExprResult<Vec<Argument>> {
        if self.is_eof() {
            return Err(self.error("Unexpected EOF in argument list"));
        }

        let mut args = vec![];
        if self.check(&Token::RParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_argument()?);

            let offset = self.offset();
            match self.advance().map(|t| t.token) {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err(ExprError::parse("Expected close paren", offset)),
            }
        }
    }

    fn parse_argument(&mut self) -> ExprResult<Argument> {
        if let (Some(Token::Identifier(param)), Some(Token::Arrow)) = (self.peek(), self.peek_nth(1)) {
            let param = param.clone();
            self.advance();
            self.advance();
            let body = self.parse_expression()?;
            return Ok(Argument::Arrow { param, body });
        }

        Ok(Argument::Expr(self.parse_expression()?))
    }
}

fn binary(op: BinOp, left: JsonNode, right: JsonNode) -> JsonNode {
    JsonNode::from_sql(SqlNode::binary(
        op,
        SqlNode::from_json(left),
        SqlNode::from_json(right),
    ))
}

fn expression(arg: Argument, offset: usize) -> ExprResult<JsonNode> {
    match arg {
        Argument::Expr(expr) => Ok(expr),
        Argument::Arrow { .. } => Err(ExprError::parse("Unexpected arrow function", offset)),
    }
}

/// Bare calls: `like(haystack, pattern)` and `glob(haystack, pattern)`.
fn function_call(name: &str, args: Vec<Argument>, offset: usize) -> ExprResult<JsonNode> {
    let build: fn(SqlNode, SqlNode) -> SqlNode = match name {
        "like" => SqlNode::like,
        "glob" => SqlNode::glob,
        _ => {
            return Err(ExprError::parse(
                format!("Invalid function name: {name}:{}", args.len()),
                offset,
            ));
        }
    };

    let mut args = args.into_iter();
    let (Some(haystack), Some(pattern), None) = (args.next(), args.next(), args.next()) else {
        return Err(ExprError::parse(
            format!("Wrong number of arguments to {name}"),
            offset,
        ));
    };

    let haystack = SqlNode::from_json(expression(haystack, offset)?);
    let pattern = SqlNode::from_json(expression(pattern, offset)?);
    Ok(JsonNode::from_sql(build(haystack, pattern)))
}

/// Trailing `.method(args)` calls.
fn method_call(
    object: JsonNode,
    name: &str,
    args: Vec<Argument>,
    offset: usize,
) -> ExprResult<JsonNode> {
    let err = |message: String| -> ExprResult<JsonNode> { Err(ExprError::parse(message, offset)) };

    let node = match name {
        "toLowerCase" | "toUpperCase" => {
            if !args.is_empty() {
                return err(format!("Wrong number of arguments to {name}"));
            }
            let value = Box::new(SqlNode::from_json(object));
            if name == "toLowerCase" {
                SqlNode::ToLower(value)
            } else {
                SqlNode::ToUpper(value)
            }
        }
        "includes" => {
            let mut args = args.into_iter();
            let (Some(needle), None) = (args.next(), args.next()) else {
                return err("Wrong number of arguments to includes".to_string());
            };
            SqlNode::includes(object, SqlNode::from_json(expression(needle, offset)?))
        }
        "some" => {
            if args.len() != 1 {
                return err(".some() takes exactly one argument".to_string());
            }
            match args.into_iter().next() {
                Some(Argument::Arrow { param, body }) => {
                    SqlNode::some(object, param, SqlNode::from_json(body))
                }
                _ => return err(".some() must be passed an arrow function".to_string()),
            }
        }
        "every" => {
            if args.len() != 1 {
                return err("Wrong number of arguments to .every()".to_string());
            }
            match args.into_iter().next() {
                Some(Argument::Arrow { param, body }) => {
                    SqlNode::every(object, param, SqlNode::from_json(body))
                }
                _ => return err(".every() must be passed an arrow function".to_string()),
            }
        }
        _ => return err(format!("Unknown method: {name}")),
    };

    Ok(JsonNode::from_sql(node))
}

/// Tokenize and parse `input`. The result is not optimized.
pub fn parse(input: &str) -> ExprResult<JsonNode> {
    Parser::new(tokenize(input)?, input.len()).parse()
}
