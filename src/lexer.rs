use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{SpannedToken, Token},
    error::{ExprError, ExprResult},
    source::Source,
};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[$_\p{ID_Start}][$\x{200C}\x{200D}\p{ID_Continue}]*")
        .expect("identifier pattern is valid")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0|[1-9][0-9]*)(?:\.[0-9]+)?").expect("number pattern is valid"));

pub struct Lexer<'a> {
    source: Source<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            source: Source::new(input),
        }
    }

    fn read_identifier(&mut self) -> Option<String> {
        let found = IDENTIFIER.find(self.source.rest())?;
        let ident = found.as_str().to_string();
        self.source.skip(found.end());
        Some(ident)
    }

    fn read_number(&mut self) -> ExprResult<Token> {
        let start = self.source.position();
        let found = NUMBER
            .find(self.source.rest())
            .ok_or_else(|| ExprError::lex("Invalid number literal", start))?;
        let text = found.as_str();
        self.source.skip(found.end());

        if !text.contains('.')
            && let Ok(n) = text.parse::<i64>()
        {
            return Ok(Token::Integer(n));
        }

        // Integers beyond i64 degrade to floats the way JSON numbers do.
        // Anything past f64's range has no SQL value to bind.
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Token::Float)
            .ok_or_else(|| ExprError::lex("Invalid number literal", start))
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits = self.source.rest().get(..4)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        self.source.skip(4);
        Some(value)
    }

    /// Reads the code point of a `\uXXXX` escape whose `\u` was already consumed.
    /// A high surrogate must be followed by an escaped low surrogate.
    fn read_unicode_escape(&mut self, escape_start: usize) -> ExprResult<char> {
        let invalid = || ExprError::lex("Invalid unicode escape", escape_start);

        let high = self.read_hex4().ok_or_else(invalid)?;
        let code_point = match high {
            0xD800..=0xDBFF => {
                if self.source.peek() != Some('\\') || self.source.peek_nth(1) != Some('u') {
                    return Err(invalid());
                }
                self.source.skip(2);
                let low = self.read_hex4().ok_or_else(invalid)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid());
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(invalid()),
            _ => high,
        };

        char::from_u32(code_point).ok_or_else(invalid)
    }

    fn read_string(&mut self, quote: char) -> ExprResult<String> {
        let start = self.source.position();
        let mut result = String::new();
        self.source.pop(); // opening quote

        while let Some(ch) = self.source.peek() {
            match ch {
                c if c == quote => {
                    self.source.pop();
                    return Ok(result);
                }
                '\\' => {
                    let escape_start = self.source.position();
                    self.source.pop();
                    match self.source.pop() {
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some('b') => result.push('\u{0008}'),
                        Some('f') => result.push('\u{000C}'),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('u') => result.push(self.read_unicode_escape(escape_start)?),
                        Some(other) => {
                            return Err(ExprError::lex(
                                format!("Invalid escape sequence: \\{other}"),
                                escape_start,
                            ));
                        }
                        None => break,
                    }
                }
                _ => {
                    result.push(ch);
                    self.source.pop();
                }
            }
        }

        Err(ExprError::lex(
            format!("Unexpected EOF in string starting at {start}"),
            start,
        ))
    }

    /// Consumes `first`, then `second` if it follows; otherwise reports a stray
    /// `first` with a hint.
    fn read_pair(&mut self, first: char, second: char, token: Token) -> ExprResult<Token> {
        let position = self.source.position();
        self.source.pop();
        if self.source.peek() == Some(second) {
            self.source.pop();
            Ok(token)
        } else {
            Err(ExprError::lex(
                format!("Unexpected '{first}' at position {position} (did you mean '{first}{second}'?)"),
                position,
            ))
        }
    }

    /// Consumes `first` and, if `=` follows, the `=` too.
    fn read_with_eq(&mut self, with_eq: Token, without: Token) -> Token {
        self.source.pop();
        if self.source.peek() == Some('=') {
            self.source.pop();
            with_eq
        } else {
            without
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.source.pop();
        token
    }

    pub fn next_token(&mut self) -> ExprResult<Token> {
        self.source.skip_whitespace();

        let Some(ch) = self.source.peek() else {
            return Ok(Token::Eof);
        };

        let token = match ch {
            '.' => self.single(Token::Dot),
            ',' => self.single(Token::Comma),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '-' => self.single(Token::Minus),
            '>' => self.read_with_eq(Token::GtEq, Token::Gt),
            '<' => self.read_with_eq(Token::LtEq, Token::Lt),
            '!' => self.read_with_eq(Token::NotEq, Token::Exclamation),
            '=' => {
                let position = self.source.position();
                match self.source.peek_nth(1) {
                    Some('=') => {
                        self.source.skip(2);
                        Token::EqEq
                    }
                    Some('>') => {
                        self.source.skip(2);
                        Token::Arrow
                    }
                    _ => {
                        return Err(ExprError::lex(
                            format!("Unexpected '=' at position {position} (did you mean '=='?)"),
                            position,
                        ));
                    }
                }
            }
            '&' => self.read_pair('&', '&', Token::AndAnd)?,
            '|' => self.read_pair('|', '|', Token::OrOr)?,
            '"' | '\'' => Token::String(self.read_string(ch)?),
            c if c.is_ascii_digit() => self.read_number()?,
            _ => {
                let position = self.source.position();
                match self.read_identifier() {
                    Some(ident) => Token::Identifier(ident),
                    None => {
                        return Err(ExprError::lex(
                            format!("Unexpected character '{ch}' at position {position}"),
                            position,
                        ));
                    }
                }
            }
        };

        Ok(token)
    }

    /// Next token together with the offset it starts at.
    pub fn next_spanned(&mut self) -> ExprResult<SpannedToken> {
        self.source.skip_whitespace();
        let offset = self.source.position();
        let token = self.next_token()?;
        Ok(SpannedToken { token, offset })
    }
}

/// Splits an expression into tokens. The trailing [`Token::Eof`] is not included.
pub fn tokenize(input: &str) -> ExprResult<Vec<SpannedToken>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let spanned = lexer.next_spanned()?;
        if spanned.token == Token::Eof {
            return Ok(tokens);
        }
        tokens.push(spanned);
    }
}

#[test]
fn test_comparison_operators() {
    let mut lexer = Lexer::new("> >= < <= == !=");
    assert_eq!(lexer.next_token().unwrap(), Token::Gt);
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Lt);
    assert_eq!(lexer.next_token().unwrap(), Token::LtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::EqEq);
    assert_eq!(lexer.next_token().unwrap(), Token::NotEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_accessor_chain() {
    let mut lexer = Lexer::new("_.tags[0]");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("_".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Dot);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("tags".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(0));
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
}
