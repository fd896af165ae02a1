// tests/lexer_tests.rs

use docexpr::ast::{SpannedToken, Token};
use docexpr::error::ErrorKind;
use docexpr::lexer::{Lexer, tokenize};

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect()
}

fn lex_error(input: &str) -> String {
    let err = tokenize(input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lex, "Wrong kind for input: {}", input);
    err.message
}

// ============================================================================
// Punctuation and Operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        (".", Token::Dot),
        (",", Token::Comma),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("!", Token::Exclamation),
        ("-", Token::Minus),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
        ("=>", Token::Arrow),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_two_char_vs_single_char() {
    assert_eq!(tokens("< =="), vec![Token::Lt, Token::EqEq]);
    assert_eq!(tokens("! !="), vec![Token::Exclamation, Token::NotEq]);
    assert_eq!(tokens(">>="), vec![Token::Gt, Token::GtEq]);
    assert_eq!(tokens("!!x"), vec![
        Token::Exclamation,
        Token::Exclamation,
        Token::Identifier("x".into()),
    ]);
}

#[test]
fn test_stray_operator_halves_are_errors() {
    assert!(lex_error("_ = 1").contains("Unexpected '='"));
    assert!(lex_error("_ & 1").contains("did you mean '&&'"));
    assert!(lex_error("_ | 1").contains("did you mean '||'"));
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("_ id $x café _tmp2 名前"),
        vec![
            Token::Identifier("_".into()),
            Token::Identifier("id".into()),
            Token::Identifier("$x".into()),
            Token::Identifier("café".into()),
            Token::Identifier("_tmp2".into()),
            Token::Identifier("名前".into()),
        ]
    );
}

#[test]
fn test_identifier_stops_at_punctuation() {
    assert_eq!(
        tokens("_.tags.some(t=>t)"),
        vec![
            Token::Identifier("_".into()),
            Token::Dot,
            Token::Identifier("tags".into()),
            Token::Dot,
            Token::Identifier("some".into()),
            Token::LParen,
            Token::Identifier("t".into()),
            Token::Arrow,
            Token::Identifier("t".into()),
            Token::RParen,
        ]
    );
}

#[test]
fn test_unrecognised_character() {
    assert_eq!(lex_error("_.a # 1"), "Unexpected character '#' at position 4");
    assert_eq!(lex_error("@"), "Unexpected character '@' at position 0");
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(tokens("0"), vec![Token::Integer(0)]);
    assert_eq!(tokens("42"), vec![Token::Integer(42)]);
    assert_eq!(tokens("0.5"), vec![Token::Float(0.5)]);
    assert_eq!(tokens("3.25"), vec![Token::Float(3.25)]);
    assert_eq!(
        tokens("9007199254740993"),
        vec![Token::Integer(9_007_199_254_740_993)]
    );
}

#[test]
fn test_number_overflowing_i64_becomes_float() {
    assert_eq!(tokens("100000000000000000000"), vec![Token::Float(1e20)]);
}

#[test]
fn test_number_beyond_f64_is_rejected() {
    let input = format!("1{}", "0".repeat(400));
    assert_eq!(lex_error(&input), "Invalid number literal");
    assert_eq!(tokenize(&input).unwrap_err().position, Some(0));

    let input = format!("_.a == {}.5", "9".repeat(320));
    assert_eq!(lex_error(&input), "Invalid number literal");
}

#[test]
fn test_leading_zero_splits() {
    assert_eq!(tokens("01"), vec![Token::Integer(0), Token::Integer(1)]);
}

#[test]
fn test_trailing_dot_is_separate_token() {
    assert_eq!(
        tokens("1.x"),
        vec![Token::Integer(1), Token::Dot, Token::Identifier("x".into())]
    );
}

#[test]
fn test_minus_is_separate_token() {
    assert_eq!(tokens("-3"), vec![Token::Minus, Token::Integer(3)]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_quotes() {
    assert_eq!(tokens(r#""red""#), vec![Token::String("red".into())]);
    assert_eq!(tokens("'red'"), vec![Token::String("red".into())]);
    assert_eq!(tokens(r#"'say "hi"'"#), vec![Token::String(r#"say "hi""#.into())]);
    assert_eq!(tokens(r#""it's""#), vec![Token::String("it's".into())]);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""\" \' \\ \b \f \n \r \t""#),
        vec![Token::String("\" ' \\ \u{8} \u{c} \n \r \t".into())]
    );
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(tokens(r#""\u00e9""#), vec![Token::String("\u{e9}".into())]);
    assert_eq!(tokens(r#""caf\u00E9""#), vec![Token::String("caf\u{e9}".into())]);
    assert_eq!(
        tokens(r#""\uD83D\uDE00""#),
        vec![Token::String("\u{1F600}".into())]
    );
}

#[test]
fn test_invalid_escapes() {
    assert_eq!(lex_error(r#""\q""#), r"Invalid escape sequence: \q");
    assert_eq!(lex_error(r#""\u12""#), "Invalid unicode escape");
    assert_eq!(lex_error(r#""\uD83D""#), "Invalid unicode escape");
    assert_eq!(lex_error(r#""\uDE00""#), "Invalid unicode escape");
}

#[test]
fn test_unterminated_string_reports_start() {
    let err = tokenize(r#"_.a == "abc"#).unwrap_err();
    assert_eq!(err.message, "Unexpected EOF in string starting at 7");
    assert_eq!(err.position, Some(7));

    assert_eq!(lex_error(r#""abc\"#), "Unexpected EOF in string starting at 0");
}

// ============================================================================
// Whitespace and Offsets
// ============================================================================

#[test]
fn test_empty_and_blank_input() {
    assert!(tokens("").is_empty());
    assert!(tokens(" \t\n ").is_empty());
}

#[test]
fn test_offsets() {
    let spanned = tokenize("  _.size >= 3").unwrap();
    let offsets: Vec<usize> = spanned.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![2, 3, 4, 9, 12]);
    assert_eq!(
        spanned.last(),
        Some(&SpannedToken {
            token: Token::Integer(3),
            offset: 12
        })
    );
}

#[test]
fn test_offsets_are_bytes() {
    let spanned = tokenize("é == 1").unwrap();
    assert_eq!(spanned[1].offset, 3);
}
