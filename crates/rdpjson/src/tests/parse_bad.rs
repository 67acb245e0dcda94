use rstest::rstest;

use super::{lex, parse_with, strict, syntax_err};
use crate::{
    DEFAULT_MAX_DEPTH, Expected, Found, ParseError, ParserOptions, Rule, SyntaxError, Token,
    TokenKind, parse_tokens,
};

fn default_err(src: &str) -> SyntaxError {
    syntax_err(src, ParserOptions::default())
}

#[test]
fn missing_value_before_close_brace() {
    let err = default_err("{\"a\":\n}");
    assert_eq!(
        err,
        SyntaxError {
            line: 2,
            expected: Expected::VALUE,
            found: Found::Token(TokenKind::RightBrace),
            rule: Rule::Value,
        }
    );
    insta::assert_snapshot!(
        ParseError::from(err).diagnostic(),
        @"Error: line 2 - expected STRING,NUMBER,TRUE,FALSE,NULL,{,["
    );
}

#[test]
fn missing_comma_between_elements() {
    let err = default_err("[1\n 2]");
    assert_eq!(err.line, 2);
    assert_eq!(err.expected, Expected::one(TokenKind::RightBracket));
    assert_eq!(err.found, Found::Token(TokenKind::Number));
    assert_eq!(err.rule, Rule::Array);
}

#[rstest]
#[case::bare_true("true", TokenKind::True)]
#[case::bare_string("\"s\"", TokenKind::String)]
#[case::bare_number("42", TokenKind::Number)]
#[case::close_first("]", TokenKind::RightBracket)]
fn start_symbol_requires_a_container(#[case] src: &str, #[case] found: TokenKind) {
    let err = default_err(src);
    assert_eq!(err.rule, Rule::Json);
    assert_eq!(err.expected, Expected::JSON);
    assert_eq!(err.found, Found::Token(found));
    insta::allow_duplicates! {
        insta::assert_snapshot!(ParseError::from(err).diagnostic(), @"Error: line 1 - expected {,[");
    }
}

#[test]
fn empty_document_fails_at_eof() {
    let err = default_err("\n\n");
    assert_eq!(err.line, 3);
    assert_eq!(err.found, Found::Token(TokenKind::Eof));
    assert_eq!(err.rule, Rule::Json);
}

#[rstest]
#[case::missing_colon(r#"{"a" 1}"#, Rule::Pair, Expected::one(TokenKind::Colon), TokenKind::Number)]
#[case::number_key("{1: 2}", Rule::Object, Expected::one(TokenKind::RightBrace), TokenKind::Number)]
#[case::unclosed_object(r#"{"a": 1"#, Rule::Object, Expected::one(TokenKind::RightBrace), TokenKind::Eof)]
#[case::unclosed_array("[1, 2", Rule::Array, Expected::one(TokenKind::RightBracket), TokenKind::Eof)]
#[case::mismatched_close("[1}", Rule::Array, Expected::one(TokenKind::RightBracket), TokenKind::RightBrace)]
#[case::double_comma("[1,,2]", Rule::Array, Expected::one(TokenKind::RightBracket), TokenKind::Comma)]
#[case::leading_comma("[,1]", Rule::Array, Expected::one(TokenKind::RightBracket), TokenKind::Comma)]
#[case::colon_in_array("[1: 2]", Rule::Array, Expected::one(TokenKind::RightBracket), TokenKind::Colon)]
#[case::pair_missing_key(r#"{"a": 1, : 2}"#, Rule::Object, Expected::one(TokenKind::RightBrace), TokenKind::Colon)]
#[case::trailing_document("{} []", Rule::EndOfInput, Expected::one(TokenKind::Eof), TokenKind::LeftBracket)]
#[case::trailing_value("[] 1", Rule::EndOfInput, Expected::one(TokenKind::Eof), TokenKind::Number)]
fn grammar_violations(
    #[case] src: &str,
    #[case] rule: Rule,
    #[case] expected: Expected,
    #[case] found: TokenKind,
) {
    let err = default_err(src);
    assert_eq!((err.rule, err.expected, err.found), (rule, expected, Found::Token(found)));
}

#[test]
fn reported_line_is_the_offending_tokens_line() {
    let src = "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\" true\n}";
    let err = default_err(src);
    assert_eq!(err.line, 6);
    assert_eq!(err.found, Found::Token(TokenKind::True));
    assert_eq!(err.expected, Expected::one(TokenKind::Colon));
}

#[test]
fn unterminated_stream_is_reported_not_panicked() {
    // No EOF token: the engine runs off the end of the stream.
    let tokens = vec![
        Token::structural(TokenKind::LeftBracket, 1),
        Token::new(TokenKind::Number, "1", 2),
    ];
    let err = parse_tokens(tokens, ParserOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ParseError::Syntax(SyntaxError {
            line: 2,
            expected: Expected::one(TokenKind::Comma),
            found: Found::EndOfStream,
            rule: Rule::ElementsTail,
        })
    );
}

#[test]
fn empty_stream_is_reported() {
    let err = parse_tokens(Vec::new(), ParserOptions::default()).unwrap_err();
    let syntax = err.as_syntax().unwrap();
    assert_eq!(syntax.found, Found::EndOfStream);
    assert_eq!(syntax.line, 1);
}

#[test]
fn eof_check_without_eof_token() {
    let tokens = vec![
        Token::structural(TokenKind::LeftBrace, 1),
        Token::structural(TokenKind::RightBrace, 1),
    ];
    let err = parse_tokens(tokens, ParserOptions::default()).unwrap_err();
    let syntax = err.as_syntax().unwrap();
    assert_eq!(syntax.rule, Rule::EndOfInput);
    assert_eq!(syntax.found, Found::EndOfStream);
}

#[rstest]
#[case::object(r#"{"a": 1,}"#, Rule::PairsTail, Expected::one(TokenKind::String), TokenKind::RightBrace)]
#[case::array("[1,]", Rule::ElementsTail, Expected::VALUE, TokenKind::RightBracket)]
#[case::nested(r#"[{"a": [1,]}]"#, Rule::ElementsTail, Expected::VALUE, TokenKind::RightBracket)]
fn strict_mode_rejects_trailing_commas(
    #[case] src: &str,
    #[case] rule: Rule,
    #[case] expected: Expected,
    #[case] found: TokenKind,
) {
    let err = syntax_err(src, strict());
    assert_eq!((err.rule, err.expected, err.found), (rule, expected, Found::Token(found)));
}

#[test]
fn depth_limit_is_enforced_at_the_opening_line() {
    let options = ParserOptions {
        max_depth: Some(2),
        ..ParserOptions::default()
    };
    let err = parse_with("[\n[\n[]]]", options).unwrap_err();
    assert_eq!(err, ParseError::DepthLimitExceeded { line: 3, limit: 2 });
}

#[test]
fn default_options_bound_deep_nesting() {
    let src = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
    let err = parse_with(&src, ParserOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ParseError::DepthLimitExceeded {
            line: 1,
            limit: DEFAULT_MAX_DEPTH,
        }
    );
}

#[test]
fn first_error_wins() {
    // Both the missing colon and the trailing garbage are errors; only the
    // first is reported.
    let err = default_err("{\"a\" 1} [");
    assert_eq!(err.expected, Expected::one(TokenKind::Colon));
}

#[test]
fn failures_are_repeatable() {
    let tokens = lex("[1, {\"a\" 2}]");
    let first = parse_tokens(tokens.clone(), ParserOptions::default());
    let second = parse_tokens(tokens, ParserOptions::default());
    assert!(first.is_err());
    assert_eq!(first, second);
}
