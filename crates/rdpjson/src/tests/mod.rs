mod parse_bad;
mod property;

use crate::{Lexer, ParseError, ParserOptions, Summary, SyntaxError, Token, parse_tokens};

pub(crate) fn lex(src: &str) -> Vec<Token> {
    Lexer::new(src).tokenize().expect("test input must lex")
}

pub(crate) fn parse_with(src: &str, options: ParserOptions) -> Result<Summary, ParseError> {
    parse_tokens(lex(src), options)
}

pub(crate) fn parse_ok(src: &str) -> Summary {
    match parse_with(src, ParserOptions::default()) {
        Ok(summary) => summary,
        Err(err) => panic!("expected {src:?} to parse, got {err}"),
    }
}

pub(crate) fn syntax_err(src: &str, options: ParserOptions) -> SyntaxError {
    match parse_with(src, options) {
        Err(ParseError::Syntax(err)) => err,
        other => panic!("expected a syntax error for {src:?}, got {other:?}"),
    }
}

pub(crate) fn strict() -> ParserOptions {
    ParserOptions {
        reject_trailing_commas: true,
        ..ParserOptions::default()
    }
}
