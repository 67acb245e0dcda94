use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use super::arbitrary::{Document, Layout, Mutation};
use crate::{Found, ParseError, ParserOptions, TokenKind, parse_tokens, records};

fn tests() -> u64 {
    if is_ci::cached() { 5_000 } else { 500 }
}

/// Every generated document is accepted, with or without strict commas, and
/// the summary matches its shape.
#[test]
fn generated_documents_parse() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let expected = doc.summary();
        let strict = ParserOptions {
            reject_trailing_commas: true,
            ..ParserOptions::default()
        };
        parse_tokens(doc.tokens(Layout::OneLine), ParserOptions::default()) == Ok(expected)
            && parse_tokens(doc.tokens(Layout::LinePerToken), strict) == Ok(expected)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document) -> bool);
}

/// Two fresh streams over the same tokens give the same outcome, valid or
/// not.
#[test]
fn parsing_is_idempotent() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, mutation: Mutation) -> bool {
        let mut tokens = doc.tokens(Layout::LinePerToken);
        mutation.apply(&mut tokens);
        parse_tokens(tokens.clone(), ParserOptions::default())
            == parse_tokens(tokens, ParserOptions::default())
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document, Mutation) -> bool);
}

/// With one token per line, a rejected token is always the one on the
/// reported line.
#[test]
fn error_line_points_at_the_offending_token() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, mutation: Mutation) -> bool {
        let mut tokens = doc.tokens(Layout::LinePerToken);
        mutation.apply(&mut tokens);
        match parse_tokens(tokens.clone(), ParserOptions::default()) {
            Ok(_) => true,
            Err(ParseError::Syntax(err)) => match err.found {
                Found::Token(kind) => {
                    !err.expected.contains(kind) && tokens[err.line - 1].kind() == kind
                }
                Found::EndOfStream => false,
            },
            Err(ParseError::DepthLimitExceeded { .. }) => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document, Mutation) -> bool);
}

/// Dropping the root's closing delimiter can never yield a valid document.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn unclosed_root_is_rejected(doc: Document) -> bool {
    let mut tokens = doc.tokens(Layout::OneLine);
    let close = tokens.len() - 2;
    tokens.remove(close);
    parse_tokens(tokens, ParserOptions::default()).is_err()
}

/// Token-record encoding is transparent to the engine.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn record_encoding_preserves_outcome(doc: Document, mutation: Mutation) -> bool {
    let mut tokens = doc.tokens(Layout::LinePerToken);
    mutation.apply(&mut tokens);
    // A mutated EOF-looking token in the middle cannot be encoded as a valid
    // record document; skip those.
    if tokens[..tokens.len() - 1].iter().any(|t| t.kind() == TokenKind::Eof) {
        return true;
    }
    let decoded = records::decode(&records::encode(&tokens)).expect("encoded tokens decode");
    parse_tokens(decoded, ParserOptions::default())
        == parse_tokens(tokens, ParserOptions::default())
}
