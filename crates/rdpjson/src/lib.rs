//! A predictive recursive-descent validator for JSON token streams.
//!
//! The engine consumes `(kind, lexeme, line)` tokens through a
//! [`TokenStream`] and checks them against a fixed LL(1) JSON grammar,
//! stopping at the first violation with the offending line and the set of
//! tokens that would have been accepted. It does not build a value.
//!
//! ```rust
//! use rdpjson::{ParserOptions, TokenKind, parse_str, Error};
//!
//! let summary = parse_str(r#"{"a": [1, 2, 3]}"#, ParserOptions::default()).unwrap();
//! assert_eq!(summary.values, 4);
//!
//! let Err(Error::Parse(err)) = parse_str("[1 2]", ParserOptions::default()) else {
//!     unreachable!()
//! };
//! let syntax = err.as_syntax().unwrap();
//! assert!(syntax.expected.contains(TokenKind::RightBracket));
//! ```
//!
//! Tokens may come from the built-in [`Lexer`], from a token-record file,
//! or from an external program; see [`Tokenizer`].

mod error;
mod grammar;
mod lexer;
mod options;
pub mod records;
mod stream;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;

use std::path::Path;

use tracing::debug;

pub use error::{Error, Expected, Found, ParseError, SyntaxError};
pub use grammar::{Rule, Summary, parse, parse_tokens};
pub use lexer::{LexError, LexErrorKind, Lexer};
pub use options::{DEFAULT_MAX_DEPTH, ParserOptions};
pub use records::RecordError;
pub use stream::{Exhausted, TokenStream};
pub use token::{Token, TokenKind};
pub use tokenizer::{
    BuiltinTokenizer, CommandTokenizer, RecordFileTokenizer, TokenizeError, Tokenizer,
};

/// Lexes `src` with the built-in [`Lexer`] and validates the result.
///
/// # Errors
///
/// [`Error::Tokenize`] if `src` is not lexically valid, otherwise
/// [`Error::Parse`] for the first grammar violation.
pub fn parse_str(src: &str, options: ParserOptions) -> Result<Summary, Error> {
    let tokens = Lexer::new(src).tokenize().map_err(TokenizeError::from)?;
    Ok(parse_tokens(tokens, options)?)
}

/// Obtains tokens for the document at `path` from `tokenizer`, then
/// validates them.
///
/// # Errors
///
/// [`Error::Tokenize`] if the tokenizer fails, otherwise [`Error::Parse`]
/// for the first grammar violation.
pub fn validate_file(
    path: &Path,
    tokenizer: &dyn Tokenizer,
    options: ParserOptions,
) -> Result<Summary, Error> {
    let tokens = tokenizer.tokenize(path)?;
    debug!(path = %path.display(), tokens = tokens.len(), "tokenized");
    Ok(parse_tokens(tokens, options)?)
}
