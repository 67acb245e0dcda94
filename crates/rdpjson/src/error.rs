use core::fmt;

use thiserror::Error;

use crate::{grammar::Rule, token::TokenKind, tokenizer::TokenizeError};

/// A set of token kinds, used to describe what the engine would have
/// accepted at the point of failure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Expected(u16);

impl Expected {
    /// FIRST(Json): `{` or `[`.
    pub const JSON: Expected = Expected::of(&[TokenKind::LeftBrace, TokenKind::LeftBracket]);

    /// FIRST(Value): the five scalar classes plus `{` and `[`.
    pub const VALUE: Expected = Expected::of(&[
        TokenKind::String,
        TokenKind::Number,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
        TokenKind::LeftBrace,
        TokenKind::LeftBracket,
    ]);

    /// The set containing only `kind`.
    #[must_use]
    pub const fn one(kind: TokenKind) -> Self {
        Self(kind.bit())
    }

    /// The set containing every kind in `kinds`.
    #[must_use]
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Returns `true` if `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Number of kinds in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The kinds in the set, in [`TokenKind::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// What the engine actually saw where it expected something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    /// A token of this kind.
    Token(TokenKind),
    /// Nothing: the token stream ran dry.
    EndOfStream,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(kind) => write!(f, "{kind}"),
            Found::EndOfStream => f.write_str("end of token stream"),
        }
    }
}

/// A grammar violation. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: expected {expected} but found {found}")]
pub struct SyntaxError {
    /// Line of the offending token.
    pub line: usize,
    /// Token kinds that would have been accepted.
    pub expected: Expected,
    /// What was there instead.
    pub found: Found,
    /// The grammar procedure that rejected the token.
    pub rule: Rule,
}

/// Failure outcome of the grammar engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tokens do not match the grammar.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// An object or array opened deeper than [`ParserOptions::max_depth`].
    ///
    /// [`ParserOptions::max_depth`]: crate::ParserOptions::max_depth
    #[error("line {line}: nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded {
        /// Line of the opening delimiter.
        line: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl ParseError {
    /// Source line the error points at.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax(err) => err.line,
            ParseError::DepthLimitExceeded { line, .. } => *line,
        }
    }

    /// The syntax error, if this is one.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            ParseError::DepthLimitExceeded { .. } => None,
        }
    }

    /// Single-line, user-facing rendering of the error.
    ///
    /// ```rust
    /// use rdpjson::{ParserOptions, parse_str, Error};
    ///
    /// let Err(Error::Parse(err)) = parse_str("true", ParserOptions::default()) else {
    ///     unreachable!()
    /// };
    /// assert_eq!(err.diagnostic(), "Error: line 1 - expected {,[");
    /// ```
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            ParseError::Syntax(err) => {
                format!("Error: line {} - expected {}", err.line, err.expected)
            }
            ParseError::DepthLimitExceeded { line, limit } => {
                format!("Error: line {line} - nesting exceeds depth limit of {limit}")
            }
        }
    }
}

/// Anything that can go wrong validating a document end to end.
///
/// Tokenizer failures are kept apart from grammar failures so callers can
/// tell "could not obtain tokens" from "tokens do not form JSON".
#[derive(Debug, Error)]
pub enum Error {
    /// The tokenizer could not produce a token sequence.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// The token sequence was rejected by the grammar engine.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Parse(err.into())
    }
}
