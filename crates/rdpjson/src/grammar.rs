//! Predictive recursive-descent engine for the JSON grammar.
//!
//! ```text
//! Json         ::= Object | Array
//! Object       ::= "{" Pairs "}"
//! Pairs        ::= Pair PairsTail | φ
//! Pair         ::= STRING ":" Value
//! PairsTail    ::= "," Pairs | φ
//! Value        ::= STRING | NUMBER | TRUE | FALSE | NULL | Object | Array
//! Array        ::= "[" Elements "]"
//! Elements     ::= Value ElementsTail | φ
//! ElementsTail ::= "," Elements | φ
//! ```
//!
//! The grammar is LL(1): each procedure picks its alternative from the first
//! set of the next token, so nothing is ever backtracked. The call stack of
//! procedures is the whole parser state.
//!
//! `Pairs`/`PairsTail` and `Elements`/`ElementsTail` are mutually
//! tail-recursive. The tail procedures report whether they took the comma
//! alternative and the enclosing `Pairs`/`Elements` loops instead of calling
//! itself again, so stack depth tracks nesting depth rather than the length
//! of an object or array.

use core::fmt;

use tracing::{debug, trace};

use crate::{
    error::{Expected, Found, ParseError, SyntaxError},
    options::ParserOptions,
    stream::TokenStream,
    token::{Token, TokenKind},
};

/// A grammar nonterminal, identifying the procedure that handled (or
/// rejected) a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rule {
    /// `Json ::= Object | Array`
    Json,
    /// `Object ::= "{" Pairs "}"`
    Object,
    /// `Pairs ::= Pair PairsTail | φ`
    Pairs,
    /// `Pair ::= STRING ":" Value`
    Pair,
    /// `PairsTail ::= "," Pairs | φ`
    PairsTail,
    /// `Value ::= STRING | NUMBER | TRUE | FALSE | NULL | Object | Array`
    Value,
    /// `Array ::= "[" Elements "]"`
    Array,
    /// `Elements ::= Value ElementsTail | φ`
    Elements,
    /// `ElementsTail ::= "," Elements | φ`
    ElementsTail,
    /// The check for `EOF` after the start symbol returns.
    EndOfInput,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rule::Json => "json",
            Rule::Object => "object",
            Rule::Pairs => "pairs",
            Rule::Pair => "pair",
            Rule::PairsTail => "pairs_tail",
            Rule::Value => "value",
            Rule::Array => "array",
            Rule::Elements => "elements",
            Rule::ElementsTail => "elements_tail",
            Rule::EndOfInput => "end_of_input",
        })
    }
}

/// Counts gathered while validating a document.
///
/// No value tree is built; this is all a successful parse returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Tokens consumed, including the final `EOF`.
    pub tokens: usize,
    /// `Object` productions matched.
    pub objects: usize,
    /// `Array` productions matched.
    pub arrays: usize,
    /// `Pair` productions matched.
    pub pairs: usize,
    /// `Value` productions matched (array elements and pair values).
    pub values: usize,
    /// Deepest nesting of objects and arrays.
    pub max_depth: usize,
}

/// Validates `stream` as a complete JSON document: the start symbol followed
/// by `EOF`.
///
/// On success the stream has been drained up to and including `EOF`. On
/// failure the stream is left wherever the engine stopped and should be
/// discarded.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse(stream: &mut TokenStream, options: ParserOptions) -> Result<Summary, ParseError> {
    debug!(tokens = stream.len(), ?options, "parse started");
    let mut grammar = Grammar::new(stream, options);
    match grammar.json().and_then(|()| grammar.end_of_input()) {
        Ok(()) => {
            let summary = grammar.finish();
            debug!(?summary, "parse succeeded");
            Ok(summary)
        }
        Err(err) => {
            debug!(line = err.line(), %err, "parse failed");
            Err(err)
        }
    }
}

/// [`parse`] over an owned token sequence.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_tokens(
    tokens: impl IntoIterator<Item = Token>,
    options: ParserOptions,
) -> Result<Summary, ParseError> {
    parse(&mut TokenStream::new(tokens), options)
}

/// One parse session over a borrowed stream.
struct Grammar<'s> {
    stream: &'s mut TokenStream,
    options: ParserOptions,
    depth: usize,
    summary: Summary,
}

type Outcome<T = ()> = Result<T, ParseError>;

impl<'s> Grammar<'s> {
    fn new(stream: &'s mut TokenStream, options: ParserOptions) -> Self {
        Self {
            stream,
            options,
            depth: 0,
            summary: Summary::default(),
        }
    }

    fn finish(mut self) -> Summary {
        self.summary.tokens = self.stream.consumed();
        self.summary
    }

    // --------------------------------------------------------------------
    // Stream access and the error reporter
    // --------------------------------------------------------------------

    /// Kind and line of the next token, without consuming it.
    fn lookahead(&self, rule: Rule, expected: Expected) -> Outcome<(TokenKind, usize)> {
        match self.stream.peek() {
            Ok(token) => Ok((token.kind(), token.line())),
            Err(exhausted) => Err(report(rule, exhausted.line, expected, Found::EndOfStream)),
        }
    }

    /// Consumes the next token and checks it belongs to `expected`.
    fn expect(&mut self, rule: Rule, expected: Expected) -> Outcome<Token> {
        let token = self
            .stream
            .consume()
            .map_err(|exhausted| report(rule, exhausted.line, expected, Found::EndOfStream))?;
        if expected.contains(token.kind()) {
            Ok(token)
        } else {
            Err(report(rule, token.line(), expected, Found::Token(token.kind())))
        }
    }

    fn open(&mut self, line: usize) -> Outcome {
        self.depth += 1;
        if let Some(limit) = self.options.max_depth {
            if self.depth > limit {
                return Err(ParseError::DepthLimitExceeded { line, limit });
            }
        }
        self.summary.max_depth = self.summary.max_depth.max(self.depth);
        Ok(())
    }

    fn close(&mut self) {
        self.depth -= 1;
    }

    // --------------------------------------------------------------------
    // One procedure per nonterminal
    // --------------------------------------------------------------------

    /// `Json ::= Object | Array`
    fn json(&mut self) -> Outcome {
        trace!(rule = %Rule::Json);
        match self.lookahead(Rule::Json, Expected::JSON)? {
            (TokenKind::LeftBrace, _) => self.object(),
            (TokenKind::LeftBracket, _) => self.array(),
            (kind, line) => Err(report(Rule::Json, line, Expected::JSON, Found::Token(kind))),
        }
    }

    /// `Object ::= "{" Pairs "}"`
    fn object(&mut self) -> Outcome {
        trace!(rule = %Rule::Object, depth = self.depth);
        let open = self.expect(Rule::Object, Expected::one(TokenKind::LeftBrace))?;
        self.open(open.line())?;
        self.summary.objects += 1;
        self.pairs()?;
        self.expect(Rule::Object, Expected::one(TokenKind::RightBrace))?;
        self.close();
        Ok(())
    }

    /// `Pairs ::= Pair PairsTail | φ`
    ///
    /// Anything other than a STRING selects the empty alternative; the
    /// enclosing `Object` reports the missing `}` if there is one.
    fn pairs(&mut self) -> Outcome {
        loop {
            trace!(rule = %Rule::Pairs);
            let (kind, _) = self.lookahead(Rule::Pairs, Expected::one(TokenKind::String))?;
            if kind != TokenKind::String {
                return Ok(());
            }
            self.pair()?;
            if !self.pairs_tail()? {
                return Ok(());
            }
        }
    }

    /// `Pair ::= STRING ":" Value`
    fn pair(&mut self) -> Outcome {
        trace!(rule = %Rule::Pair);
        self.expect(Rule::Pair, Expected::one(TokenKind::String))?;
        self.expect(Rule::Pair, Expected::one(TokenKind::Colon))?;
        self.summary.pairs += 1;
        self.value()
    }

    /// `PairsTail ::= "," Pairs | φ`
    ///
    /// Returns `true` if the comma alternative was taken, in which case the
    /// caller continues with `Pairs`.
    fn pairs_tail(&mut self) -> Outcome<bool> {
        trace!(rule = %Rule::PairsTail);
        let comma = Expected::one(TokenKind::Comma);
        let (kind, _) = self.lookahead(Rule::PairsTail, comma)?;
        if kind != TokenKind::Comma {
            return Ok(false);
        }
        self.expect(Rule::PairsTail, comma)?;
        if self.options.reject_trailing_commas {
            let string = Expected::one(TokenKind::String);
            let (kind, line) = self.lookahead(Rule::PairsTail, string)?;
            if kind != TokenKind::String {
                return Err(report(Rule::PairsTail, line, string, Found::Token(kind)));
            }
        }
        Ok(true)
    }

    /// `Value ::= STRING | NUMBER | TRUE | FALSE | NULL | Object | Array`
    fn value(&mut self) -> Outcome {
        trace!(rule = %Rule::Value);
        self.summary.values += 1;
        match self.lookahead(Rule::Value, Expected::VALUE)? {
            (
                kind @ (TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null),
                _,
            ) => self.expect(Rule::Value, Expected::one(kind)).map(drop),
            (TokenKind::LeftBrace, _) => self.object(),
            (TokenKind::LeftBracket, _) => self.array(),
            (kind, line) => Err(report(Rule::Value, line, Expected::VALUE, Found::Token(kind))),
        }
    }

    /// `Array ::= "[" Elements "]"`
    fn array(&mut self) -> Outcome {
        trace!(rule = %Rule::Array, depth = self.depth);
        let open = self.expect(Rule::Array, Expected::one(TokenKind::LeftBracket))?;
        self.open(open.line())?;
        self.summary.arrays += 1;
        self.elements()?;
        self.expect(Rule::Array, Expected::one(TokenKind::RightBracket))?;
        self.close();
        Ok(())
    }

    /// `Elements ::= Value ElementsTail | φ`
    fn elements(&mut self) -> Outcome {
        loop {
            trace!(rule = %Rule::Elements);
            let (kind, _) = self.lookahead(Rule::Elements, Expected::VALUE)?;
            if !Expected::VALUE.contains(kind) {
                return Ok(());
            }
            self.value()?;
            if !self.elements_tail()? {
                return Ok(());
            }
        }
    }

    /// `ElementsTail ::= "," Elements | φ`
    ///
    /// Returns `true` if the comma alternative was taken.
    fn elements_tail(&mut self) -> Outcome<bool> {
        trace!(rule = %Rule::ElementsTail);
        let comma = Expected::one(TokenKind::Comma);
        let (kind, _) = self.lookahead(Rule::ElementsTail, comma)?;
        if kind != TokenKind::Comma {
            return Ok(false);
        }
        self.expect(Rule::ElementsTail, comma)?;
        if self.options.reject_trailing_commas {
            let (kind, line) = self.lookahead(Rule::ElementsTail, Expected::VALUE)?;
            if !Expected::VALUE.contains(kind) {
                return Err(report(Rule::ElementsTail, line, Expected::VALUE, Found::Token(kind)));
            }
        }
        Ok(true)
    }

    /// The start symbol must be followed by exactly the `EOF` token.
    fn end_of_input(&mut self) -> Outcome {
        self.expect(Rule::EndOfInput, Expected::one(TokenKind::Eof))
            .map(drop)
    }
}

/// The single failure path of the engine.
fn report(rule: Rule, line: usize, expected: Expected, found: Found) -> ParseError {
    trace!(%rule, line, %expected, %found, "rejected");
    SyntaxError {
        line,
        expected,
        found,
        rule,
    }
    .into()
}
