use std::collections::VecDeque;

use thiserror::Error;

use crate::token::Token;

/// Raised when a stream is read past its last token.
///
/// A sequence that ends in `EOF` never produces this during a parse; it shows
/// up only for token sequences that were not terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token stream exhausted after line {line}")]
pub struct Exhausted {
    /// Line of the last token handed out, or 1 if none was.
    pub line: usize,
}

/// FIFO buffer of tokens with one token of lookahead.
///
/// A stream is owned by a single parse and drained by it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
    consumed: usize,
    last_line: usize,
}

impl TokenStream {
    /// Creates a stream over `tokens`, front first.
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            consumed: 0,
            last_line: 1,
        }
    }

    /// Returns the front token without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] if the stream is empty.
    pub fn peek(&self) -> Result<&Token, Exhausted> {
        self.tokens.front().ok_or(Exhausted {
            line: self.last_line,
        })
    }

    /// Removes and returns the front token.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] if the stream is empty.
    pub fn consume(&mut self) -> Result<Token, Exhausted> {
        let token = self.tokens.pop_front().ok_or(Exhausted {
            line: self.last_line,
        })?;
        self.consumed += 1;
        self.last_line = token.line();
        Ok(token)
    }

    /// Tokens still buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` once every token has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn sample() -> TokenStream {
        TokenStream::new([
            Token::structural(TokenKind::LeftBracket, 1),
            Token::structural(TokenKind::RightBracket, 2),
            Token::eof(2),
        ])
    }

    #[test]
    fn peek_is_idempotent() {
        let stream = sample();
        let first = stream.peek().unwrap().clone();
        assert_eq!(stream.peek().unwrap(), &first);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.consumed(), 0);
    }

    #[test]
    fn consume_dequeues_in_order() {
        let mut stream = sample();
        assert_eq!(stream.consume().unwrap().kind(), TokenKind::LeftBracket);
        assert_eq!(stream.peek().unwrap().kind(), TokenKind::RightBracket);
        assert_eq!(stream.consume().unwrap().kind(), TokenKind::RightBracket);
        assert!(stream.consume().unwrap().is_eof());
        assert!(stream.is_empty());
        assert_eq!(stream.consumed(), 3);
    }

    #[test]
    fn exhausted_stream_fails_loudly() {
        let mut stream = sample();
        for _ in 0..3 {
            stream.consume().unwrap();
        }
        assert_eq!(stream.peek(), Err(Exhausted { line: 2 }));
        assert_eq!(stream.consume(), Err(Exhausted { line: 2 }));
        assert_eq!(stream.consumed(), 3);
    }

    #[test]
    fn empty_stream_reports_first_line() {
        let stream = TokenStream::default();
        assert_eq!(stream.peek(), Err(Exhausted { line: 1 }));
        let stream: TokenStream = core::iter::empty().collect();
        assert_eq!(stream.peek(), Err(Exhausted { line: 1 }));
    }
}
