//! Built-in JSON tokenizer.
//!
//! The grammar engine does not care where its tokens come from; this lexer is
//! the default producer so that the crate can validate text without an
//! external tokenizer. It only classifies and delimits tokens. Whether they
//! form a document is the engine's business.

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Why a character sequence could not be turned into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A bare word other than `true`, `false` or `null`.
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
    /// A number that does not match the JSON number grammar.
    #[error("invalid number: {0}")]
    InvalidNumber(&'static str),
    /// A backslash followed by something JSON does not allow.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    /// `\u` not followed by four hex digits.
    #[error("invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    /// A raw character below U+0020 inside a string.
    #[error("unescaped control character U+{0:04X} in string")]
    ControlCharacter(u32),
    /// Input ended inside a string.
    #[error("unterminated string")]
    UnterminatedString,
}

/// A tokenization failure, located in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {line}:{column}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

/// Converts JSON text into a token sequence terminated by `EOF`.
///
/// ```rust
/// use rdpjson::{Lexer, TokenKind};
///
/// let tokens = Lexer::new("{\"a\":\n1}").tokenize().unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| (t.kind(), t.line())).collect();
/// assert_eq!(kinds, [
///     (TokenKind::LeftBrace, 1),
///     (TokenKind::String, 1),
///     (TokenKind::Colon, 1),
///     (TokenKind::Number, 2),
///     (TokenKind::RightBrace, 2),
///     (TokenKind::Eof, 2),
/// ]);
/// ```
pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Lexes the whole input.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Lexes the next token, returning `EOF` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] if the next token is malformed.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let Some(&byte) = self.bytes.get(self.pos) else {
            return Ok(Token::eof(self.line));
        };
        let line = self.line;
        let kind = match byte {
            b'{' => TokenKind::LeftBrace,
            b'}' => TokenKind::RightBrace,
            b'[' => TokenKind::LeftBracket,
            b']' => TokenKind::RightBracket,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'"' => return self.string(),
            b'-' | b'0'..=b'9' => return self.number(),
            b'a'..=b'z' | b'A'..=b'Z' => return self.literal(),
            _ => return Err(self.error(LexErrorKind::InvalidCharacter(self.current_char()))),
        };
        self.advance();
        Ok(Token::structural(kind, line))
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> char {
        self.src[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Moves past one byte. Columns advance once per character, so UTF-8
    /// continuation bytes do not count.
    fn advance(&mut self) {
        let byte = self.bytes[self.pos];
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            self.column += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.advance();
        }
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        self.pos - start
    }

    fn string(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let line = self.line;
        self.advance();
        loop {
            let Some(byte) = self.peek() else {
                return Err(self.error(LexErrorKind::UnterminatedString));
            };
            match byte {
                b'"' => {
                    self.advance();
                    break;
                }
                b'\\' => {
                    self.advance();
                    self.escape()?;
                }
                0x00..=0x1F => {
                    return Err(self.error(LexErrorKind::ControlCharacter(u32::from(byte))));
                }
                _ => self.advance(),
            }
        }
        Ok(Token::new(TokenKind::String, &self.src[start..self.pos], line))
    }

    fn escape(&mut self) -> Result<(), LexError> {
        let Some(byte) = self.peek() else {
            return Err(self.error(LexErrorKind::UnterminatedString));
        };
        match byte {
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                self.advance();
                Ok(())
            }
            b'u' => {
                self.advance();
                for _ in 0..4 {
                    match self.peek() {
                        Some(b) if b.is_ascii_hexdigit() => self.advance(),
                        _ => return Err(self.error(LexErrorKind::InvalidUnicodeEscape)),
                    }
                }
                Ok(())
            }
            _ => Err(self.error(LexErrorKind::InvalidEscape(self.current_char()))),
        }
    }

    fn number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let line = self.line;
        if self.peek() == Some(b'-') {
            self.advance();
        }
        match self.peek() {
            Some(b'0') => {
                self.advance();
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(self.error(LexErrorKind::InvalidNumber("leading zero")));
                }
            }
            Some(b'1'..=b'9') => {
                self.consume_digits();
            }
            _ => return Err(self.error(LexErrorKind::InvalidNumber("expected digit"))),
        }
        if self.peek() == Some(b'.') {
            self.advance();
            if self.consume_digits() == 0 {
                return Err(self.error(LexErrorKind::InvalidNumber("expected digit after '.'")));
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.advance();
            if let Some(b'+' | b'-') = self.peek() {
                self.advance();
            }
            if self.consume_digits() == 0 {
                return Err(self.error(LexErrorKind::InvalidNumber("expected exponent digits")));
            }
        }
        Ok(Token::new(TokenKind::Number, &self.src[start..self.pos], line))
    }

    fn literal(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        while let Some(b'a'..=b'z' | b'A'..=b'Z') = self.peek() {
            self.advance();
        }
        let word = &self.src[start..self.pos];
        let kind = match word {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => {
                return Err(LexError {
                    kind: LexErrorKind::InvalidLiteral(word.to_string()),
                    line,
                    column,
                });
            }
        };
        Ok(Token::new(kind, word, line))
    }
}
