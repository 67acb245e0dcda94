//! Lexical tokens as handed to the grammar engine.
//!
//! Tokens come from an external tokenizer (or the built-in [`Lexer`]) and are
//! never modified afterwards. The engine only looks at the [`TokenKind`];
//! the lexeme and line are carried for diagnostics and for round-tripping the
//! token-record format.
//!
//! [`Lexer`]: crate::Lexer

use core::fmt;

/// The closed set of lexical classes understood by the JSON grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TokenKind {
    /// A quoted string literal.
    String,
    /// A numeric literal.
    Number,
    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// The `null` literal.
    Null,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// End of input. Terminates every well-formed token sequence.
    Eof,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 12] = [
        TokenKind::String,
        TokenKind::Number,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::LeftBracket,
        TokenKind::RightBracket,
        TokenKind::Colon,
        TokenKind::Comma,
        TokenKind::Eof,
    ];

    /// The single character spelled by a structural token, if this is one.
    #[must_use]
    pub const fn punctuator(self) -> Option<char> {
        match self {
            TokenKind::LeftBrace => Some('{'),
            TokenKind::RightBrace => Some('}'),
            TokenKind::LeftBracket => Some('['),
            TokenKind::RightBracket => Some(']'),
            TokenKind::Colon => Some(':'),
            TokenKind::Comma => Some(','),
            _ => None,
        }
    }

    /// Classifies a lexeme as one of the six structural tokens.
    #[must_use]
    pub fn from_punctuator(lexeme: &str) -> Option<Self> {
        match lexeme {
            "{" => Some(TokenKind::LeftBrace),
            "}" => Some(TokenKind::RightBrace),
            "[" => Some(TokenKind::LeftBracket),
            "]" => Some(TokenKind::RightBracket),
            ":" => Some(TokenKind::Colon),
            "," => Some(TokenKind::Comma),
            _ => None,
        }
    }

    /// Name used for this kind in the token-record format.
    #[must_use]
    pub const fn record_name(self) -> &'static str {
        match self {
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Eof => "EOF",
        }
    }

    /// Inverse of [`TokenKind::record_name`].
    #[must_use]
    pub fn from_record_name(name: &str) -> Option<Self> {
        TokenKind::ALL
            .into_iter()
            .find(|kind| kind.record_name() == name)
    }

    pub(crate) const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.punctuator() {
            Some(ch) => write!(f, "{ch}"),
            None => f.write_str(self.record_name()),
        }
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: usize,
}

impl Token {
    /// Creates a token from its three parts.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// A structural token whose lexeme is its own punctuator, or an `EOF`
    /// token with an empty lexeme.
    ///
    /// # Panics
    ///
    /// Panics if `kind` carries a literal (strings, numbers, `true`,
    /// `false`, `null`); those need an explicit lexeme.
    #[must_use]
    pub fn structural(kind: TokenKind, line: usize) -> Self {
        let lexeme = match (kind, kind.punctuator()) {
            (_, Some(ch)) => ch.to_string(),
            (TokenKind::Eof, None) => String::new(),
            (other, None) => panic!("{other} is not a structural token"),
        };
        Self { kind, lexeme, line }
    }

    /// The end-of-input marker.
    #[must_use]
    pub fn eof(line: usize) -> Self {
        Self::structural(TokenKind::Eof, line)
    }

    /// Lexical class.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Source text of the token.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` (line {})", self.kind.record_name(), self.lexeme, self.line)
    }
}
