//! The token-record format exchanged with external tokenizers.
//!
//! One token per line, three fields separated by BEL (`\x07`):
//!
//! ```text
//! KIND<BEL>LEXEME<BEL>LINE
//! ```
//!
//! Literal classes and `EOF` are identified by name. Structural tokens are
//! identified by their lexeme, whatever the kind field says, because
//! tokenizers are free to name punctuation as they like. [`encode`] writes the
//! names from [`TokenKind::record_name`].

use core::fmt::Write;

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Field separator within a record.
pub const FIELD_SEPARATOR: char = '\x07';

/// A malformed token-record document. `record` is the 1-based line of the
/// document, not the source line stored inside the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A record has fewer than three fields.
    #[error("record {record}: missing {field} field")]
    MissingField {
        /// Record number.
        record: usize,
        /// Name of the first absent field.
        field: &'static str,
    },
    /// The line field is not a positive integer.
    #[error("record {record}: invalid line number `{value}`")]
    InvalidLine {
        /// Record number.
        record: usize,
        /// The field as written.
        value: String,
    },
    /// Neither the kind nor the lexeme names a token kind.
    #[error("record {record}: unknown token kind `{kind}` with lexeme `{lexeme}`")]
    UnknownKind {
        /// Record number.
        record: usize,
        /// The kind field as written.
        kind: String,
        /// The lexeme field as written.
        lexeme: String,
    },
    /// A record follows the `EOF` record.
    #[error("record {record}: tokens after EOF")]
    TrailingRecords {
        /// Number of the first record after `EOF`.
        record: usize,
    },
    /// The document is empty or its last record is not `EOF`.
    #[error("token records do not end with EOF")]
    MissingEof,
}

/// Decodes a token-record document.
///
/// Empty lines are ignored. The document must contain exactly one `EOF`
/// record, and it must come last.
///
/// # Errors
///
/// Returns a [`RecordError`] describing the first malformed record.
pub fn decode(input: &str) -> Result<Vec<Token>, RecordError> {
    let mut tokens = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let record = idx + 1;
        if raw.is_empty() {
            continue;
        }
        if tokens.last().is_some_and(Token::is_eof) {
            return Err(RecordError::TrailingRecords { record });
        }
        tokens.push(decode_record(record, raw)?);
    }
    if tokens.last().is_some_and(Token::is_eof) {
        Ok(tokens)
    } else {
        Err(RecordError::MissingEof)
    }
}

fn decode_record(record: usize, raw: &str) -> Result<Token, RecordError> {
    let (kind, rest) = raw
        .split_once(FIELD_SEPARATOR)
        .ok_or(RecordError::MissingField {
            record,
            field: "lexeme",
        })?;
    let (lexeme, line) = rest
        .rsplit_once(FIELD_SEPARATOR)
        .ok_or(RecordError::MissingField {
            record,
            field: "line",
        })?;
    // Lines are 1-based.
    let line = line
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&line| line > 0)
        .ok_or_else(|| RecordError::InvalidLine {
            record,
            value: line.to_string(),
        })?;
    let resolved = match TokenKind::from_record_name(kind) {
        Some(named) if named.punctuator().is_none() => Some(named),
        named => TokenKind::from_punctuator(lexeme).or(named),
    };
    match resolved {
        Some(kind) => Ok(Token::new(kind, lexeme, line)),
        None => Err(RecordError::UnknownKind {
            record,
            kind: kind.to_string(),
            lexeme: lexeme.to_string(),
        }),
    }
}

/// Encodes tokens as a token-record document, one record per line.
#[must_use]
pub fn encode(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            token.kind().record_name(),
            token.lexeme(),
            token.line()
        );
    }
    out
}
