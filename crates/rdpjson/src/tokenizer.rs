//! Sources of token sequences.
//!
//! The grammar engine treats the tokenizer as an opaque collaborator invoked
//! once per document. [`Tokenizer`] is that seam; the implementations here
//! cover the built-in lexer, pre-tokenized record files and external
//! tokenizer programs that print records on stdout.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;
use tracing::debug;

use crate::{
    lexer::{LexError, Lexer},
    records::{self, RecordError},
    token::Token,
};

/// Failure to obtain tokens for a document. Never a grammar error.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// The document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The external tokenizer could not be started.
    #[error("failed to run tokenizer `{}`: {source}", program.to_string_lossy())]
    Spawn {
        /// The program that was run.
        program: OsString,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The external tokenizer exited unsuccessfully.
    #[error("tokenizer `{}` exited with {status}: {}", program.to_string_lossy(), stderr.trim_end())]
    Failed {
        /// The program that was run.
        program: OsString,
        /// Its exit status.
        status: ExitStatus,
        /// Everything it wrote to stderr.
        stderr: String,
    },
    /// The external tokenizer wrote non-UTF-8 bytes to stdout.
    #[error("tokenizer output is not valid UTF-8")]
    NonUtf8Output,
    /// The built-in lexer rejected the text.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token records were malformed.
    #[error(transparent)]
    Records(#[from] RecordError),
}

/// Produces the token sequence for the document at `path`.
///
/// Implementations must return tokens in source order, terminated by a
/// single `EOF` token.
pub trait Tokenizer {
    /// Tokenizes the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizeError`] if the document cannot be read or
    /// tokenized.
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError> {
        (**self).tokenize(path)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError> {
        (**self).tokenize(path)
    }
}

fn read(path: &Path) -> Result<String, TokenizeError> {
    fs::read_to_string(path).map_err(|source| TokenizeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads JSON text and lexes it with [`Lexer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTokenizer;

impl Tokenizer for BuiltinTokenizer {
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError> {
        let src = read(path)?;
        Ok(Lexer::new(&src).tokenize()?)
    }
}

/// Reads a document that is already in token-record form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFileTokenizer;

impl Tokenizer for RecordFileTokenizer {
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError> {
        Ok(records::decode(&read(path)?)?)
    }
}

/// Runs an external program and decodes token records from its stdout.
///
/// The document path is passed as the final argument.
///
/// ```rust,no_run
/// use std::path::Path;
/// use rdpjson::{CommandTokenizer, Tokenizer};
///
/// let lexer = CommandTokenizer::new("./lexer").arg("--records");
/// let tokens = lexer.tokenize(Path::new("input.json"))?;
/// # Ok::<(), rdpjson::TokenizeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandTokenizer {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandTokenizer {
    /// A tokenizer that runs `program <path>`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds an argument placed before the document path.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Tokenizer for CommandTokenizer {
    fn tokenize(&self, path: &Path) -> Result<Vec<Token>, TokenizeError> {
        debug!(program = ?self.program, args = ?self.args, path = %path.display(), "running tokenizer");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| TokenizeError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(TokenizeError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let stdout = String::from_utf8(output.stdout).map_err(|_| TokenizeError::NonUtf8Output)?;
        let tokens = records::decode(&stdout)?;
        debug!(tokens = tokens.len(), "tokenizer finished");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::token::TokenKind;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_reads_and_lexes() {
        let file = file_with("[1,\n2]");
        let tokens = BuiltinTokenizer.tokenize(file.path()).unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[3].line(), 2);
    }

    #[test]
    fn builtin_surfaces_lex_errors() {
        let file = file_with("[1, ?]");
        let err = BuiltinTokenizer.tokenize(file.path()).unwrap_err();
        assert!(matches!(err, TokenizeError::Lex(_)), "{err:?}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = BuiltinTokenizer
            .tokenize(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, TokenizeError::Read { .. }), "{err:?}");
        assert!(err.to_string().starts_with("failed to read /definitely/not/here.json"));
    }

    #[test]
    fn record_file_tokenizer_decodes() {
        let file = file_with("LBRACKET\x07[\x071\nRBRACKET\x07]\x071\nEOF\x07\x071\n");
        let tokens = RecordFileTokenizer.tokenize(file.path()).unwrap();
        assert_eq!(tokens[1].kind(), TokenKind::RightBracket);
    }

    #[test]
    fn unknown_program_fails_to_spawn() {
        let file = file_with("[]");
        let err = CommandTokenizer::new("rdpjson-no-such-tokenizer")
            .tokenize(file.path())
            .unwrap_err();
        assert!(matches!(err, TokenizeError::Spawn { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn command_output_is_decoded() {
        // `cat` echoes a record file, which makes it a stand-in tokenizer.
        let file = file_with("LBRACE\x07{\x071\nRBRACE\x07}\x071\nEOF\x07\x071\n");
        let tokens = CommandTokenizer::new("cat").tokenize(file.path()).unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[2].is_eof());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_reported() {
        let file = file_with("[]");
        let err = CommandTokenizer::new("sh")
            .arg("-c")
            .arg("echo boom >&2; exit 3")
            .tokenize(file.path())
            .unwrap_err();
        match err {
            TokenizeError::Failed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn malformed_command_output_is_a_record_error() {
        let file = file_with("[]");
        let err = CommandTokenizer::new("echo").tokenize(file.path()).unwrap_err();
        assert!(matches!(err, TokenizeError::Records(_)), "{err:?}");
    }
}
