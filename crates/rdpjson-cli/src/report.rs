//! Rendering of validation outcomes for the terminal or for machines.

use std::io::{self, Write};
use std::path::Path;

use rdpjson::{Error, ParseError, Rule, Summary};
use serde::Serialize;

use crate::OutputFormat;

#[derive(Serialize)]
struct Report<'a> {
    ok: bool,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    expected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<Rule>,
    message: String,
}

impl ErrorReport {
    fn new(err: &Error) -> Self {
        match err {
            Error::Parse(ParseError::Syntax(syntax)) => Self {
                kind: "syntax",
                line: Some(syntax.line),
                expected: syntax.expected.iter().map(|kind| kind.to_string()).collect(),
                found: Some(syntax.found.to_string()),
                rule: Some(syntax.rule),
                message: syntax.to_string(),
            },
            Error::Parse(depth @ ParseError::DepthLimitExceeded { line, .. }) => Self {
                kind: "depth_limit",
                line: Some(*line),
                expected: Vec::new(),
                found: None,
                rule: None,
                message: depth.to_string(),
            },
            Error::Tokenize(tokenize) => Self {
                kind: "tokenize",
                line: None,
                expected: Vec::new(),
                found: None,
                rule: None,
                message: tokenize.to_string(),
            },
        }
    }
}

fn write_json(report: &Report<'_>) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, report)?;
    writeln!(stdout)?;
    Ok(())
}

/// Reports a successful validation. Text output is silent unless `verbose`.
pub(crate) fn success(
    format: OutputFormat,
    file: &Path,
    summary: &Summary,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if verbose {
                println!(
                    "{}: ok ({} tokens, {} objects, {} arrays, {} pairs, {} values, depth {})",
                    file.display(),
                    summary.tokens,
                    summary.objects,
                    summary.arrays,
                    summary.pairs,
                    summary.values,
                    summary.max_depth
                );
            }
            Ok(())
        }
        OutputFormat::Json => write_json(&Report {
            ok: true,
            file: file.display().to_string(),
            summary: Some(summary),
            error: None,
        }),
    }
}

/// Reports a failed validation: one diagnostic line on stderr for text,
/// one JSON object on stdout for json.
pub(crate) fn failure(format: OutputFormat, file: &Path, err: &Error) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            match err {
                Error::Parse(parse) => eprintln!("{}", parse.diagnostic()),
                Error::Tokenize(tokenize) => eprintln!("error: {tokenize}"),
            }
            Ok(())
        }
        OutputFormat::Json => write_json(&Report {
            ok: false,
            file: file.display().to_string(),
            summary: None,
            error: Some(ErrorReport::new(err)),
        }),
    }
}
