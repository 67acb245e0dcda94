mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use rdpjson::{
    BuiltinTokenizer, CommandTokenizer, DEFAULT_MAX_DEPTH, Error, ParserOptions,
    RecordFileTokenizer, Tokenizer, records, validate_file,
};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Validate a JSON document with a predictive recursive-descent parser.
#[derive(Parser, Debug)]
#[command(name = "rdpjson", version, about)]
struct Cli {
    /// Path to the document to validate
    file: PathBuf,

    /// External tokenizer, run as `PROGRAM FILE`, that prints token records
    #[arg(long, env = "RDPJSON_TOKENIZER", value_name = "PROGRAM", conflicts_with = "records")]
    tokenizer: Option<PathBuf>,

    /// Treat FILE as token records instead of JSON text
    #[arg(long)]
    records: bool,

    /// Reject a comma directly before `}` or `]`
    #[arg(long)]
    strict: bool,

    /// Maximum nesting depth of objects and arrays (0 for no limit)
    #[arg(long, env = "RDPJSON_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Output format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Print the token records for FILE instead of validating it
    #[arg(long)]
    dump_tokens: bool,

    /// Enable debug logging and print a summary on success
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ParserOptions {
        ParserOptions {
            reject_trailing_commas: self.strict,
            max_depth: (self.max_depth > 0).then_some(self.max_depth),
        }
    }

    fn tokenizer(&self) -> Box<dyn Tokenizer> {
        match (&self.tokenizer, self.records) {
            (Some(program), _) => Box::new(CommandTokenizer::new(program.as_os_str())),
            (None, true) => Box::new(RecordFileTokenizer),
            (None, false) => Box::new(BuiltinTokenizer),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let tokenizer = cli.tokenizer();
    debug!(file = %cli.file.display(), options = ?cli.options(), "validating");

    if cli.dump_tokens {
        return match tokenizer.tokenize(&cli.file) {
            Ok(tokens) => {
                print!("{}", records::encode(&tokens));
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                report::failure(cli.output, &cli.file, &Error::Tokenize(err))?;
                eprintln!("{}", Cli::command().render_usage());
                Ok(ExitCode::FAILURE)
            }
        };
    }

    match validate_file(&cli.file, tokenizer.as_ref(), cli.options()) {
        Ok(summary) => {
            report::success(cli.output, &cli.file, &summary, cli.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report::failure(cli.output, &cli.file, &err)?;
            if matches!(err, Error::Tokenize(_)) {
                eprintln!("{}", Cli::command().render_usage());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
