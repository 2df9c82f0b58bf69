use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use lox_lexer::{ConsoleReporter, Token};
use std::io::{self, BufRead, Write};
use std::path::Path;

// sysexits(3)
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_NOINPUT: i32 = 66;
const EX_IOERR: i32 = 74;

#[derive(Parser)]
#[command(name = "lox")]
#[command(about = "Lox scanner: turns .lox source into tokens")]
#[command(version)]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a .lox file (or interactive input) and print its tokens
    Tokens {
        /// Input .lox file; reads from the prompt when omitted
        #[arg(value_name = "PATH")]
        paths: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Scan a .lox file (or interactive input) and only report errors
    Check {
        /// Input .lox file; reads from the prompt when omitted
        #[arg(value_name = "PATH")]
        paths: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One `KIND lexeme literal` line per token
    Text,
    /// A JSON array of tokens
    Json,
}

/// Everything that ends a run early, each with its own exit status.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Usage: lox [filename].lox")]
    Usage,

    #[error("Error reading {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Error reading input: {0}")]
    Prompt(io::Error),

    #[error("{0} lexical error(s)")]
    Lexical(usize),

    #[error("Error encoding tokens: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Error writing tokens: {0}")]
    Write(io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage => EX_USAGE,
            CliError::Read { .. } => EX_NOINPUT,
            CliError::Lexical(_) => EX_DATAERR,
            CliError::Prompt(_) | CliError::Encode(_) | CliError::Write(_) => EX_IOERR,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Tokens { paths, format } => cmd_tokens(&paths, format),
        Command::Check { paths } => cmd_check(&paths),
    };

    if let Err(e) = result {
        // Lexical errors were already written by the reporter.
        if !matches!(e, CliError::Lexical(_)) {
            eprintln!("{e}");
        }
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// At most one input path is accepted.
fn single_path(paths: &[String]) -> Result<Option<&str>, CliError> {
    match paths {
        [] => Ok(None),
        [path] => Ok(Some(path.as_str())),
        _ => Err(CliError::Usage),
    }
}

fn has_lox_extension(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|ext| ext == "lox")
}

fn read_source(path: Option<&str>) -> Result<String, CliError> {
    let Some(path) = path else {
        let stdin = io::stdin();
        let stdout = io::stdout();
        return read_prompt(stdin.lock(), stdout.lock()).map_err(CliError::Prompt);
    };

    if !has_lox_extension(path) {
        return Err(CliError::Usage);
    }

    log::debug!("reading {path}");
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

/// Read lines after a `> ` prompt until an empty line or end of input.
/// Every collected line is newline-terminated in the result.
fn read_prompt<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    let mut buffer = String::new();
    let mut line = String::new();

    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            break;
        }
        buffer.push_str(text);
        buffer.push('\n');
    }

    Ok(buffer)
}

/// Scan `source`, writing lexical errors to `errors`.
fn scan<W: Write>(source: &str, errors: W) -> Result<Vec<Token>, CliError> {
    let mut reporter = ConsoleReporter::with_writer(errors);
    let tokens = lox_lexer::scan_tokens(source, &mut reporter);
    let count = reporter.error_count();
    if count > 0 {
        return Err(CliError::Lexical(count));
    }
    Ok(tokens)
}

fn render_tokens(tokens: &[Token], format: Format) -> Result<String, CliError> {
    match format {
        Format::Text => Ok(tokens
            .iter()
            .map(|t| format!("{t}\n"))
            .collect::<String>()),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(tokens)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Scan and render; nothing is rendered when the scan reported errors.
fn tokens_output<W: Write>(
    source: &str,
    format: Format,
    errors: W,
) -> Result<String, CliError> {
    let tokens = scan(source, errors)?;
    render_tokens(&tokens, format)
}

fn cmd_tokens(paths: &[String], format: Format) -> Result<(), CliError> {
    let source = read_source(single_path(paths)?)?;
    let rendered = tokens_output(&source, format, io::stderr())?;

    io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(CliError::Write)
}

fn cmd_check(paths: &[String]) -> Result<(), CliError> {
    let path = single_path(paths)?;
    let source = read_source(path)?;
    let tokens = scan(&source, io::stderr())?;
    log::debug!("{} tokens", tokens.len());

    eprintln!("OK: {}", path.unwrap_or("<stdin>"));
    Ok(())
}
