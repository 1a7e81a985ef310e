mod report;

use hornchain::{LoadError, Options, Session};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HORNCHAIN_LOG";
const PROMPT: &str = "Query symbol (or end): ";
const END: &str = "end";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(CliError::Usage) => {
            eprintln!("{}", usage_line());
            std::process::exit(1);
        }
        Err(CliError::Invalid(err)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(config.verbose);

    let mut session = match Session::load(&config.path, &config.options) {
        Ok(session) => session,
        Err(LoadError::Config(err)) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("warning: {err}");
            match Session::empty(&config.options) {
                Ok(session) => session,
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(2);
                }
            }
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = report::print_summary(&mut out, session.summary(), config.color)
        .and_then(|()| run_queries(&mut session, stdin.lock(), &mut out, &config));
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    path: PathBuf,
    options: Options,
    color: bool,
    stats: bool,
    verbose: bool,
}

enum CliError {
    /// Wrong number of positional arguments.
    Usage,
    Invalid(String),
}

fn parse_args() -> Result<CliConfig, CliError> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from(args: impl IntoIterator<Item = String>) -> Result<CliConfig, CliError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut stats = false;
    let mut verbose = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("hornchain {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--stats" => stats = true,
            "-v" | "--verbose" => verbose = true,
            "--capacity" => {
                let value = args.next().ok_or_else(|| invalid("error: --capacity expects a value"))?;
                options.initial_capacity = parse_capacity(&value)?;
            }
            "--load-factor" => {
                let value = args.next().ok_or_else(|| invalid("error: --load-factor expects a value"))?;
                options.max_load_factor = parse_load_factor(&value)?;
            }
            "--" => {
                paths.extend(args.by_ref().map(PathBuf::from));
                break;
            }
            _ if arg.starts_with("--capacity=") => {
                options.initial_capacity = parse_capacity(arg.trim_start_matches("--capacity="))?;
            }
            _ if arg.starts_with("--load-factor=") => {
                options.max_load_factor = parse_load_factor(arg.trim_start_matches("--load-factor="))?;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(invalid(format!("error: unknown option '{arg}'")));
            }
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    if paths.len() != 1 {
        return Err(CliError::Usage);
    }
    let path = paths.remove(0);

    options.validate().map_err(|err| invalid(format!("error: {err}")))?;

    Ok(CliConfig { path, options, color, stats, verbose })
}

fn invalid(msg: impl Into<String>) -> CliError {
    CliError::Invalid(msg.into())
}

fn parse_capacity(value: &str) -> Result<usize, CliError> {
    value.parse().map_err(|_| invalid(format!("error: invalid --capacity '{value}' (expected a positive integer)")))
}

fn parse_load_factor(value: &str) -> Result<f64, CliError> {
    value.parse().map_err(|_| invalid(format!("error: invalid --load-factor '{value}' (expected a number in [0.1, 1))")))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).without_time().init();
}

/// Whitespace-delimited tokens pulled lazily from a line reader.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Tokens { reader, pending: VecDeque::new() }
    }

    /// Next token, or `None` at end of input.
    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// Prompt for query tokens until `end` or end of input, answering each.
fn run_queries(session: &mut Session, input: impl BufRead, out: &mut impl Write, config: &CliConfig) -> io::Result<()> {
    let mut tokens = Tokens::new(input);
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(query) = tokens.next_token()? else {
            writeln!(out)?;
            return Ok(());
        };
        if query == END {
            return Ok(());
        }

        let outcome = session.query(&query);
        report::print_answer(out, &outcome)?;
        if config.stats {
            report::print_stats(out, &outcome, config.color)?;
        }
    }
}

fn usage_line() -> String {
    "Usage: hornchain [OPTIONS] <knowledge-base-file>".to_string()
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "hornchain {version}

Propositional entailment by forward chaining.

{usage}

Reads a knowledge base (one fact `p1` or rule `p1 p2 THEN p3` per line), prints
a summary, then answers one query symbol at a time from stdin until `end`.

Options:
  --capacity <n>             Initial slots per table. Default: {capacity}
  --load-factor <f>          Load factor that triggers table growth, in [0.1, 1).
                             Default: {load}
  --stats                    Print per-query counters after each answer.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -v, --verbose              Log at debug level (overridden by {log_env}).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                 tracing filter, e.g. `debug` or `hornchain=trace`.

Exit codes:
  0  Success.
  1  Wrong number of arguments, or an I/O error while answering queries.
  2  Invalid option value.
",
        version = env!("CARGO_PKG_VERSION"),
        usage = usage_line(),
        capacity = hornchain::INITIAL_CAPACITY,
        load = hornchain::MAX_LOAD_FACTOR,
        log_env = LOG_ENV,
    )
}
