//! CLI command implementations
//!
//! Every command except `contracts` loads the config first. `invoke` and
//! `serve` refuse to run against an uninitialized data directory.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::{info, warn};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_lines, write_json, write_response, InputLine};
use crate::dispatch::{DispatchError, Dispatcher, Invocation, Operation, Response};
use crate::logging::init_logging;
use crate::service::EntityService;
use crate::store::{FileLedger, LedgerStore, LEDGER_DIR, LEDGER_FILE};

pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Command::Init { config } => init(&config, &mut out),
        Command::Invoke {
            config,
            json,
            contract,
            function,
            args,
        } => {
            let invocation = match json {
                Some(json) => InvocationSource::Json(json),
                None => InvocationSource::Positional(Invocation {
                    contract: contract.unwrap_or_default(),
                    function: function.unwrap_or_default(),
                    args,
                }),
            };
            invoke(&config, invocation, &mut out)
        }
        Command::Serve { config } => {
            let stdin = io::stdin();
            serve(&config, stdin.lock(), &mut out)
        }
        Command::Contracts => contracts(&mut out),
    }
}

/// How a one-shot invocation was given on the command line.
#[derive(Debug, Clone)]
pub enum InvocationSource {
    Positional(Invocation),
    Json(String),
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(LEDGER_DIR).join(LEDGER_FILE).exists()
}

fn load(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);
    Ok(config)
}

/// Opens the ledger and wires the dispatcher.
pub fn open_dispatcher(config: &Config) -> CliResult<Dispatcher<FileLedger>> {
    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::NotInitialized(data_dir.display().to_string()));
    }

    let ledger = FileLedger::open(data_dir)?;
    info!(
        data_dir = %data_dir.display(),
        reference_mode = %config.reference_mode,
        "ledger ready"
    );
    Ok(Dispatcher::new(EntityService::new(
        ledger,
        config.reference_mode,
    )))
}

/// Creates the data directory and an empty ledger file.
pub fn init<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::AlreadyInitialized(data_dir.display().to_string()));
    }

    let ledger = FileLedger::open(data_dir)?;
    info!(path = %ledger.path().display(), "ledger initialized");

    write_json(
        out,
        &json!({
            "initialized": true,
            "ledger": ledger.path().display().to_string(),
        }),
    )
}

/// Runs one invocation and writes its response.
pub fn invoke<W: Write>(config_path: &Path, source: InvocationSource, out: &mut W) -> CliResult<()> {
    let config = load(config_path)?;
    let mut dispatcher = open_dispatcher(&config)?;

    let response = match source {
        InvocationSource::Positional(invocation) => dispatcher.handle(&invocation),
        InvocationSource::Json(json) => dispatcher.handle_json(&json),
    };
    write_response(out, &response)
}

/// Answers each input line with one response line until EOF.
pub fn serve<R: BufRead, W: Write>(config_path: &Path, input: R, out: &mut W) -> CliResult<()> {
    let config = load(config_path)?;
    let mut dispatcher = open_dispatcher(&config)?;
    let (handled, failed) = serve_lines(&mut dispatcher, input, out)?;
    info!(handled, failed, "input closed");
    Ok(())
}

/// Serving loop over any store. Returns (handled, failed) counts.
///
/// Only I/O failures on the streams themselves end the loop; a bad line gets
/// an error response like any other failed invocation.
pub fn serve_lines<S: LedgerStore, R: BufRead, W: Write>(
    dispatcher: &mut Dispatcher<S>,
    input: R,
    out: &mut W,
) -> CliResult<(usize, usize)> {
    let mut handled = 0;
    let mut failed = 0;

    for line in read_lines(input) {
        let response = match line? {
            InputLine::Text(text) => dispatcher.handle_json(&text),
            InputLine::NotUtf8 { line, error } => {
                let err = DispatchError::invalid_request(format!(
                    "input line {} is not valid UTF-8: {}",
                    line, error
                ));
                warn!(code = err.code(), line, "unreadable input line");
                Response::error(&err)
            }
        };
        handled += 1;
        if !response.is_success() {
            failed += 1;
        }
        write_response(out, &response)?;
    }

    Ok((handled, failed))
}

/// Operation catalog: one entry per contract function.
pub fn catalog() -> Value {
    Value::Array(
        Operation::all()
            .into_iter()
            .map(|op| {
                json!({
                    "contract": op.kind().collection(),
                    "function": op.function(),
                    "args": op.arity(),
                })
            })
            .collect(),
    )
}

pub fn contracts<W: Write>(out: &mut W) -> CliResult<()> {
    write_json(out, &catalog())
}
