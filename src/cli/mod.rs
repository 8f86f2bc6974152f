//! Command-line host
//!
//! - init: create the data directory and an empty ledger
//! - invoke: run one invocation and exit
//! - serve: answer JSON invocations from stdin until EOF
//! - contracts: print the operation catalog

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    catalog, contracts, init, invoke, open_dispatcher, run, run_command, serve, serve_lines,
    InvocationSource,
};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{read_lines, write_json, write_response, InputLine, InputLines};
