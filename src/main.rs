//! tradeledger CLI entry point
//!
//! Parses arguments, runs the command, prints CLI failures to stderr and
//! exits non-zero. Invocation failures are part of the normal output.

use tradeledger::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
