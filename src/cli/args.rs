//! CLI argument definitions using clap
//!
//! Commands:
//! - tradeledger init --config <path>
//! - tradeledger invoke --config <path> <contract> <function> [args...]
//! - tradeledger invoke --config <path> --json '<invocation>'
//! - tradeledger serve --config <path>
//! - tradeledger contracts

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tradeledger - validated trade-finance entity ledger
#[derive(Parser, Debug)]
#[command(name = "tradeledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new ledger data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./tradeledger.json")]
        config: PathBuf,
    },

    /// Execute a single invocation and exit
    Invoke {
        /// Path to configuration file
        #[arg(long, default_value = "./tradeledger.json")]
        config: PathBuf,

        /// Whole invocation as a JSON object instead of positional arguments
        #[arg(long, conflicts_with_all = ["contract", "function", "args"])]
        json: Option<String>,

        /// Contract (collection) name, e.g. wallet
        #[arg(required_unless_present = "json")]
        contract: Option<String>,

        /// Function name, e.g. newWallet
        #[arg(required_unless_present = "json")]
        function: Option<String>,

        /// Positional arguments, key first
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Read invocations from stdin, one JSON object per line
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tradeledger.json")]
        config: PathBuf,
    },

    /// List contracts, their operations and argument counts
    Contracts,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoke_positional() {
        let cli = Cli::try_parse_from([
            "tradeledger", "invoke", "--config", "c.json", "wallet", "newWallet", "W1", "500",
        ])
        .unwrap();
        match cli.command {
            Command::Invoke {
                config,
                json,
                contract,
                function,
                args,
            } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(json, None);
                assert_eq!(contract.as_deref(), Some("wallet"));
                assert_eq!(function.as_deref(), Some("newWallet"));
                assert_eq!(args, vec!["W1".to_string(), "500".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_invoke_json() {
        let cli = Cli::try_parse_from([
            "tradeledger",
            "invoke",
            "--json",
            r#"{"contract":"wallet","function":"getWallet","args":["W1"]}"#,
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Invoke { json: Some(_), .. }));
    }

    #[test]
    fn test_invoke_requires_target() {
        assert!(Cli::try_parse_from(["tradeledger", "invoke"]).is_err());
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["tradeledger", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./tradeledger.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
