//! CLI module for the report review service
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `check`: one-shot similarity check against the configured backends

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// Report review service - similar-report check over the report store
#[derive(Parser)]
#[command(name = "report-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Run a single similarity check and print the result as JSON
    Check(check::CheckArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from(["report-review", "check", "glass", "jar"]).unwrap();

        match cli.command {
            Command::Check(args) => assert_eq!(args.query(), "glass jar"),
            Command::Serve => panic!("expected check command"),
        }
    }

    #[test]
    fn test_check_requires_query() {
        assert!(Cli::try_parse_from(["report-review", "check"]).is_err());
    }
}
