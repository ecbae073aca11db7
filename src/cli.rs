//! Command line interface for recruitd, built on clap.
//!
//! Subcommands are [`Command::Serve`], [`Command::Transitions`] and
//! [`Command::Demo`]; `--config` and `--verbose` are global.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::lifecycle::EntityType;

/// recruitd: batch lifecycle mutations for recruiting records, with rollback.
#[derive(Debug, Parser)]
#[command(name = "recruitd", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the TOML config file (default: ./recruitd.toml if present).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Listen address, overriding the config file and RECRUITD_BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the statuses reachable from a given status.
    Transitions {
        /// `job` or `candidate`.
        #[arg(value_parser = parse_entity_type)]
        entity_type: EntityType,

        /// Current status, e.g. `draft` or `on-hold`.
        status: String,
    },

    /// Run an in-memory bulk activation followed by its rollback.
    Demo,
}

fn parse_entity_type(raw: &str) -> Result<EntityType, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_serve_with_bind() {
        let cli = Cli::parse_from(["recruitd", "serve", "--bind", "0.0.0.0:9000"]);
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
            _ => panic!("expected Serve command"),
        }
    }

    #[test]
    fn cli_parses_transitions() {
        let cli = Cli::parse_from(["recruitd", "transitions", "candidate", "on-hold"]);
        match cli.command {
            Command::Transitions {
                entity_type,
                status,
            } => {
                assert_eq!(entity_type, EntityType::Candidate);
                assert_eq!(status, "on-hold");
            }
            _ => panic!("expected Transitions command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_entity_type() {
        assert!(Cli::try_parse_from(["recruitd", "transitions", "invoice", "draft"]).is_err());
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["recruitd", "--config", "/etc/recruitd.toml", "-v", "demo"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/recruitd.toml")));
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
