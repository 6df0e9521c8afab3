//! Command-line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gcal_source_core::TracingConfig;

use crate::env::{DEFAULT_ENV_MODE, ENV_MODE_VAR};

/// gcal-source - Google Calendar content nodes
#[derive(Debug, Parser)]
#[command(name = "gcal-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "GCAL_SOURCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Environment mode; loads `.env.<mode>` before `.env`
    #[arg(long = "env", env = ENV_MODE_VAR, default_value = DEFAULT_ENV_MODE)]
    pub env_mode: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Logging preset for this invocation.
    ///
    /// `--debug` wins; `serve` logs at info so the callback output is visible.
    pub fn tracing_config(&self) -> TracingConfig {
        if self.debug {
            TracingConfig::cli_debug()
        } else if matches!(self.command, Command::Serve { .. }) {
            TracingConfig::callback_server()
        } else {
            TracingConfig::default()
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch calendars and events and print them as content nodes
    Source {
        /// Write the nodes to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only fetch events from now on (sets `timeMin` unless configured)
        #[arg(long)]
        from_now: bool,
    },

    /// Run the OAuth callback endpoint in the foreground
    Serve {
        /// Listen address (defaults to loopback on the redirect URI port)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Print the authorization URL
    AuthUrl {
        /// Also open the URL in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Validate the configuration and report missing credentials
    Validate,
    /// Show the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_source_command() {
        let cli = Cli::try_parse_from([
            "gcal-source",
            "--env",
            "production",
            "source",
            "--from-now",
            "-o",
            "nodes.json",
        ])
        .unwrap();

        assert_eq!(cli.env_mode, "production");
        match cli.command {
            Command::Source { output, from_now } => {
                assert!(from_now);
                assert_eq!(output, Some(PathBuf::from("nodes.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_serve_and_auth_url() {
        let cli =
            Cli::try_parse_from(["gcal-source", "serve", "--bind", "127.0.0.1:9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Serve { bind: Some(addr) } if addr.port() == 9000
        ));

        let cli = Cli::try_parse_from(["gcal-source", "-v", "auth-url", "--open"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::AuthUrl { open: true }));
    }

    #[test]
    fn parse_config_actions() {
        let cli = Cli::try_parse_from(["gcal-source", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Validate
            }
        ));
    }

    #[test]
    fn tracing_preset_follows_flags_and_command() {
        let cli = Cli::try_parse_from(["gcal-source", "source"]).unwrap();
        assert_eq!(
            cli.tracing_config().default_level,
            TracingConfig::default().default_level
        );

        let cli = Cli::try_parse_from(["gcal-source", "serve"]).unwrap();
        assert_eq!(
            cli.tracing_config().default_level,
            TracingConfig::callback_server().default_level
        );

        let cli = Cli::try_parse_from(["gcal-source", "--debug", "serve"]).unwrap();
        assert_eq!(
            cli.tracing_config().default_level,
            TracingConfig::cli_debug().default_level
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["gcal-source"]).is_err());
    }
}
