//! gcal-source CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use gcal_source_client::cli::{Cli, Command, ConfigAction};
use gcal_source_client::commands;
use gcal_source_client::config::ClientConfig;
use gcal_source_client::error::ClientResult;
use gcal_source_providers::google::EnvTokenStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    gcal_source_client::init(&cli, &std::env::current_dir()?)?;

    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    let store = EnvTokenStore;

    match cli.command {
        Command::Source { output, from_now } => {
            commands::source::run(&config, &store, output.as_deref(), from_now).await?;
            Ok(())
        }
        Command::Serve { bind } => commands::serve::run(&config, &store, bind).await,
        Command::AuthUrl { open } => {
            commands::auth::auth_url(&config, &store, open)?;
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config, &store),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
