//! CLI for the Google Calendar source.
//!
//! This crate provides the `gcal-source` command-line interface: source runs,
//! the OAuth callback endpoint, the authorization URL helper and
//! configuration inspection.

use std::path::{Path, PathBuf};

use gcal_source_core::init_tracing;
use tracing::debug;

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};

/// Loads the `.env` files for the selected mode from `dir`, then sets up
/// logging. Loading comes first so a `RUST_LOG` from those files applies.
pub fn init(cli: &Cli, dir: &Path) -> ClientResult<Vec<PathBuf>> {
    let loaded = env::load_env_files(dir, &cli.env_mode)?;
    init_tracing(cli.tracing_config())?;
    debug!(mode = %cli.env_mode, files = loaded.len(), "environment loaded");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn rust_log_from_env_file_sets_the_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "RUST_LOG=gcal_source=trace\n").unwrap();
        unsafe {
            std::env::remove_var("RUST_LOG");
        }

        let cli = Cli::try_parse_from(["gcal-source", "--env", "none", "source"]).unwrap();
        let loaded = init(&cli, dir.path()).unwrap();

        assert_eq!(loaded, vec![dir.path().join(".env")]);
        assert!(tracing::enabled!(target: "gcal_source_client", tracing::Level::TRACE));
    }
}
