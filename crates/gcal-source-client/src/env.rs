//! `.env` file loading.
//!
//! Secrets are read from the process environment. Before that, the CLI loads
//! `.env.<mode>` and then `.env` from the working directory. Variables that
//! are already set are never overridden, so the shell environment wins over
//! both files and the mode file wins over `.env`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Environment variable selecting the `.env.<mode>` file.
pub const ENV_MODE_VAR: &str = "GCAL_SOURCE_ENV";

/// Mode used when neither `--env` nor `GCAL_SOURCE_ENV` is given.
pub const DEFAULT_ENV_MODE: &str = "development";

/// Returns the files considered for `mode`, in load order.
pub fn env_files(dir: &Path, mode: &str) -> Vec<PathBuf> {
    vec![dir.join(format!(".env.{}", mode)), dir.join(".env")]
}

/// Loads the `.env` files for `mode` from `dir`.
///
/// Missing files are skipped. Returns the files that were loaded.
pub fn load_env_files(dir: &Path, mode: &str) -> ClientResult<Vec<PathBuf>> {
    let mut loaded = Vec::new();
    for path in env_files(dir, mode) {
        if !path.is_file() {
            continue;
        }
        dotenvy::from_path(&path).map_err(|e| ClientError::EnvFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded environment file");
        loaded.push(path);
    }
    Ok(loaded)
}
