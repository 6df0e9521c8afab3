//! Configuration commands.

use gcal_source_providers::google::{
    ACCESS_TOKEN_KEY, CLIENT_ID_KEY, CLIENT_SECRET_KEY, TokenStore,
};

use crate::commands::serve::server_config;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration and report which secrets are present.
pub fn validate(config: &ClientConfig, store: &dyn TokenStore) -> ClientResult<()> {
    for line in check(config, store)? {
        println!("{}", line);
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Runs every configuration check and returns the status lines.
pub fn check(config: &ClientConfig, store: &dyn TokenStore) -> ClientResult<Vec<String>> {
    let mut lines = Vec::new();

    match config.source.calendar_ids() {
        Some(ids) => lines.push(format!("Calendars: {}", ids.join(", "))),
        None => lines.push("Calendars: all calendars of the authorized account".to_string()),
    }
    if config.source.options.contains_key("calendarId") {
        lines.push(
            "warning: source.options.calendarId is ignored; use source.calendar_id or \
             source.calendar_ids"
                .to_string(),
        );
    }

    let server = server_config(config, None)?;
    lines.push(format!(
        "Callback endpoint: http://{}{}",
        server.bind_addr, server.callback_path
    ));

    for key in [CLIENT_ID_KEY, CLIENT_SECRET_KEY, ACCESS_TOKEN_KEY] {
        let state = if store.lookup(key).is_some() {
            "set"
        } else {
            "missing"
        };
        lines.push(format!("{}: {}", key, state));
    }

    Ok(lines)
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}
