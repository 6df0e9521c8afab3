//! The `source` command.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use gcal_source_core::ContentNode;
use gcal_source_providers::google::{OAuthClient, TokenStore};
use gcal_source_providers::{CalendarApi, SourceReport, source_nodes};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Runs a complete source pass and writes the nodes.
///
/// Fails before any network call when credentials are missing, and with the
/// authorization URL when no access token is stored.
pub async fn run(
    config: &ClientConfig,
    store: &dyn TokenStore,
    output: Option<&Path>,
    from_now: bool,
) -> ClientResult<SourceReport> {
    let google = config.google.to_provider_config()?;
    let oauth = OAuthClient::from_store(google, store)?;
    let api = oauth.ensure_authorized(store)?;

    let (nodes, report) = collect(&api, config, from_now).await?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_nodes(&nodes, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), nodes = nodes.len(), "wrote nodes");
        }
        None => {
            let stdout = io::stdout();
            write_nodes(&nodes, &mut stdout.lock())?;
        }
    }

    Ok(report)
}

/// Sources every configured calendar into an in-memory node list.
pub async fn collect(
    api: &dyn CalendarApi,
    config: &ClientConfig,
    from_now: bool,
) -> ClientResult<(Vec<ContentNode>, SourceReport)> {
    let options = config
        .source
        .to_source_options(from_now.then(Utc::now));
    let ids = config.source.node_id_factory();

    let mut nodes: Vec<ContentNode> = Vec::new();
    let report = source_nodes(api, &options, &ids, &mut nodes).await?;
    Ok((nodes, report))
}

/// Writes nodes as a pretty-printed JSON array followed by a newline.
pub fn write_nodes(nodes: &[ContentNode], writer: &mut dyn Write) -> ClientResult<()> {
    serde_json::to_writer_pretty(&mut *writer, nodes)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gcal_source_providers::google::{
        ACCESS_TOKEN_KEY, CLIENT_ID_KEY, CLIENT_SECRET_KEY, MemoryTokenStore,
    };
    use gcal_source_providers::{
        BoxFuture, Calendar, Event, EventQuery, ProviderError, ProviderErrorCode, ProviderResult,
    };
    use serde_json::Value;

    use super::*;
    use crate::error::ClientError;

    /// In-memory calendar backend.
    #[derive(Default)]
    struct StaticApi {
        calendars: Vec<Calendar>,
        events: HashMap<String, Vec<Event>>,
    }

    impl CalendarApi for StaticApi {
        fn get_calendar<'a>(
            &'a self,
            calendar_id: &'a str,
        ) -> BoxFuture<'a, ProviderResult<Calendar>> {
            let found = self.calendars.iter().find(|c| c.id == calendar_id).cloned();
            Box::pin(async move {
                found.ok_or_else(|| ProviderError::not_found(calendar_id.to_string()))
            })
        }

        fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<Calendar>>> {
            let calendars = self.calendars.clone();
            Box::pin(async move { Ok(calendars) })
        }

        fn list_events<'a>(
            &'a self,
            calendar_id: &'a str,
            _query: &'a EventQuery,
        ) -> BoxFuture<'a, ProviderResult<Vec<Event>>> {
            let events = self.events.get(calendar_id).cloned().unwrap_or_default();
            Box::pin(async move { Ok(events) })
        }
    }

    fn provider_code(err: ClientError) -> ProviderErrorCode {
        match err {
            ClientError::Provider(e) => e.code(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_fetching() {
        let store = MemoryTokenStore::new().with(ACCESS_TOKEN_KEY, "ya29");
        let err = run(&ClientConfig::default(), &store, None, false)
            .await
            .unwrap_err();
        assert_eq!(provider_code(err), ProviderErrorCode::ConfigurationError);
    }

    #[tokio::test]
    async fn missing_token_asks_for_authorization() {
        let store = MemoryTokenStore::new()
            .with(CLIENT_ID_KEY, "id")
            .with(CLIENT_SECRET_KEY, "secret");
        let err = run(&ClientConfig::default(), &store, None, false)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert_eq!(provider_code(err), ProviderErrorCode::AuthorizationRequired);
        assert!(message.contains("https://accounts.google.com/o/oauth2/v2/auth?"));
    }

    #[tokio::test]
    async fn collect_uses_configured_calendars() {
        let mut api = StaticApi::default();
        api.calendars = vec![
            Calendar::new("primary").with_field("summary", "Me"),
            Calendar::new("team").with_field("summary", "Team"),
        ];
        api.events
            .insert("team".into(), vec![Event::new("standup").with_field("summary", "Standup")]);

        let mut config = ClientConfig::default();
        config.source.calendar_id = Some("team".into());

        let (nodes, report) = collect(&api, &config, false).await.unwrap();
        assert_eq!(report.calendars, 1);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].fields["summary"], Value::from("Team"));
        assert_eq!(nodes[1].parent.as_deref(), Some(nodes[0].id.as_str()));
    }

    #[tokio::test]
    async fn collect_without_calendars_is_an_empty_result() {
        let api = StaticApi::default();
        let err = collect(&api, &ClientConfig::default(), true)
            .await
            .unwrap_err();
        assert_eq!(provider_code(err), ProviderErrorCode::EmptyResult);
    }

    #[tokio::test]
    async fn write_nodes_emits_a_json_array() {
        let mut api = StaticApi::default();
        api.calendars = vec![Calendar::new("primary")];
        api.events.insert(
            "primary".into(),
            vec![Event::new("e1"), Event::new("e2")],
        );

        let (nodes, _) = collect(&api, &ClientConfig::default(), false)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.json");
        let mut file = File::create(&path).unwrap();
        write_nodes(&nodes, &mut file).unwrap();
        drop(file);

        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0]["internal"]["type"], "Calendar");
        assert_eq!(written[0]["children"].as_array().unwrap().len(), 2);
        assert_eq!(written[1]["internal"]["type"], "CalendarEvent");
        assert_eq!(written[1]["parent"], written[0]["id"]);
    }
}
