//! Google Calendar API client.
//!
//! Thin wrapper over the calendars, calendarList and events endpoints.
//! Responses are kept as pass-through JSON; only the first page of each
//! listing is read.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{BoxFuture, CalendarApi, EventQuery};
use crate::calendar::{Calendar, Event};
use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleConfig;
use super::tokens::TokenPair;

/// Authorized Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base_url: String,
    tokens: TokenPair,
}

impl GoogleCalendarClient {
    /// Creates a client that authenticates with the given token pair.
    pub fn new(tokens: TokenPair, config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Returns the attached token pair.
    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    /// Fetches calendar metadata by ID.
    ///
    /// Works for any calendar the token can read, including public calendars
    /// that are not in the user's calendar list.
    pub async fn get_calendar(&self, calendar_id: &str) -> ProviderResult<Calendar> {
        let url = calendar_url(&self.api_base_url, calendar_id);
        self.get_json(&url, &[], &format!("calendar {}", calendar_id))
            .await
    }

    /// Lists the calendars of the authorized user.
    pub async fn list_calendars(&self) -> ProviderResult<Vec<Calendar>> {
        let url = calendar_list_url(&self.api_base_url);
        let list: ListResponse<Calendar> = self.get_json(&url, &[], "calendar list").await?;
        if list.next_page_token.is_some() {
            debug!("calendar list has more pages; only the first page is used");
        }
        Ok(list.items)
    }

    /// Lists the events of a calendar.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> ProviderResult<Vec<Event>> {
        let url = events_url(&self.api_base_url, calendar_id);
        let pairs = query.to_query_pairs();
        let list: ListResponse<Event> = self
            .get_json(&url, &pairs, &format!("events of calendar {}", calendar_id))
            .await?;
        if list.next_page_token.is_some() {
            debug!(calendar_id, "event list has more pages; only the first page is used");
        }
        Ok(list.items)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
        what: &str,
    ) -> ProviderResult<T> {
        debug!(url, params = query.len(), "GET");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.tokens.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network(format!("request for {} timed out", what))
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_for_status(status, &body, what));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse {}: {}", what, e))
        })
    }
}

fn calendar_url(base: &str, calendar_id: &str) -> String {
    format!("{}/calendars/{}", base, urlencoding::encode(calendar_id))
}

fn calendar_list_url(base: &str) -> String {
    format!("{}/users/me/calendarList", base)
}

fn events_url(base: &str, calendar_id: &str) -> String {
    format!("{}/calendars/{}/events", base, urlencoding::encode(calendar_id))
}

/// Maps a non-success response to an error.
fn error_for_status(status: StatusCode, body: &str, what: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::authentication(format!(
            "access token rejected while fetching {}; remove GOOGLE_ACCESS_TOKEN and \
             GOOGLE_REFRESH_TOKEN and authorize again",
            what
        )),
        StatusCode::NOT_FOUND => ProviderError::not_found(format!("{} not found", what)),
        _ => ProviderError::upstream(format!(
            "API error fetching {} ({}): {}",
            what, status, body
        )),
    }
}

/// One page of a list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

impl CalendarApi for GoogleCalendarClient {
    fn get_calendar<'a>(
        &'a self,
        calendar_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Calendar>> {
        Box::pin(GoogleCalendarClient::get_calendar(self, calendar_id))
    }

    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<Calendar>>> {
        Box::pin(GoogleCalendarClient::list_calendars(self))
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<Event>>> {
        Box::pin(GoogleCalendarClient::list_events(self, calendar_id, query))
    }
}
