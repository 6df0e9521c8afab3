//! The calendar API seam.
//!
//! [`CalendarApi`] is the minimal set of upstream calls the fetcher needs.
//! The Google implementation lives in [`crate::google`]; tests substitute
//! in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::calendar::{Calendar, Event};
use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the fetcher can take
/// `&dyn CalendarApi`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Upstream calls used by a source run.
pub trait CalendarApi: Send + Sync {
    /// Fetches a single calendar by its external ID.
    fn get_calendar<'a>(&'a self, calendar_id: &'a str)
    -> BoxFuture<'a, ProviderResult<Calendar>>;

    /// Lists every calendar visible to the authorized user.
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<Calendar>>>;

    /// Lists the events of one calendar (first page only).
    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<Event>>>;
}

/// Option keys that must not be forwarded as query parameters.
const PATH_OPTION_KEYS: &[&str] = &["calendarId"];

/// Open-ended event listing options.
///
/// Keys and values are forwarded verbatim as query parameters of the events
/// list call (`timeMin`, `maxResults`, `orderBy`, `singleEvents`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventQuery {
    options: Map<String, Value>,
}

impl EventQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query from an option bag.
    pub fn from_options(options: Map<String, Value>) -> Self {
        Self { options }
    }

    /// Builder method to set an option, replacing any previous value.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets an option only if it has not been set already.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Returns an option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns the raw option bag.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Flattens the options into query parameters.
    ///
    /// Scalars are stringified, arrays repeat the key once per element, nulls
    /// are skipped and nested objects are sent as JSON text.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.options {
            if PATH_OPTION_KEYS.contains(&key.as_str()) {
                warn!(option = %key, "ignoring event option that conflicts with the calendar path");
                continue;
            }
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = query_value(item) {
                            pairs.push((key.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = query_value(other) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
        }
        pairs
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
