//! Calendar and event fetching.

use futures_util::future::try_join_all;
use tracing::debug;

use crate::api::{CalendarApi, EventQuery};
use crate::calendar::{Calendar, Event};
use crate::error::ProviderResult;

/// Lists the calendars a run should source.
///
/// With explicit IDs, every calendar is fetched individually and the lookups
/// run concurrently; the result keeps the order of `ids`. The first failing
/// lookup fails the whole call. Without IDs (or with an empty list) the user's
/// complete calendar list is returned.
pub async fn list_calendars(
    api: &dyn CalendarApi,
    ids: Option<&[String]>,
) -> ProviderResult<Vec<Calendar>> {
    match ids {
        Some(ids) if !ids.is_empty() => {
            debug!(count = ids.len(), "fetching configured calendars");
            try_join_all(ids.iter().map(|id| api.get_calendar(id))).await
        }
        _ => {
            debug!("fetching full calendar list");
            api.list_calendars().await
        }
    }
}

/// Lists the events of one calendar, forwarding `query` untouched.
pub async fn list_events(
    api: &dyn CalendarApi,
    calendar_id: &str,
    query: &EventQuery,
) -> ProviderResult<Vec<Event>> {
    let events = api.list_events(calendar_id, query).await?;
    debug!(calendar_id, count = events.len(), "fetched events");
    Ok(events)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`CalendarApi`] used across the crate's tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::api::BoxFuture;
    use crate::error::ProviderError;

    #[derive(Default)]
    pub struct FakeCalendarApi {
        pub calendars: Vec<Calendar>,
        pub events: HashMap<String, Vec<Event>>,
        /// Artificial latency per calendar lookup.
        pub delays: HashMap<String, Duration>,
        /// Calendar IDs whose lookup fails.
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<String>>,
        pub queries: Mutex<Vec<EventQuery>>,
    }

    impl FakeCalendarApi {
        pub fn with_calendar(mut self, calendar: Calendar, events: Vec<Event>) -> Self {
            self.events.insert(calendar.id.clone(), events);
            self.calendars.push(calendar);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CalendarApi for FakeCalendarApi {
        fn get_calendar<'a>(
            &'a self,
            calendar_id: &'a str,
        ) -> BoxFuture<'a, ProviderResult<Calendar>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(format!("get:{}", calendar_id));
                if let Some(delay) = self.delays.get(calendar_id) {
                    tokio::time::sleep(*delay).await;
                }
                if self.failing.iter().any(|id| id == calendar_id) {
                    return Err(ProviderError::upstream(format!(
                        "lookup failed for {}",
                        calendar_id
                    )));
                }
                self.calendars
                    .iter()
                    .find(|c| c.id == calendar_id)
                    .cloned()
                    .ok_or_else(|| ProviderError::not_found(calendar_id.to_string()))
            })
        }

        fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<Calendar>>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push("list".to_string());
                Ok(self.calendars.clone())
            })
        }

        fn list_events<'a>(
            &'a self,
            calendar_id: &'a str,
            query: &'a EventQuery,
        ) -> BoxFuture<'a, ProviderResult<Vec<Event>>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(format!("events:{}", calendar_id));
                self.queries.lock().unwrap().push(query.clone());
                Ok(self.events.get(calendar_id).cloned().unwrap_or_default())
            })
        }
    }
}
