//! The sourcing workflow: fetch, map and emit.

use std::collections::HashMap;

use gcal_source_core::{NodeIdFactory, NodeSink};
use tracing::{info, warn};

use crate::api::{CalendarApi, EventQuery};
use crate::error::{ProviderError, ProviderResult};
use crate::fetch::{list_calendars, list_events};
use crate::nodes::{CalendarWithEvents, map_to_nodes};

/// Caller-supplied options of a source run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceOptions {
    /// Calendars to source. `None` sources every calendar of the user.
    pub calendar_ids: Option<Vec<String>>,
    /// Options forwarded to every events listing.
    pub event_query: EventQuery,
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to restrict the run to the given calendars.
    pub fn with_calendar_ids(mut self, ids: Vec<String>) -> Self {
        self.calendar_ids = Some(ids);
        self
    }

    /// Builder method to set the event query.
    pub fn with_event_query(mut self, query: EventQuery) -> Self {
        self.event_query = query;
        self
    }
}

/// A non-fatal condition observed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceWarning {
    /// The calendar returned no events; its node was still created.
    NoEvents { calendar_id: String },
    /// The event was already sourced under an earlier calendar and was
    /// skipped here; event node IDs derive from the event ID alone.
    DuplicateEvent {
        event_id: String,
        calendar_id: String,
        kept_in: String,
    },
}

impl std::fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEvents { calendar_id } => {
                write!(f, "no events found for calendar {}", calendar_id)
            }
            Self::DuplicateEvent {
                event_id,
                calendar_id,
                kept_in,
            } => write!(
                f,
                "event {} of calendar {} skipped; already sourced from calendar {}",
                event_id, calendar_id, kept_in
            ),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub calendars: usize,
    pub events: usize,
    pub nodes_created: usize,
    pub warnings: Vec<SourceWarning>,
}

/// Runs a complete source pass against an authorized API.
///
/// Calendars are listed first; an empty listing aborts the run before any
/// node reaches the sink. Events are then fetched calendar by calendar. All
/// nodes are mapped before the first one is handed to the sink, so a mapping
/// failure emits nothing. A sink failure aborts the run at that node.
///
/// An event listed by several calendars is kept under the first one only, so
/// every event node has exactly one parent and appears in exactly one
/// `children` list.
pub async fn source_nodes(
    api: &dyn CalendarApi,
    options: &SourceOptions,
    ids: &NodeIdFactory,
    sink: &mut dyn NodeSink,
) -> ProviderResult<SourceReport> {
    let calendars = list_calendars(api, options.calendar_ids.as_deref()).await?;
    if calendars.is_empty() {
        return Err(ProviderError::empty_result(
            "no calendars found; check the configured calendar IDs and the authorized account",
        ));
    }

    let mut report = SourceReport {
        calendars: calendars.len(),
        ..Default::default()
    };

    let mut entries = Vec::with_capacity(calendars.len());
    let mut owners: HashMap<String, String> = HashMap::new();
    for calendar in calendars {
        let mut events = list_events(api, &calendar.id, &options.event_query).await?;
        if events.is_empty() {
            warn!(calendar_id = %calendar.id, "no events found for calendar");
            report.warnings.push(SourceWarning::NoEvents {
                calendar_id: calendar.id.clone(),
            });
        }

        events.retain(|event| match owners.get(&event.id) {
            Some(kept_in) => {
                warn!(
                    event_id = %event.id,
                    calendar_id = %calendar.id,
                    kept_in = %kept_in,
                    "skipping event already sourced from another calendar"
                );
                report.warnings.push(SourceWarning::DuplicateEvent {
                    event_id: event.id.clone(),
                    calendar_id: calendar.id.clone(),
                    kept_in: kept_in.clone(),
                });
                false
            }
            None => {
                owners.insert(event.id.clone(), calendar.id.clone());
                true
            }
        });
        report.events += events.len();
        entries.push(CalendarWithEvents::new(calendar, events));
    }

    let nodes = map_to_nodes(&entries, ids)?;
    for node in nodes {
        sink.create_node(node)?;
        report.nodes_created += 1;
    }

    info!(
        calendars = report.calendars,
        events = report.events,
        nodes = report.nodes_created,
        "sourced calendar nodes"
    );
    Ok(report)
}
