//! Mapping of calendars and events to content nodes.

use gcal_source_core::{ContentNode, NodeError, NodeIdFactory};

use crate::calendar::{Calendar, Event};

/// Node type tag of calendar nodes.
pub const CALENDAR_NODE_TYPE: &str = "Calendar";

/// Node type tag of event nodes.
pub const EVENT_NODE_TYPE: &str = "CalendarEvent";

/// A calendar together with the events fetched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarWithEvents {
    pub calendar: Calendar,
    pub events: Vec<Event>,
}

impl CalendarWithEvents {
    pub fn new(calendar: Calendar, events: Vec<Event>) -> Self {
        Self { calendar, events }
    }
}

/// Maps calendars and their events to nodes.
///
/// The output lists each calendar node followed by its event nodes. Event
/// nodes point at their calendar through `parent`; the calendar's `children`
/// holds the event node IDs in event order. Every digest covers the entity's
/// complete serialized payload.
pub fn map_to_nodes(
    entries: &[CalendarWithEvents],
    ids: &NodeIdFactory,
) -> Result<Vec<ContentNode>, NodeError> {
    let mut nodes = Vec::with_capacity(
        entries.len() + entries.iter().map(|e| e.events.len()).sum::<usize>(),
    );

    for entry in entries {
        let calendar_node_id = ids.typed_node_id(CALENDAR_NODE_TYPE, &entry.calendar.id);
        let mut calendar_node =
            ContentNode::from_payload(&calendar_node_id, CALENDAR_NODE_TYPE, &entry.calendar)?;

        let mut event_nodes = Vec::with_capacity(entry.events.len());
        for event in &entry.events {
            let event_node_id = ids.typed_node_id(EVENT_NODE_TYPE, &event.id);
            let event_node = ContentNode::from_payload(&event_node_id, EVENT_NODE_TYPE, event)?
                .with_parent(&calendar_node_id);
            calendar_node.push_child(event_node_id);
            event_nodes.push(event_node);
        }

        nodes.push(calendar_node);
        nodes.extend(event_nodes);
    }

    Ok(nodes)
}
