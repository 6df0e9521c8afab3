//! Calendar and event payloads as returned by the Calendar API.
//!
//! Apart from the `id`, the fields are opaque: they are carried through to the
//! produced nodes untouched, so new upstream fields show up without code
//! changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A calendar (calendar list entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    /// The external calendar identifier, e.g. `primary` or an email address.
    pub id: String,
    /// All other fields (`summary`, `timeZone`, colors, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Calendar {
    /// Creates a calendar with only an ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder method to set a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the display name, if present.
    pub fn summary(&self) -> Option<&str> {
        self.fields.get("summary").and_then(Value::as_str)
    }
}

/// An event belonging to one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The external event identifier.
    pub id: String,
    /// All other fields (`summary`, `description`, `start`, `end`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Event {
    /// Creates an event with only an ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder method to set a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the event description, if present.
    pub fn description(&self) -> Option<&str> {
        self.fields.get("description").and_then(Value::as_str)
    }
}
