//! Google Calendar sourcing.
//!
//! This crate turns the calendars and events of an authorized Google account
//! into content nodes:
//!
//! - [`google`] - OAuth flow and the Calendar API client
//! - [`CalendarApi`] - The upstream seam the fetcher runs against
//! - [`source_nodes`] - Fetch, map and emit in one pass
//! - [`map_to_nodes`] - Pure mapping from fetched data to nodes
//! - [`ProviderError`] - Error types for every step
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐       ┌──────────────────┐
//! │   OAuthClient   │──────▶│ GoogleCalendar-  │
//! │ (TokenStore)    │       │ Client           │
//! └─────────────────┘       └────────┬─────────┘
//!                                    │ CalendarApi
//!                                    ▼
//!                           ┌──────────────────┐
//!                           │  fetch (list_*)  │
//!                           └────────┬─────────┘
//!                                    ▼ map_to_nodes()
//!                           ┌──────────────────┐
//!                           │   ContentNode    │──▶ NodeSink
//!                           └──────────────────┘
//! ```

pub mod api;
pub mod calendar;
pub mod error;
pub mod fetch;
pub mod google;
pub mod nodes;
pub mod source;

pub use api::{BoxFuture, CalendarApi, EventQuery};
pub use calendar::{Calendar, Event};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fetch::{list_calendars, list_events};
pub use nodes::{CALENDAR_NODE_TYPE, CalendarWithEvents, EVENT_NODE_TYPE, map_to_nodes};
pub use source::{SourceOptions, SourceReport, SourceWarning, source_nodes};
