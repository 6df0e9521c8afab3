//! Core types: content nodes, node IDs, digests, tracing
//!
//! This crate models the host framework's side of the sourcing contract. The
//! host consumes [`ContentNode`]s through a [`NodeSink`]; everything that
//! talks to Google lives in `gcal-source-providers`.

pub mod digest;
pub mod node;
pub mod tracing;

pub use digest::{DEFAULT_NODE_NAMESPACE, NodeIdFactory, content_digest};
pub use node::{ContentNode, NodeError, NodeInternal, NodeSink, RESERVED_FIELDS};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
