//! Starling Bank tools for MCP.
//!
//! The catalog (`catalog`) declares each tool as data; the registry (`registry`) validates
//! arguments, runs the matching action against a [`starling_api::StarlingClient`] and renders
//! the result. The crate has no transport code: the server binary plugs the registry into an
//! rmcp `ServerHandler`.

pub mod attachments;
pub mod catalog;
pub mod endpoint;
pub mod error;
pub mod registry;
pub mod render;
pub mod schema;
pub mod semantics;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
