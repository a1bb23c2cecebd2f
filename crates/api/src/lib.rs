//! Client for the Starling Bank public API (v2).
//!
//! Covers the three ways the MCP tools talk to Starling:
//! - bearer-authenticated JSON calls
//! - bearer + HTTP-signature calls (payment creation)
//! - raw binary upload and download (feed item attachments)
//!
//! Every call is a single attempt; retries and caching are left to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod safety;
pub mod signing;

pub use client::StarlingClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, SigningKeyMaterial};
pub use error::{Result, StarlingApiError};
pub use reqwest::Method;
