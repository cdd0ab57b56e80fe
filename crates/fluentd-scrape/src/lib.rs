//! fluentd-scrape — monitor agent client for the Fluentd exporter.
//!
//! Fetches the plugin stats document from a Fluentd monitor agent,
//! decodes it, and filters it down to output plugin records.
//!
//! # Pipeline
//!
//! ```text
//! MonitorClient::fetch_plugins()
//!   ├── fetch  → GET {endpoint}/api/plugins.json (one deadline)
//!   ├── decode → PluginsSnapshot
//!   └── filter → PluginsSnapshot::into_output_plugins()
//! ```
//!
//! A connection error, timeout, and non-2xx status are all one
//! undifferentiated fetch error; malformed JSON is a decode error.
//! The caller decides what either means — this crate never retries.

pub mod client;
pub mod error;
pub mod types;

pub use client::MonitorClient;
pub use error::{ScrapeError, ScrapeResult};
pub use types::{PluginRecord, PluginsSnapshot};
