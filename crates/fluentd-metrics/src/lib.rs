//! fluentd-metrics — metric series and the exporter collect cycle.
//!
//! # Architecture
//!
//! ```text
//! Exporter
//!   ├── describe() → static MetricDesc identity of every series
//!   └── collect()  → one scrape cycle under the cycle lock
//!        fetch → decode → filter   (fluentd-scrape)
//!        assign → GaugeVec keyed by (pluginType, pluginId)
//!        outcome → duration / scrapes / error flag / error count
//!
//! Prometheus exposition
//!   └── render_families() → text/plain for the telemetry path
//! ```
//!
//! The whole collect cycle runs under one `tokio::sync::Mutex`, so
//! overlapping scrape requests serialize and never observe a snapshot
//! mixing two upstream payloads.

pub mod exporter;
pub mod render;
pub mod series;

pub use exporter::{Exporter, ScrapeConfig};
pub use render::{EXPOSITION_CONTENT_TYPE, render_families};
pub use series::{MetricDesc, MetricFamily, MetricKind, PluginLabels, Sample};
