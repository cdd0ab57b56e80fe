//! Wire types for the monitor agent's `/api/plugins.json` document.

use serde::Deserialize;

use crate::error::ScrapeResult;

/// One plugin entry in the monitor agent snapshot.
///
/// Absent fields decode to their zero value — input plugins omit the
/// buffer and retry fields entirely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginRecord {
    #[serde(default)]
    pub plugin_id: String,
    #[serde(rename = "type", default)]
    pub plugin_type: String,
    #[serde(default)]
    pub output_plugin: bool,
    #[serde(default)]
    pub buffer_queue_length: f64,
    #[serde(default)]
    pub buffer_total_queued_size: f64,
    #[serde(default)]
    pub retry_count: f64,
}

/// The full document returned by one fetch. Transient — lives only
/// within a single scrape cycle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PluginsSnapshot {
    #[serde(default)]
    pub plugins: Vec<PluginRecord>,
}

impl PluginsSnapshot {
    /// Decode a snapshot from raw response bytes.
    pub fn decode(bytes: &[u8]) -> ScrapeResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Keep only output plugin records; nothing else carries buffer
    /// state worth exporting.
    pub fn into_output_plugins(self) -> impl Iterator<Item = PluginRecord> {
        self.plugins.into_iter().filter(|p| p.output_plugin)
    }
}
