//! The exporter collect cycle.
//!
//! One `collect` call runs a full scrape of the monitor agent and
//! publishes the result: fetch, decode, filter, assign, then snapshot
//! every series — all under a single lock.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::warn;

use fluentd_scrape::{MonitorClient, ScrapeResult};

use crate::series::{
    Counter, Gauge, GaugeVec, MetricDesc, MetricFamily, MetricKind, PluginLabels,
};

/// Exporter configuration, built once at startup and passed to
/// [`Exporter::new`].
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Monitor agent base URL, e.g. `http://localhost:24220`.
    pub endpoint: String,
    /// Prefix for every exported metric name.
    pub namespace: String,
    /// Deadline for one fetch.
    pub timeout: Duration,
}

/// All mutable series state, guarded by the cycle lock.
struct Series {
    duration: Gauge,
    scrapes_total: Counter,
    last_error: Gauge,
    errors_total: Counter,
    buffer_queue_length: GaugeVec,
    buffer_total_queued_size: GaugeVec,
    retry_count: GaugeVec,
}

impl Series {
    fn new(namespace: &str) -> Self {
        Self {
            duration: Gauge::new(MetricDesc::new(
                namespace,
                "last_scrape_duration_seconds",
                "Duration of the last scrape of metrics from Fluentd.",
                MetricKind::Gauge,
            )),
            scrapes_total: Counter::new(MetricDesc::new(
                namespace,
                "scrapes_total",
                "Total number of times Fluentd was scraped for metrics.",
                MetricKind::Counter,
            )),
            last_error: Gauge::new(MetricDesc::new(
                namespace,
                "last_scrape_error",
                "Whether the last scrape of metrics from Fluentd resulted in an error (1 for error, 0 for success).",
                MetricKind::Gauge,
            )),
            errors_total: Counter::new(MetricDesc::new(
                namespace,
                "scrape_errors_total",
                "Total count of errors scraping Fluentd.",
                MetricKind::Counter,
            )),
            buffer_queue_length: GaugeVec::new(MetricDesc::new(
                namespace,
                "buffer_queue_length",
                "Per-plugin buffer queue length.",
                MetricKind::Gauge,
            )),
            buffer_total_queued_size: GaugeVec::new(MetricDesc::new(
                namespace,
                "buffer_total_queued_size",
                "Per-plugin total queued buffer size in bytes.",
                MetricKind::Gauge,
            )),
            retry_count: GaugeVec::new(MetricDesc::new(
                namespace,
                "retry_count",
                "Per-plugin retry count.",
                MetricKind::Gauge,
            )),
        }
    }

    fn descs(&self) -> Vec<MetricDesc> {
        vec![
            self.duration.desc().clone(),
            self.scrapes_total.desc().clone(),
            self.last_error.desc().clone(),
            self.errors_total.desc().clone(),
            self.buffer_queue_length.desc().clone(),
            self.buffer_total_queued_size.desc().clone(),
            self.retry_count.desc().clone(),
        ]
    }

    fn families(&self) -> Vec<MetricFamily> {
        vec![
            self.duration.family(),
            self.scrapes_total.family(),
            self.last_error.family(),
            self.errors_total.family(),
            self.buffer_queue_length.family(),
            self.buffer_total_queued_size.family(),
            self.retry_count.family(),
        ]
    }
}

/// Scrapes the monitor agent on demand and owns every exported series.
///
/// Per-plugin series are keyed by (`pluginType`, `pluginId`) and never
/// evicted: a plugin that disappears upstream keeps its last published
/// values until overwritten, and an agent whose plugin set grows without
/// bound grows the series maps without bound.
pub struct Exporter {
    client: MonitorClient,
    series: Mutex<Series>,
}

impl Exporter {
    /// Build an exporter from `config`, validating the endpoint URL.
    pub fn new(config: &ScrapeConfig) -> ScrapeResult<Self> {
        Ok(Self {
            client: MonitorClient::new(&config.endpoint, config.timeout)?,
            series: Mutex::new(Series::new(&config.namespace)),
        })
    }

    /// Static identity of every series this exporter can produce,
    /// independent of collected data.
    pub async fn describe(&self) -> Vec<MetricDesc> {
        self.series.lock().await.descs()
    }

    /// Run one scrape cycle and snapshot every series.
    ///
    /// Overlapping calls serialize on the cycle lock: a slow upstream
    /// stalls concurrent scrapes rather than handing them stale data.
    /// A fetch or decode failure is absorbed into the outcome series
    /// and leaves previously published per-plugin values untouched.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let mut series = self.series.lock().await;
        let start = Instant::now();
        series.scrapes_total.inc();

        match self.client.fetch_plugins().await {
            Ok(snapshot) => {
                for plugin in snapshot.into_output_plugins() {
                    let labels = PluginLabels {
                        plugin_type: plugin.plugin_type,
                        plugin_id: plugin.plugin_id,
                    };
                    series
                        .buffer_queue_length
                        .set(labels.clone(), plugin.buffer_queue_length);
                    series
                        .buffer_total_queued_size
                        .set(labels.clone(), plugin.buffer_total_queued_size);
                    series.retry_count.set(labels, plugin.retry_count);
                }
                series.last_error.set(0.0);
            }
            Err(e) => {
                warn!(error = %e, "scrape failed");
                series.last_error.set(1.0);
                series.errors_total.inc();
            }
        }

        series.duration.set(start.elapsed().as_secs_f64());
        series.families()
    }
}
