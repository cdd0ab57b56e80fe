//! Metric series bookkeeping.
//!
//! Scalar gauges and counters hold the scrape outcome state; label-keyed
//! gauge families hold per-plugin buffer stats. A collect cycle snapshots
//! everything into [`MetricFamily`] values for the renderer.

use std::collections::HashMap;

/// Label names for per-plugin series, in exposition order.
pub const LABEL_PLUGIN_TYPE: &str = "pluginType";
pub const LABEL_PLUGIN_ID: &str = "pluginId";

/// Metric type as exposed to the scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    /// Keyword for the `# TYPE` exposition line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Static identity of one metric family: what `describe` returns,
/// independent of any collected data.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDesc {
    /// Fully qualified name, namespace prefix included.
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
}

impl MetricDesc {
    pub fn new(namespace: &str, name: &str, help: &'static str, kind: MetricKind) -> Self {
        Self {
            name: format!("{namespace}_{name}"),
            help,
            kind,
        }
    }
}

/// The label pair uniquely keying a per-plugin series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginLabels {
    pub plugin_type: String,
    pub plugin_id: String,
}

/// One exported sample within a family.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// (label name, label value) pairs, already in exposition order.
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// Point-in-time snapshot of one metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub desc: MetricDesc,
    pub samples: Vec<Sample>,
}

/// A single unlabeled gauge.
#[derive(Debug)]
pub struct Gauge {
    desc: MetricDesc,
    value: f64,
}

impl Gauge {
    pub fn new(desc: MetricDesc) -> Self {
        Self { desc, value: 0.0 }
    }

    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    pub fn family(&self) -> MetricFamily {
        MetricFamily {
            desc: self.desc.clone(),
            samples: vec![Sample {
                labels: Vec::new(),
                value: self.value,
            }],
        }
    }
}

/// A monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    desc: MetricDesc,
    value: f64,
}

impl Counter {
    pub fn new(desc: MetricDesc) -> Self {
        Self { desc, value: 0.0 }
    }

    pub fn inc(&mut self) {
        self.value += 1.0;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    pub fn family(&self) -> MetricFamily {
        MetricFamily {
            desc: self.desc.clone(),
            samples: vec![Sample {
                labels: Vec::new(),
                value: self.value,
            }],
        }
    }
}

/// A gauge family keyed by (`pluginType`, `pluginId`).
///
/// Values are overwritten in place; a label pair once seen is never
/// evicted, so the map grows with the upstream plugin set.
#[derive(Debug)]
pub struct GaugeVec {
    desc: MetricDesc,
    values: HashMap<PluginLabels, f64>,
}

impl GaugeVec {
    pub fn new(desc: MetricDesc) -> Self {
        Self {
            desc,
            values: HashMap::new(),
        }
    }

    /// Set the value for one label pair, overwriting any prior value.
    pub fn set(&mut self, labels: PluginLabels, value: f64) {
        self.values.insert(labels, value);
    }

    pub fn get(&self, labels: &PluginLabels) -> Option<f64> {
        self.values.get(labels).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    /// Snapshot the family with samples in a stable label order.
    pub fn family(&self) -> MetricFamily {
        let mut entries: Vec<(&PluginLabels, f64)> =
            self.values.iter().map(|(k, v)| (k, *v)).collect();
        entries.sort_by(|(a, _), (b, _)| {
            (&a.plugin_type, &a.plugin_id).cmp(&(&b.plugin_type, &b.plugin_id))
        });

        MetricFamily {
            desc: self.desc.clone(),
            samples: entries
                .into_iter()
                .map(|(labels, value)| Sample {
                    labels: vec![
                        (LABEL_PLUGIN_TYPE, labels.plugin_type.clone()),
                        (LABEL_PLUGIN_ID, labels.plugin_id.clone()),
                    ],
                    value,
                })
                .collect(),
        }
    }
}
