//! Prometheus text exposition format.
//!
//! Renders collected metric families into the text format scraped by a
//! Prometheus server or compatible agent.

use crate::series::MetricFamily;

/// Content type for the rendered exposition body.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render metric families into Prometheus text format.
///
/// Families with no samples yet still get their `# HELP` and `# TYPE`
/// declarations.
pub fn render_families(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        out.push_str(&format!("# HELP {} {}\n", family.desc.name, family.desc.help));
        out.push_str(&format!(
            "# TYPE {} {}\n",
            family.desc.name,
            family.desc.kind.as_str()
        ));

        for sample in &family.samples {
            if sample.labels.is_empty() {
                out.push_str(&format!("{} {}\n", family.desc.name, sample.value));
            } else {
                let labels = sample
                    .labels
                    .iter()
                    .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
                    .collect::<Vec<_>>()
                    .join(",");
                out.push_str(&format!(
                    "{}{{{}}} {}\n",
                    family.desc.name, labels, sample.value
                ));
            }
        }
    }

    out
}

/// Escape a label value per the exposition format: backslash, double
/// quote, and newline.
fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
