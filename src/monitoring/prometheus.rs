//! Prometheus text exposition format

use std::fmt::Write;

/// Content type of the rendered exposition
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Single labelled sample of a gauge
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    labels: Vec<(String, String)>,
    value: f64,
}

impl Sample {
    /// Label value by name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sample value
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Gauge metric family with help text and samples
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    name: String,
    help: String,
    samples: Vec<Sample>,
}

impl MetricFamily {
    /// Create an empty gauge family
    pub fn gauge(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            samples: Vec::new(),
        }
    }

    /// Append a sample
    pub fn push<K, V>(&mut self, labels: impl IntoIterator<Item = (K, V)>, value: f64)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.samples.push(Sample { labels, value });
    }

    /// Metric name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    fn write_to(&self, output: &mut String) -> std::fmt::Result {
        writeln!(output, "# HELP {} {}", self.name, escape_help(&self.help))?;
        writeln!(output, "# TYPE {} gauge", self.name)?;

        for sample in &self.samples {
            output.push_str(&self.name);
            if !sample.labels.is_empty() {
                let labels: Vec<String> = sample
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
                    .collect();
                write!(output, "{{{}}}", labels.join(","))?;
            }
            writeln!(output, " {}", format_value(sample.value))?;
        }

        Ok(())
    }
}

/// Render families in exposition format, skipping families without samples
pub fn render(families: &[MetricFamily]) -> String {
    let mut output = String::new();

    for family in families.iter().filter(|f| !f.samples.is_empty()) {
        // Writing into a String cannot fail
        let _ = family.write_to(&mut output);
    }

    output
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n")
}

fn escape_help(help: &str) -> String {
    help.replace('\\', r"\\").replace('\n', r"\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else {
        value.to_string()
    }
}
