use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The declared type of a metric family, as carried by a `# TYPE` line.
///
/// `Unknown` means the exposition carried no `# TYPE` line at all, which is
/// distinct from an explicit `untyped` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Untyped,
    Unknown,
}

impl FromStr for MetricType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "counter" => Self::Counter,
            "gauge" => Self::Gauge,
            "histogram" => Self::Histogram,
            "summary" => Self::Summary,
            "untyped" => Self::Untyped,
            _ => return Err(()),
        })
    }
}

/// A single name/value label attached to a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    pub name: String,
    pub value: String,
}

/// One measurement belonging to a metric family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Labels in the order they appeared in the exposition.
    pub labels: Vec<LabelPair>,
    pub value: f64,
    /// Optional timestamp in milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

/// A named group of samples sharing a type and help text.
///
/// The linter only ever reads this structure; it is produced either by the
/// text exposition decoder or supplied directly by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFamily {
    pub name: String,
    /// `None` when the exposition carried no `# HELP` line. An empty string
    /// means a `# HELP` line was present with no text, which is a different
    /// condition.
    pub help: Option<String>,
    pub metric_type: MetricType,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            name: name.into(),
            help: None,
            metric_type,
            samples: Vec::new(),
        }
    }

    /// Sets the help text, for building families in code.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A single diagnostic finding tying a metric family to an issue description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Name of the metric family the issue pertains to.
    pub metric: String,
    /// Human-readable description of the issue.
    pub text: String,
}

impl Problem {
    pub fn new(metric: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            text: text.into(),
        }
    }
}
