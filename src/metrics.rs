//! Static S3 request-metric table
//!
//! Each [`MetricsGroup`] maps one CloudWatch metric to the mackerel
//! metrics extracted from it. The table is fixed at compile time.

use std::fmt;

/// CloudWatch namespace for S3 metrics
pub const NAMESPACE: &str = "AWS/S3";

/// Statistic kind requested from CloudWatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Average,
    Sum,
    Maximum,
    Minimum,
}

impl Statistic {
    /// CloudWatch wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
            Statistic::Maximum => "Maximum",
            Statistic::Minimum => "Minimum",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mackerel metric read from a CloudWatch statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub mackerel_name: &'static str,
    pub statistic: Statistic,
}

/// One CloudWatch metric and the mackerel metrics derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsGroup {
    pub cloudwatch_name: &'static str,
    pub metrics: &'static [MetricSpec],
}

impl MetricsGroup {
    /// Statistics to request, in configured order
    pub fn statistics(&self) -> Vec<Statistic> {
        self.metrics.iter().map(|m| m.statistic).collect()
    }

    /// Mackerel names this group can produce
    pub fn mackerel_names(&self) -> impl Iterator<Item = &'static str> {
        let metrics: &'static [MetricSpec] = self.metrics;
        metrics.iter().map(|m| m.mackerel_name)
    }
}

impl fmt::Display for MetricsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cloudwatch_name)?;
        f.write_str(" [")?;
        for (i, m) in self.metrics.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", m.mackerel_name, m.statistic)?;
        }
        f.write_str("]")
    }
}

macro_rules! sum_group {
    ($name:literal) => {
        MetricsGroup {
            cloudwatch_name: $name,
            metrics: &[MetricSpec {
                mackerel_name: $name,
                statistic: Statistic::Sum,
            }],
        }
    };
}

/// Request metrics published for a bucket filter
pub static S3_REQUEST_METRICS: &[MetricsGroup] = &[
    sum_group!("GetRequests"),
    sum_group!("PutRequests"),
    sum_group!("DeleteRequests"),
    sum_group!("HeadRequests"),
    sum_group!("PostRequests"),
    sum_group!("ListRequests"),
    sum_group!("4xxErrors"),
    sum_group!("5xxErrors"),
    sum_group!("BytesDownloaded"),
    sum_group!("BytesUploaded"),
    MetricsGroup {
        cloudwatch_name: "TotalRequestLatency",
        metrics: &[
            MetricSpec {
                mackerel_name: "TotalRequestLatencyAvg",
                statistic: Statistic::Average,
            },
            MetricSpec {
                mackerel_name: "TotalRequestLatencyMax",
                statistic: Statistic::Maximum,
            },
            MetricSpec {
                mackerel_name: "TotalRequestLatencyMin",
                statistic: Statistic::Minimum,
            },
        ],
    },
];

/// Every mackerel name the static table can produce
pub fn producible_names() -> impl Iterator<Item = &'static str> {
    S3_REQUEST_METRICS.iter().flat_map(|g| g.mackerel_names())
}
