//! Metric source abstraction
//!
//! The collector only needs one capability from CloudWatch: fetch the
//! datapoints of a metric for some dimensions over a time window.
//! [`MetricSource`] captures that so the collector can be driven by the
//! real client or by [`crate::mock::MockSource`].

mod cloudwatch;

pub use cloudwatch::CloudWatchSource;

use chrono::{DateTime, Duration, Utc};

use crate::metrics::Statistic;

/// Lookback of each query, ending now
pub const LOOKBACK_SECONDS: i64 = 180;

/// Aggregation period requested from CloudWatch
pub const PERIOD_SECONDS: i32 = 600;

/// A CloudWatch dimension filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parameters of a single `GetMetricStatistics` call
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsQuery {
    pub namespace: String,
    pub metric_name: String,
    pub statistics: Vec<Statistic>,
    pub dimensions: Vec<Dimension>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub period_seconds: i32,
}

impl StatisticsQuery {
    /// Build a query over the fixed lookback window ending at `now`
    pub fn ending_at(
        namespace: &str,
        metric_name: &str,
        statistics: Vec<Statistic>,
        dimensions: Vec<Dimension>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            statistics,
            dimensions,
            start_time: now - Duration::seconds(LOOKBACK_SECONDS),
            end_time: now,
            period_seconds: PERIOD_SECONDS,
        }
    }
}

/// One timestamped observation
///
/// Only the statistics that were requested are populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub average: Option<f64>,
    pub sum: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
}

impl Datapoint {
    /// A datapoint with no statistics set
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            average: None,
            sum: None,
            maximum: None,
            minimum: None,
        }
    }

    pub fn with_sum(mut self, value: f64) -> Self {
        self.sum = Some(value);
        self
    }

    pub fn with_average(mut self, value: f64) -> Self {
        self.average = Some(value);
        self
    }

    pub fn with_maximum(mut self, value: f64) -> Self {
        self.maximum = Some(value);
        self
    }

    pub fn with_minimum(mut self, value: f64) -> Self {
        self.minimum = Some(value);
        self
    }

    /// Value of the given statistic, if present
    pub fn value(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Average => self.average,
            Statistic::Sum => self.sum,
            Statistic::Maximum => self.maximum,
            Statistic::Minimum => self.minimum,
        }
    }
}

/// Errors returned by a metric source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(String),
}

/// Capability to query CloudWatch metric statistics
pub trait MetricSource: Send + Sync {
    /// Fetch all datapoints matching the query
    fn get_metric_statistics(&self, query: &StatisticsQuery) -> Result<Vec<Datapoint>, SourceError>;
}
