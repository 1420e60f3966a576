//! Collection steps
//!
//! fetch → pick latest datapoint → extract statistics → derive success count.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::NoDataError;
use crate::metrics::{MetricsGroup, NAMESPACE};
use crate::source::{Datapoint, Dimension, MetricSource, StatisticsQuery};
use crate::Stats;

/// Bucket and optional request-metrics filter a query is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTarget {
    pub bucket_name: String,
    pub filter_id: Option<String>,
}

impl BucketTarget {
    /// Target a whole bucket, without a filter
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            filter_id: None,
        }
    }

    /// Scope the target to a request-metrics filter
    pub fn with_filter(mut self, filter_id: impl Into<String>) -> Self {
        self.filter_id = Some(filter_id.into());
        self
    }

    /// CloudWatch dimensions for this target; `FilterId` only when a filter is set
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dimensions = vec![Dimension::new("BucketName", &self.bucket_name)];
        if let Some(filter_id) = &self.filter_id {
            dimensions.push(Dimension::new("FilterId", filter_id));
        }
        dimensions
    }
}

/// Pick the datapoint with the greatest timestamp.
///
/// On equal timestamps the first one seen is kept.
pub fn select_latest(datapoints: &[Datapoint]) -> Option<&Datapoint> {
    datapoints.iter().fold(None, |latest: Option<&Datapoint>, dp| match latest {
        Some(current) if dp.timestamp <= current.timestamp => Some(current),
        _ => Some(dp),
    })
}

/// Query one metric group and return its most recent datapoint
pub fn get_last_point<S: MetricSource + ?Sized>(
    source: &S,
    target: &BucketTarget,
    group: &MetricsGroup,
    now: DateTime<Utc>,
) -> Result<Datapoint, NoDataError> {
    let query = StatisticsQuery::ending_at(
        NAMESPACE,
        group.cloudwatch_name,
        group.statistics(),
        target.dimensions(),
        now,
    );

    let datapoints = source
        .get_metric_statistics(&query)
        .map_err(|source| NoDataError::Query {
            metric: group.cloudwatch_name.to_string(),
            source,
        })?;
    debug!(metric = group.cloudwatch_name, count = datapoints.len(), "fetched datapoints");

    select_latest(&datapoints)
        .cloned()
        .ok_or_else(|| NoDataError::Empty {
            metric: group.cloudwatch_name.to_string(),
        })
}

/// Copy the group's configured statistics out of a datapoint.
///
/// A statistic missing from the datapoint is skipped.
pub fn merge_stats(stats: &mut Stats, dp: &Datapoint, group: &MetricsGroup) {
    for metric in group.metrics {
        match dp.value(metric.statistic) {
            Some(value) => {
                stats.insert(metric.mackerel_name.to_string(), value);
            }
            None => {
                debug!(
                    metric = metric.mackerel_name,
                    statistic = %metric.statistic,
                    "datapoint has no value for statistic"
                );
            }
        }
    }
}

/// Derives a success count from a total and an error count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessDerivation {
    /// Intermediate key, removed after derivation
    pub total_key: &'static str,
    pub errors_key: &'static str,
    pub success_key: &'static str,
}

/// Derivation applied to every collected map
pub const INVOCATIONS_SUCCESS: SuccessDerivation = SuccessDerivation {
    total_key: "TEMPORARY_invocations_total",
    errors_key: "invocations_error",
    success_key: "invocations_success",
};

impl SuccessDerivation {
    /// `success = total - errors`, or `total` when no error count exists.
    /// The total key is dropped whenever it was present.
    pub fn apply(&self, stats: &mut Stats) {
        let Some(total) = stats.remove(self.total_key) else {
            return;
        };
        let success = match stats.get(self.errors_key) {
            Some(errors) => total - errors,
            None => total,
        };
        stats.insert(self.success_key.to_string(), success);
    }
}

/// Post-process a collected map
pub fn transform_metrics(mut stats: Stats) -> Stats {
    INVOCATIONS_SUCCESS.apply(&mut stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricSpec, Statistic, S3_REQUEST_METRICS};
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_select_latest_picks_max_timestamp() {
        let points = vec![
            Datapoint::at(ts(100)).with_sum(1.0),
            Datapoint::at(ts(300)).with_sum(3.0),
            Datapoint::at(ts(200)).with_sum(2.0),
        ];
        let latest = select_latest(&points).unwrap();
        assert_eq!(latest.sum, Some(3.0));
    }

    #[test]
    fn test_select_latest_tie_keeps_first_seen() {
        let points = vec![
            Datapoint::at(ts(100)).with_sum(1.0),
            Datapoint::at(ts(300)).with_sum(3.0),
            Datapoint::at(ts(300)).with_sum(4.0),
        ];
        let latest = select_latest(&points).unwrap();
        assert_eq!(latest.sum, Some(3.0));
    }

    #[test]
    fn test_select_latest_empty() {
        assert!(select_latest(&[]).is_none());
    }

    #[test]
    fn test_merge_stats_latency_group() {
        let latency = S3_REQUEST_METRICS.last().unwrap();
        let dp = Datapoint::at(ts(0))
            .with_average(12.5)
            .with_maximum(80.0)
            .with_minimum(3.0);

        let mut stats = Stats::new();
        merge_stats(&mut stats, &dp, latency);

        assert_eq!(stats.get("TotalRequestLatencyAvg"), Some(&12.5));
        assert_eq!(stats.get("TotalRequestLatencyMax"), Some(&80.0));
        assert_eq!(stats.get("TotalRequestLatencyMin"), Some(&3.0));
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn test_merge_stats_skips_missing_statistic() {
        static GROUP: MetricsGroup = MetricsGroup {
            cloudwatch_name: "TotalRequestLatency",
            metrics: &[
                MetricSpec {
                    mackerel_name: "LatencyAvg",
                    statistic: Statistic::Average,
                },
                MetricSpec {
                    mackerel_name: "LatencySum",
                    statistic: Statistic::Sum,
                },
            ],
        };
        let dp = Datapoint::at(ts(0)).with_average(1.0);

        let mut stats = Stats::new();
        merge_stats(&mut stats, &dp, &GROUP);

        assert_eq!(stats.get("LatencyAvg"), Some(&1.0));
        assert!(!stats.contains_key("LatencySum"));
    }

    #[test]
    fn test_transform_total_and_errors() {
        let mut stats = Stats::new();
        stats.insert("TEMPORARY_invocations_total".to_string(), 100.0);
        stats.insert("invocations_error".to_string(), 30.0);

        let stats = transform_metrics(stats);
        assert_eq!(stats.get("invocations_success"), Some(&70.0));
        assert_eq!(stats.get("invocations_error"), Some(&30.0));
        assert!(!stats.contains_key("TEMPORARY_invocations_total"));
    }

    #[test]
    fn test_transform_total_only() {
        let mut stats = Stats::new();
        stats.insert("TEMPORARY_invocations_total".to_string(), 100.0);

        let stats = transform_metrics(stats);
        assert_eq!(stats.get("invocations_success"), Some(&100.0));
        assert!(!stats.contains_key("TEMPORARY_invocations_total"));
    }

    #[test]
    fn test_transform_without_total_is_noop() {
        let mut stats = Stats::new();
        stats.insert("invocations_error".to_string(), 5.0);
        stats.insert("GetRequests".to_string(), 1.0);

        let out = transform_metrics(stats.clone());
        assert_eq!(out, stats);
    }

    #[test]
    fn test_bucket_target_dimensions() {
        let dims = BucketTarget::new("assets").with_filter("EntireBucket").dimensions();
        assert_eq!(dims[0], Dimension::new("BucketName", "assets"));
        assert_eq!(dims[1], Dimension::new("FilterId", "EntireBucket"));
    }

    #[test]
    fn test_bucket_target_without_filter() {
        let dims = BucketTarget::new("assets").dimensions();
        assert_eq!(dims, vec![Dimension::new("BucketName", "assets")]);
    }
}
