//! S3 extended metrics plugin
//!
//! Ties the metric table, the collector steps and the graph layout to the
//! [`mp_plugin::Plugin`] interface.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mp_plugin::{title, FetchError, GraphMetric, Graphs, Plugin, Unit};
use tracing::{info, warn};

use crate::collect::{get_last_point, merge_stats, transform_metrics, BucketTarget};
use crate::config::{effective_key_prefix, PluginConfig};
use crate::metrics::{MetricsGroup, S3_REQUEST_METRICS};
use crate::source::MetricSource;
use crate::Stats;

/// Layout of one graph before the label prefix is applied
#[derive(Debug, Clone, Copy)]
pub struct GraphTemplate {
    pub key: &'static str,
    pub label_suffix: &'static str,
    pub unit: Unit,
    /// (metric name, label, stacked)
    pub series: &'static [(&'static str, &'static str, bool)],
}

/// Graphs published by the plugin
pub static GRAPH_TEMPLATES: &[GraphTemplate] = &[
    GraphTemplate {
        key: "requests",
        label_suffix: " Requests",
        unit: Unit::Integer,
        series: &[
            ("GetRequests", "Get", true),
            ("PutRequests", "Put", true),
            ("DeleteRequests", "Delete", true),
            ("HeadRequests", "Head", true),
            ("PostRequests", "Post", true),
            ("ListRequests", "List", true),
        ],
    },
    GraphTemplate {
        key: "errors",
        label_suffix: " Errors",
        unit: Unit::Integer,
        series: &[("4xxErrors", "4xx", false), ("5xxErrors", "5xx", false)],
    },
    GraphTemplate {
        key: "bytes",
        label_suffix: " Bytes",
        unit: Unit::Bytes,
        series: &[
            ("BytesDownloaded", "Downloaded", false),
            ("BytesUploaded", "Uploaded", false),
        ],
    },
    GraphTemplate {
        key: "latency",
        label_suffix: " TotalRequestLatency",
        unit: Unit::Float,
        series: &[
            ("TotalRequestLatencyAvg", "Average", false),
            ("TotalRequestLatencyMax", "Maximum", false),
            ("TotalRequestLatencyMin", "Minimum", false),
        ],
    },
];

impl GraphTemplate {
    fn render(&self, label_prefix: &str) -> Graphs {
        Graphs {
            label: format!("{}{}", label_prefix, self.label_suffix),
            unit: self.unit,
            metrics: self
                .series
                .iter()
                .map(|&(name, label, stacked)| {
                    if stacked {
                        GraphMetric::stacked(name, label)
                    } else {
                        GraphMetric::new(name, label)
                    }
                })
                .collect(),
        }
    }
}

/// Collects S3 request metrics for one bucket filter
pub struct S3ExtendedPlugin<S> {
    source: S,
    target: BucketTarget,
    prefix: String,
    groups: &'static [MetricsGroup],
}

impl<S: MetricSource> S3ExtendedPlugin<S> {
    pub fn new(source: S, target: BucketTarget, prefix: impl Into<String>) -> Self {
        Self {
            source,
            target,
            prefix: prefix.into(),
            groups: S3_REQUEST_METRICS,
        }
    }

    /// Build from resolved settings
    pub fn from_config(source: S, config: &PluginConfig) -> Self {
        Self::new(
            source,
            BucketTarget {
                bucket_name: config.bucket_name.clone(),
                filter_id: config.filter_id.clone(),
            },
            &config.metric_key_prefix,
        )
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Collect every metric group as of `now`.
    ///
    /// Groups that fail or return nothing are logged and left out; this
    /// never fails as a whole.
    pub fn collect(&self, now: DateTime<Utc>) -> Stats {
        let mut stats = Stats::new();

        for group in self.groups {
            match get_last_point(&self.source, &self.target, group, now) {
                Ok(dp) => merge_stats(&mut stats, &dp, group),
                Err(err) => warn!(metric = err.metric(), error = %err, "skipping metric group"),
            }
        }

        info!(
            bucket = %self.target.bucket_name,
            filter = ?self.target.filter_id,
            values = stats.len(),
            "collected S3 request metrics"
        );
        transform_metrics(stats)
    }

    /// Graph metadata with labels derived from the configured prefix
    pub fn graphs(&self) -> BTreeMap<String, Graphs> {
        let label_prefix = title(&self.prefix);
        GRAPH_TEMPLATES
            .iter()
            .map(|t| (t.key.to_string(), t.render(&label_prefix)))
            .collect()
    }
}

impl<S: MetricSource> Plugin for S3ExtendedPlugin<S> {
    fn fetch_metrics(&self) -> Result<Stats, FetchError> {
        Ok(self.collect(Utc::now()))
    }

    fn graph_definition(&self) -> BTreeMap<String, Graphs> {
        self.graphs()
    }

    fn metric_key_prefix(&self) -> Option<String> {
        Some(effective_key_prefix(&self.prefix).to_string())
    }
}
