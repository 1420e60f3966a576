//! Mackerel plugin for Amazon S3 request metrics
//!
//! Queries CloudWatch for the request metrics S3 publishes for a bucket
//! filter, keeps the newest datapoint of each metric, and reports the
//! values together with a fixed graph layout.

pub mod collect;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod mock;
pub mod plugin;
pub mod source;

pub use collect::BucketTarget;
pub use config::{ConfigLayer, PluginConfig};
pub use error::{NoDataError, SetupError};
pub use metrics::{MetricSpec, MetricsGroup, Statistic, S3_REQUEST_METRICS};
pub use mp_plugin::Stats;
pub use plugin::S3ExtendedPlugin;
pub use source::{CloudWatchSource, Datapoint, MetricSource, SourceError, StatisticsQuery};
