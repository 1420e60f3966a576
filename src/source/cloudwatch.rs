//! CloudWatch-backed metric source
//!
//! Wraps `aws-sdk-cloudwatch` behind [`MetricSource`]. The SDK is async, so
//! the source owns a current-thread tokio runtime and blocks on each call;
//! collection itself stays sequential.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudwatch::config::Credentials;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as SmithyDateTime;
use aws_sdk_cloudwatch::types::{Datapoint as SdkDatapoint, Dimension as SdkDimension, Statistic as SdkStatistic};
use aws_sdk_cloudwatch::Client;
use chrono::{DateTime, Utc};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use super::{Datapoint, MetricSource, SourceError, StatisticsQuery};
use crate::config::PluginConfig;
use crate::error::SetupError;
use crate::metrics::Statistic;

const CREDENTIALS_PROVIDER_NAME: &str = "mackerel-plugin-aws-s3-extended";

/// Metric source backed by the CloudWatch `GetMetricStatistics` API
pub struct CloudWatchSource {
    runtime: Runtime,
    client: Client,
}

impl CloudWatchSource {
    /// Build the runtime and SDK client from plugin settings
    pub fn connect(config: &PluginConfig) -> Result<Self, SetupError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SetupError::Runtime)?;

        let sdk_config = runtime.block_on(load_sdk_config(config));
        let region = require_region(&sdk_config)?;
        info!(region = %region, "CloudWatch client initialized");

        let client = Client::new(&sdk_config);
        Ok(Self { runtime, client })
    }

    async fn fetch(&self, query: &StatisticsQuery) -> Result<Vec<Datapoint>, SourceError> {
        let mut request = self
            .client
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .start_time(to_smithy(query.start_time))
            .end_time(to_smithy(query.end_time))
            .period(query.period_seconds);

        for statistic in &query.statistics {
            request = request.statistics(to_sdk_statistic(*statistic));
        }
        for dimension in &query.dimensions {
            request = request.dimensions(
                SdkDimension::builder()
                    .name(&dimension.name)
                    .value(&dimension.value)
                    .build(),
            );
        }

        let output = request
            .send()
            .await
            .map_err(|e| SourceError::Request(DisplayErrorContext(&e).to_string()))?;

        Ok(output.datapoints().iter().filter_map(from_sdk_datapoint).collect())
    }
}

impl MetricSource for CloudWatchSource {
    fn get_metric_statistics(&self, query: &StatisticsQuery) -> Result<Vec<Datapoint>, SourceError> {
        debug!(metric = %query.metric_name, "GetMetricStatistics");
        self.runtime.block_on(self.fetch(query))
    }
}

async fn load_sdk_config(config: &PluginConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some((access_key_id, secret_access_key)) = config.static_credentials() {
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }

    loader.load().await
}

/// The SDK config must resolve a region from flags, env or profile
fn require_region(sdk_config: &SdkConfig) -> Result<&Region, SetupError> {
    sdk_config.region().ok_or(SetupError::MissingRegion)
}

fn to_sdk_statistic(statistic: Statistic) -> SdkStatistic {
    match statistic {
        Statistic::Average => SdkStatistic::Average,
        Statistic::Sum => SdkStatistic::Sum,
        Statistic::Maximum => SdkStatistic::Maximum,
        Statistic::Minimum => SdkStatistic::Minimum,
    }
}

fn to_smithy(time: DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_millis(time.timestamp_millis())
}

fn from_smithy(time: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}

/// Datapoints without a usable timestamp are dropped
fn from_sdk_datapoint(dp: &SdkDatapoint) -> Option<Datapoint> {
    let Some(timestamp) = dp.timestamp().and_then(from_smithy) else {
        debug!("dropping datapoint without timestamp");
        return None;
    };

    Some(Datapoint {
        timestamp,
        average: dp.average(),
        sum: dp.sum(),
        maximum: dp.maximum(),
        minimum: dp.minimum(),
    })
}
