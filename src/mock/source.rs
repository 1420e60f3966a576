//! Configurable mock CloudWatch source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::source::{Datapoint, MetricSource, SourceError, StatisticsQuery};

use super::failure::{FailureConfig, FailureInjector};

/// Mock metric source with canned responses
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    responses: Arc<Mutex<HashMap<String, Vec<Datapoint>>>>,
    failures: Arc<Mutex<FailureInjector>>,
    queries: Arc<Mutex<Vec<StatisticsQuery>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `datapoints` for every query of `metric`
    pub fn set_datapoints(&self, metric: impl Into<String>, datapoints: Vec<Datapoint>) {
        lock(&self.responses).insert(metric.into(), datapoints);
    }

    /// Builder form of [`MockSource::set_datapoints`]
    pub fn with_datapoints(self, metric: impl Into<String>, datapoints: Vec<Datapoint>) -> Self {
        self.set_datapoints(metric, datapoints);
        self
    }

    /// Fail queries of `metric`
    pub fn inject_failure(&self, metric: impl Into<String>, config: FailureConfig) {
        lock(&self.failures).inject(metric, config);
    }

    /// Fail every query of `metric` with `message`
    pub fn inject_error(&self, metric: impl Into<String>, message: impl Into<String>) {
        self.inject_failure(metric, FailureConfig::error(message));
    }

    /// Queries received so far, in call order
    pub fn queries(&self) -> Vec<StatisticsQuery> {
        lock(&self.queries).clone()
    }
}

impl MetricSource for MockSource {
    fn get_metric_statistics(&self, query: &StatisticsQuery) -> Result<Vec<Datapoint>, SourceError> {
        lock(&self.queries).push(query.clone());

        if let Some(failure) = lock(&self.failures).check(&query.metric_name) {
            return Err(SourceError::Request(failure.message.clone()));
        }

        Ok(lock(&self.responses)
            .get(&query.metric_name)
            .cloned()
            .unwrap_or_default())
    }
}
