//! Failure Injection for Mock Source
//!
//! Makes queries for selected metrics fail, for testing the collector's
//! per-group error handling.

use std::collections::HashMap;

/// Failure configuration for a metric
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// Error message returned to the caller
    pub message: String,
    /// Number of times to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    /// Create a config that always fails with `message`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fail_count: None,
        }
    }

    /// Set the number of times to fail before succeeding
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }
}

/// Failure injector keyed by CloudWatch metric name
#[derive(Debug, Default)]
pub struct FailureInjector {
    configs: HashMap<String, FailureConfig>,
    call_counts: HashMap<String, u32>,
}

impl FailureInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a failure for a metric
    pub fn inject(&mut self, metric: impl Into<String>, config: FailureConfig) {
        let metric = metric.into();
        self.call_counts.insert(metric.clone(), 0);
        self.configs.insert(metric, config);
    }

    /// Clear all injected failures
    pub fn clear(&mut self) {
        self.configs.clear();
        self.call_counts.clear();
    }

    /// Record a call and return the failure to apply, if any
    pub fn check(&mut self, metric: &str) -> Option<&FailureConfig> {
        let config = self.configs.get(metric)?;
        let count = self.call_counts.entry(metric.to_string()).or_insert(0);
        *count += 1;

        match config.fail_count {
            Some(limit) if *count > limit => None,
            _ => Some(config),
        }
    }
}
