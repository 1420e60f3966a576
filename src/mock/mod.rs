//! Mock Metric Source
//!
//! In-process stand-in for CloudWatch used by unit and integration tests.
//!
//! - Canned datapoints per CloudWatch metric name
//! - Failure injection per metric, optionally for a limited number of calls
//! - A log of every query received

mod failure;
mod source;

pub use failure::{FailureConfig, FailureInjector};
pub use source::MockSource;
