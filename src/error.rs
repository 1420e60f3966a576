//! Error types
//!
//! Two failure kinds exist. [`NoDataError`] is per metric group and is
//! logged and swallowed by the collector. [`SetupError`] is fatal and
//! aborts the run before any collection starts.

use std::io;
use std::path::PathBuf;

use crate::source::SourceError;

/// A metric group produced no usable datapoint
#[derive(Debug, thiserror::Error)]
pub enum NoDataError {
    #[error("{metric}: fetched no datapoints")]
    Empty { metric: String },

    #[error("{metric}: {source}")]
    Query {
        metric: String,
        #[source]
        source: SourceError,
    },
}

impl NoDataError {
    /// CloudWatch metric the error refers to
    pub fn metric(&self) -> &str {
        match self {
            NoDataError::Empty { metric } | NoDataError::Query { metric, .. } => metric,
        }
    }
}

/// Configuration or client construction failed
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting '{0}'")]
    MissingField(&'static str),

    #[error("No AWS region configured; pass --region or set AWS_REGION")]
    MissingRegion,

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}
