//! Graph definition types
//!
//! Mirrors the JSON document mackerel-agent expects on stdout when
//! `MACKEREL_AGENT_PLUGIN_META` is set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display unit of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "seconds")]
    Seconds,
    #[serde(rename = "milliseconds")]
    Milliseconds,
    #[serde(rename = "bytes")]
    Bytes,
    #[serde(rename = "bytes/sec")]
    BytesPerSecond,
    #[serde(rename = "bits/sec")]
    BitsPerSecond,
    #[serde(rename = "iops")]
    Iops,
}

/// One series within a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetric {
    /// Key in the fetched stats map
    pub name: String,

    /// Series label (defaults to the title-cased name when empty)
    pub label: String,

    /// Stack this series on top of the previous ones
    #[serde(default)]
    pub stacked: bool,
}

impl GraphMetric {
    /// Create an unstacked series
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            stacked: false,
        }
    }

    /// Create a stacked series
    pub fn stacked(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            stacked: true,
            ..Self::new(name, label)
        }
    }
}

/// A graph: label, unit and ordered series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphs {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<GraphMetric>,
}

/// Top-level graph definition document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDef {
    pub graphs: BTreeMap<String, Graphs>,
}

/// Title-case a string the way mackerel labels are derived.
///
/// Every letter that follows a separator is uppercased. Separators are
/// ASCII characters other than letters, digits and `_`, plus whitespace.
pub fn title(s: &str) -> String {
    let mut prev = ' ';
    s.chars()
        .map(|c| {
            let out = if is_separator(prev) {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            };
            prev = c;
            out
        })
        .collect()
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
