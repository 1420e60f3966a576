//! Plugin trait and output runner
//!
//! The runner owns the agent-facing protocol:
//! - value lines: `<key>\t<value>\t<epoch seconds>` on stdout
//! - graph definitions: header line followed by a single JSON document

use std::collections::BTreeMap;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{FetchError, RunError};
use crate::graph::{title, GraphDef, Graphs};
use crate::{PLUGIN_META_ENV, PLUGIN_META_HEADER};

/// Fetched values keyed by series name
pub type Stats = BTreeMap<String, f64>;

/// A metric plugin driven by [`PluginRunner`]
pub trait Plugin {
    /// Collect the current values
    fn fetch_metrics(&self) -> Result<Stats, FetchError>;

    /// Graph metadata, keyed by graph name
    fn graph_definition(&self) -> BTreeMap<String, Graphs>;

    /// Prefix prepended to every graph key, if any
    fn metric_key_prefix(&self) -> Option<String> {
        None
    }
}

/// Renders a plugin's values or graph definitions
pub struct PluginRunner<P> {
    plugin: P,
}

impl<P: Plugin> PluginRunner<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }

    /// Print definitions when the agent asks for metadata, values otherwise
    pub fn run(&self) -> Result<(), RunError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let meta = std::env::var(PLUGIN_META_ENV).unwrap_or_default();
        if meta.is_empty() {
            self.output_values(&mut out, Utc::now())
        } else {
            self.output_definitions(&mut out)
        }
    }

    /// Fetch and print one line per graph series that has a value
    pub fn output_values<W: Write>(&self, w: &mut W, now: DateTime<Utc>) -> Result<(), RunError> {
        let stats = self.plugin.fetch_metrics().map_err(RunError::Fetch)?;
        let prefix = self.plugin.metric_key_prefix();

        for (graph_key, graph) in self.plugin.graph_definition() {
            for metric in &graph.metrics {
                let Some(&value) = stats.get(&metric.name) else {
                    debug!(metric = %metric.name, "no value fetched");
                    continue;
                };

                let key = metric_key(prefix.as_deref(), &graph_key, &metric.name);
                if !value.is_finite() {
                    warn!("Invalid value: \"{}\" does not output {}", key, value);
                    continue;
                }

                writeln!(w, "{}\t{:.6}\t{}", key, value, now.timestamp())?;
            }
        }

        Ok(())
    }

    /// Print the graph definition document with prefixed keys
    pub fn output_definitions<W: Write>(&self, w: &mut W) -> Result<(), RunError> {
        writeln!(w, "{}", PLUGIN_META_HEADER)?;

        let doc = self.graph_def();
        let json = serde_json::to_string(&doc)?;
        writeln!(w, "{}", json)?;

        Ok(())
    }

    /// Build the definition document the agent consumes
    pub fn graph_def(&self) -> GraphDef {
        let prefix = self.plugin.metric_key_prefix();
        let mut doc = GraphDef::default();

        for (key, mut graph) in self.plugin.graph_definition() {
            let key = match prefix.as_deref() {
                Some(p) if key.is_empty() => p.to_string(),
                Some(p) => format!("{}.{}", p, key),
                None => key,
            };

            if graph.label.is_empty() {
                graph.label = title(&key);
            }
            for metric in &mut graph.metrics {
                if metric.label.is_empty() {
                    metric.label = title(&metric.name);
                }
            }

            doc.graphs.insert(key, graph);
        }

        doc
    }
}

fn metric_key(prefix: Option<&str>, graph_key: &str, name: &str) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(p) = prefix {
        parts.push(p);
    }
    if !graph_key.is_empty() {
        parts.push(graph_key);
    }
    parts.push(name);
    parts.join(".")
}
