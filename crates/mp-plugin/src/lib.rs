//! Mackerel Plugin Helpers
//!
//! Host-side plumbing for mackerel-agent metric plugins: graph definition
//! types, the [`Plugin`] trait, and the runner that renders fetched values
//! and graph metadata in the agent's plugin protocol.

pub mod error;
pub mod graph;
pub mod runner;

pub use error::{FetchError, RunError};
pub use graph::{title, GraphDef, GraphMetric, Graphs, Unit};
pub use runner::{Plugin, PluginRunner, Stats};

/// Environment variable the agent sets when it asks for graph definitions.
pub const PLUGIN_META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

/// Header line preceding the graph definition JSON.
pub const PLUGIN_META_HEADER: &str = "# mackerel-agent-plugin";
