//! Plugin configuration
//!
//! Settings are resolved from three layers, last wins per field:
//! 1. Built-in defaults
//! 2. Optional TOML config file (`--config`)
//! 3. CLI flags

mod defaults;
mod layer;

pub use defaults::{builtin_layer, DEFAULT_METRIC_KEY_PREFIX};
pub use layer::ConfigLayer;

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SetupError;

/// Fully resolved plugin settings
#[derive(Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub bucket_name: String,
    pub filter_id: Option<String>,
    pub metric_key_prefix: String,
}

impl PluginConfig {
    /// Merge defaults, the optional config file and CLI overrides, then validate
    pub fn resolve(config_path: Option<&Path>, cli: ConfigLayer) -> Result<Self, SetupError> {
        let mut layers = vec![builtin_layer()];
        if let Some(path) = config_path {
            debug!(path = %path.display(), "loading config file");
            layers.push(ConfigLayer::from_file(path)?);
        }
        layers.push(cli);

        let merged = layers
            .into_iter()
            .fold(ConfigLayer::default(), ConfigLayer::overlay);

        let config = Self::from_layer(merged)?;
        debug!(config = ?config, "resolved configuration");
        Ok(config)
    }

    /// Validate a merged layer into settings
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, SetupError> {
        let bucket_name = non_empty(layer.bucket_name).ok_or(SetupError::MissingField("bucket_name"))?;

        Ok(Self {
            access_key_id: non_empty(layer.access_key_id),
            secret_access_key: non_empty(layer.secret_access_key),
            region: non_empty(layer.region),
            bucket_name,
            filter_id: non_empty(layer.filter_id),
            metric_key_prefix: layer.metric_key_prefix.unwrap_or_default(),
        })
    }

    /// Static credentials, when both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            (None, None) => None,
            _ => {
                warn!("Only one of access_key_id/secret_access_key is set; using the default credential chain");
                None
            }
        }
    }

}

/// Prefix for metric keys; empty falls back to the default
pub fn effective_key_prefix(prefix: &str) -> &str {
    if prefix.is_empty() {
        DEFAULT_METRIC_KEY_PREFIX
    } else {
        prefix
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("filter_id", &self.filter_id)
            .field("metric_key_prefix", &self.metric_key_prefix)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_layer() -> ConfigLayer {
        ConfigLayer {
            bucket_name: Some("logs".to_string()),
            filter_id: Some("EntireBucket".to_string()),
            ..ConfigLayer::default()
        }
    }

    #[test]
    fn test_resolve_cli_only() {
        let config = PluginConfig::resolve(None, cli_layer()).unwrap();
        assert_eq!(config.bucket_name, "logs");
        assert_eq!(config.filter_id.as_deref(), Some("EntireBucket"));
        assert_eq!(config.metric_key_prefix, "s3-extended");
        assert!(config.region.is_none());
    }

    #[test]
    fn test_resolve_file_then_cli() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
bucket_name = "from-file"
filter_id = "filter-a"
region = "ap-northeast-1"
metric_key_prefix = "assets"
"#
        )
        .unwrap();

        let cli = ConfigLayer {
            bucket_name: Some("from-cli".to_string()),
            ..ConfigLayer::default()
        };
        let config = PluginConfig::resolve(Some(file.path()), cli).unwrap();

        assert_eq!(config.bucket_name, "from-cli");
        assert_eq!(config.filter_id.as_deref(), Some("filter-a"));
        assert_eq!(config.region.as_deref(), Some("ap-northeast-1"));
        assert_eq!(config.metric_key_prefix, "assets");
    }

    #[test]
    fn test_missing_bucket_is_setup_error() {
        let cli = ConfigLayer {
            filter_id: Some("f".to_string()),
            ..ConfigLayer::default()
        };
        let err = PluginConfig::resolve(None, cli).unwrap_err();
        assert!(matches!(err, SetupError::MissingField("bucket_name")));
    }

    #[test]
    fn test_bucket_without_filter_resolves() {
        let cli = ConfigLayer {
            bucket_name: Some("assets".to_string()),
            ..ConfigLayer::default()
        };
        let config = PluginConfig::resolve(None, cli).unwrap();
        assert_eq!(config.bucket_name, "assets");
        assert!(config.filter_id.is_none());
    }

    #[test]
    fn test_empty_filter_is_treated_as_unset() {
        let cli = ConfigLayer {
            bucket_name: Some("assets".to_string()),
            filter_id: Some(String::new()),
            ..ConfigLayer::default()
        };
        let config = PluginConfig::resolve(None, cli).unwrap();
        assert!(config.filter_id.is_none());
    }

    #[test]
    fn test_missing_config_file() {
        let err = PluginConfig::resolve(Some(Path::new("/nonexistent/s3.toml")), cli_layer()).unwrap_err();
        assert!(matches!(err, SetupError::Io { .. }));
    }

    #[test]
    fn test_static_credentials_require_both() {
        let mut config = PluginConfig::resolve(None, cli_layer()).unwrap();
        assert!(config.static_credentials().is_none());

        config.access_key_id = Some("AKIA".to_string());
        assert!(config.static_credentials().is_none());

        config.secret_access_key = Some("secret".to_string());
        assert_eq!(config.static_credentials(), Some(("AKIA", "secret")));
    }

    #[test]
    fn test_empty_prefix_falls_back() {
        let cli = ConfigLayer {
            metric_key_prefix: Some(String::new()),
            ..cli_layer()
        };
        let config = PluginConfig::resolve(None, cli).unwrap();
        assert_eq!(config.metric_key_prefix, "");
        assert_eq!(effective_key_prefix(&config.metric_key_prefix), "s3-extended");
        assert_eq!(effective_key_prefix("assets"), "assets");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cli = ConfigLayer {
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("super-secret".to_string()),
            ..cli_layer()
        };
        let config = PluginConfig::resolve(None, cli).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("AKIA"));
    }
}
