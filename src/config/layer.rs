//! Configuration layers
//!
//! A layer holds optional values for every setting. Overlaying two layers
//! keeps the base value unless the overlay sets one.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SetupError;

/// One source of configuration values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub bucket_name: Option<String>,
    pub filter_id: Option<String>,
    pub metric_key_prefix: Option<String>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SetupError> {
        let contents = fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse a layer from a TOML string
    pub fn parse(contents: &str) -> Result<Self, SetupError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `overlay` on top of `self`; set fields in the overlay win
    pub fn overlay(self, overlay: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            access_key_id: overlay.access_key_id.or(self.access_key_id),
            secret_access_key: overlay.secret_access_key.or(self.secret_access_key),
            region: overlay.region.or(self.region),
            bucket_name: overlay.bucket_name.or(self.bucket_name),
            filter_id: overlay.filter_id.or(self.filter_id),
            metric_key_prefix: overlay.metric_key_prefix.or(self.metric_key_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_wins_when_set() {
        let base = ConfigLayer {
            region: Some("us-east-1".to_string()),
            bucket_name: Some("base".to_string()),
            ..ConfigLayer::default()
        };
        let overlay = ConfigLayer {
            bucket_name: Some("overlay".to_string()),
            ..ConfigLayer::default()
        };

        let merged = base.overlay(overlay);
        assert_eq!(merged.bucket_name.as_deref(), Some("overlay"));
        assert_eq!(merged.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_parse_toml() {
        let layer = ConfigLayer::parse(
            r#"
bucket_name = "assets"
filter_id = "EntireBucket"
"#,
        )
        .unwrap();
        assert_eq!(layer.bucket_name.as_deref(), Some("assets"));
        assert_eq!(layer.filter_id.as_deref(), Some("EntireBucket"));
        assert!(layer.access_key_id.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = ConfigLayer::parse("bucket = \"typo\"\n").unwrap_err();
        assert!(matches!(err, SetupError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_toml() {
        assert!(ConfigLayer::parse("bucket_name = ").is_err());
    }
}
