//! Built-in defaults (layer 1)

use super::layer::ConfigLayer;

/// Metric key prefix used when none is configured
pub const DEFAULT_METRIC_KEY_PREFIX: &str = "s3-extended";

/// The lowest-precedence configuration layer
pub fn builtin_layer() -> ConfigLayer {
    ConfigLayer {
        metric_key_prefix: Some(DEFAULT_METRIC_KEY_PREFIX.to_string()),
        ..ConfigLayer::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layer() {
        let layer = builtin_layer();
        assert_eq!(layer.metric_key_prefix.as_deref(), Some("s3-extended"));
        assert!(layer.bucket_name.is_none());
        assert!(layer.filter_id.is_none());
        assert!(layer.region.is_none());
    }
}
