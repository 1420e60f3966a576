//! CloudWatch client setup against a scrubbed AWS environment
//!
//! Kept in its own test binary with a single test: it rewrites process
//! environment variables, which must not race other tests.

use mp_aws_s3_extended::{CloudWatchSource, ConfigLayer, PluginConfig, SetupError};

const REGION_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION", "AWS_PROFILE"];

fn config(region: Option<&str>) -> PluginConfig {
    let cli = ConfigLayer {
        bucket_name: Some("assets".to_string()),
        region: region.map(str::to_string),
        ..ConfigLayer::default()
    };
    PluginConfig::resolve(None, cli).unwrap()
}

#[test]
fn test_connect_requires_region() {
    let dir = tempfile::tempdir().unwrap();
    for var in REGION_VARS {
        std::env::remove_var(var);
    }
    std::env::set_var("AWS_CONFIG_FILE", dir.path().join("config"));
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", dir.path().join("credentials"));
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

    match CloudWatchSource::connect(&config(None)) {
        Err(SetupError::MissingRegion) => {}
        Err(other) => panic!("expected MissingRegion, got {}", other),
        Ok(_) => panic!("client built without a region"),
    }

    // an explicit region needs no environment
    assert!(CloudWatchSource::connect(&config(Some("us-east-1"))).is_ok());
}
