//! mackerel-plugin-aws-s3-extended CLI
//!
//! Entry point invoked periodically by mackerel-agent.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use mp_aws_s3_extended::logging::init_logging;
use mp_aws_s3_extended::{CloudWatchSource, ConfigLayer, PluginConfig, S3ExtendedPlugin};
use mp_plugin::PluginRunner;
use tracing::error;

#[derive(Parser)]
#[command(name = "mackerel-plugin-aws-s3-extended")]
#[command(about = "Mackerel plugin for Amazon S3 request metrics", version)]
struct Cli {
    /// AWS Access Key ID
    #[arg(long)]
    access_key_id: Option<String>,

    /// AWS Secret Access Key
    #[arg(long)]
    secret_access_key: Option<String>,

    /// AWS Region
    #[arg(long)]
    region: Option<String>,

    /// S3 bucket name
    #[arg(long)]
    bucket_name: Option<String>,

    /// S3 FilterId in the bucket's metrics configuration
    #[arg(long)]
    filter_id: Option<String>,

    /// Metric key prefix (default: s3-extended)
    #[arg(long)]
    metric_key_prefix: Option<String>,

    /// Path to a TOML config file; flags override its values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            region: self.region.clone(),
            bucket_name: self.bucket_name.clone(),
            filter_id: self.filter_id.clone(),
            metric_key_prefix: self.metric_key_prefix.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match PluginConfig::resolve(cli.config.as_deref(), cli.config_layer()) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let source = match CloudWatchSource::connect(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let runner = PluginRunner::new(S3ExtendedPlugin::from_config(source, &config));
    if let Err(e) = runner.run() {
        error!("{}", e);
        process::exit(1);
    }
}
