use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod config;
use config::OctoslackConfig;

mod error;

mod notifier;
use notifier::Notifier;

mod webhooks;

#[derive(Parser)]
#[command(version, about = "Posts GitHub webhook events to Slack")]
struct Opts {
    /// Configuration file for octoslack
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: OctoslackConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let notifier = Notifier::new(config).context("failed to create notifier")?;
    notifier.run().await?;

    info!("result: success");
    Ok(())
}
