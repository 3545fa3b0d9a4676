use clap::Parser;
use rvdash::{cli::DiscoveryArgs, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_discovery(DiscoveryArgs::parse())?;
    rvdash::run(config).await
}
