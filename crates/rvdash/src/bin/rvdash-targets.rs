use clap::Parser;
use rvdash::{cli::TargetsArgs, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_targets(TargetsArgs::parse())?;
    rvdash::run(config).await
}
