mod auth;
mod cli;
mod config;
mod error;
mod github;
mod metrics;
mod port;
mod sync;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("GITHUB_ACTIONS").as_deref() != Ok("true") {
        dotenv::dotenv().ok();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting github-sync");

    if let Err(e) = cli.execute().await {
        error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
