use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use crate::config::{Config, ConnectionArgs};
use crate::github::GitHubClient;
use crate::port::PortClient;
use crate::sync::{check_rate_limit, MetricsSync};

#[derive(Parser)]
#[command(name = "github-sync")]
#[command(author, version, about = "CLI to pull metrics from GitHub to Port", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Derive and log payloads without writing to Port
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send onboarding metrics to Port
    OnboardingMetrics,

    /// Send PR metrics to Port
    PrMetrics,

    /// Send GitHub Workflow metrics to Port
    WorkflowMetrics,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let Some(config) = Config::validate(&self.connection) else {
            println!(
                "Please provide env vars PORT_CLIENT_ID, PORT_CLIENT_SECRET, \
                 X_GITHUB_TOKEN, X_GITHUB_ENTERPRISE, and X_GITHUB_ORGS"
            );
            return Ok(());
        };

        let github = GitHubClient::new(&config.github_url, config.github_token)?;
        check_rate_limit(&github).await?;

        let port = PortClient::connect(&config.port_url, &config.port_credentials).await?;

        let sync = MetricsSync::new(&github, &port, &config.orgs).dry_run(self.dry_run);
        let repos = sync.repositories().await?;

        let summary = match self.command {
            Commands::OnboardingMetrics => {
                info!("Calculating onboarding metrics");
                sync.sync_onboarding(&config.enterprise).await?
            }
            Commands::PrMetrics => {
                info!("Calculating PR metrics");
                sync.sync_pull_requests(&repos).await?
            }
            Commands::WorkflowMetrics => {
                info!("Calculating workflow metrics");
                sync.sync_workflows(&repos, Utc::now()).await?
            }
        };

        info!("Done: {summary}");
        Ok(())
    }
}
