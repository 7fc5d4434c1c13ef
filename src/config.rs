use clap::Args;

use crate::auth::{PortCredentials, Token};

/// Connection settings, read from flags or the environment.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Port client id
    #[arg(long, global = true, env = "PORT_CLIENT_ID", hide_env_values = true)]
    pub port_client_id: Option<String>,

    /// Port client secret
    #[arg(long, global = true, env = "PORT_CLIENT_SECRET", hide_env_values = true)]
    pub port_client_secret: Option<String>,

    /// GitHub token with org and enterprise audit-log read access
    #[arg(long, global = true, env = "X_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub enterprise slug used for audit-log queries
    #[arg(long, global = true, env = "X_GITHUB_ENTERPRISE")]
    pub enterprise: Option<String>,

    /// Comma-separated GitHub organizations
    #[arg(long, global = true, env = "X_GITHUB_ORGS")]
    pub orgs: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, default_value = "https://api.github.com")]
    pub github_url: String,

    /// Port API base URL
    #[arg(long, global = true, default_value = "https://api.getport.io")]
    pub port_url: String,
}

#[derive(Debug)]
pub struct Config {
    pub github_token: Token,
    pub port_credentials: PortCredentials,
    pub enterprise: String,
    pub orgs: Vec<String>,
    pub github_url: String,
    pub port_url: String,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn split_orgs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_owned)
        .collect()
}

impl Config {
    /// `None` when any required setting is missing or blank.
    pub fn validate(args: &ConnectionArgs) -> Option<Self> {
        let client_id = present(args.port_client_id.as_ref())?;
        let client_secret = present(args.port_client_secret.as_ref())?;
        let github_token = present(args.github_token.as_ref())?;
        let enterprise = present(args.enterprise.as_ref())?;

        let orgs = split_orgs(present(args.orgs.as_ref())?);
        if orgs.is_empty() {
            return None;
        }

        Some(Self {
            github_token: Token::from(github_token),
            port_credentials: PortCredentials::new(client_id, client_secret),
            enterprise: enterprise.to_owned(),
            orgs,
            github_url: args.github_url.clone(),
            port_url: args.port_url.clone(),
        })
    }
}
