mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
pub use client::GitHubClient;
use types::{
    Commit, MemberAddEvent, PullRequest, PullRequestDetail, RateLimit, Repository, Review,
    WorkflowRun,
};

/// Read-only view of the source-control platform.
///
/// Every call returns a single bounded page, ordered the way the metric
/// derivation expects: commits ascending by author date, pull requests
/// ascending by creation date.
#[async_trait]
pub trait SourceControl: Sync {
    async fn rate_limit(&self) -> Result<RateLimit>;

    async fn list_repositories(&self, orgs: &[String]) -> Result<Vec<Repository>>;

    async fn list_member_add_events(&self, enterprise: &str) -> Result<Vec<MemberAddEvent>>;

    async fn search_commits(&self, org: &str, author: &str) -> Result<Vec<Commit>>;

    async fn search_merged_pull_requests(&self, org: &str, author: &str)
        -> Result<Vec<PullRequest>>;

    async fn search_approved_reviews(&self, org: &str, approver: &str) -> Result<Vec<Review>>;

    async fn list_closed_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>>;

    async fn get_pull_request(&self, repo: &Repository, number: u64)
        -> Result<PullRequestDetail>;

    async fn list_reviews(&self, repo: &Repository, number: u64) -> Result<Vec<Review>>;

    async fn list_workflow_runs(&self, repo: &Repository, branch: &str)
        -> Result<Vec<WorkflowRun>>;
}
