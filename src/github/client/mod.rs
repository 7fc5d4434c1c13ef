mod actions;
mod core;
mod orgs;
mod pulls;
mod search;

use async_trait::async_trait;

pub use self::core::GitHubClient;
use super::types::{
    Commit, MemberAddEvent, PullRequest, PullRequestDetail, RateLimit, Repository, Review,
    WorkflowRun,
};
use super::SourceControl;
use crate::error::Result;

#[async_trait]
impl SourceControl for GitHubClient {
    async fn rate_limit(&self) -> Result<RateLimit> {
        self.fetch_rate_limit().await
    }

    async fn list_repositories(&self, orgs: &[String]) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        for org in orgs {
            repos.extend(self.fetch_repositories(org).await?);
        }
        Ok(repos)
    }

    async fn list_member_add_events(&self, enterprise: &str) -> Result<Vec<MemberAddEvent>> {
        self.fetch_member_add_events(enterprise).await
    }

    async fn search_commits(&self, org: &str, author: &str) -> Result<Vec<Commit>> {
        self.fetch_commits_by_author(org, author).await
    }

    async fn search_merged_pull_requests(
        &self,
        org: &str,
        author: &str,
    ) -> Result<Vec<PullRequest>> {
        self.fetch_merged_pull_requests(org, author).await
    }

    async fn search_approved_reviews(&self, org: &str, approver: &str) -> Result<Vec<Review>> {
        self.fetch_approved_reviews(org, approver).await
    }

    async fn list_closed_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>> {
        self.fetch_closed_pull_requests(repo).await
    }

    async fn get_pull_request(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<PullRequestDetail> {
        self.fetch_pull_request(repo, number).await
    }

    async fn list_reviews(&self, repo: &Repository, number: u64) -> Result<Vec<Review>> {
        self.fetch_reviews(&repo.owner, &repo.name, number).await
    }

    async fn list_workflow_runs(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Vec<WorkflowRun>> {
        self.fetch_workflow_runs(repo, branch).await
    }
}
