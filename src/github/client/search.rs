use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::Result;
use crate::github::types::{Commit, PullRequest, Review};

/// Anchors go up to the 10th event, so a single page of ten is enough.
pub const ANCHOR_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CommitHitDto {
    sha: String,
    commit: CommitDto,
}

#[derive(Debug, Deserialize)]
struct CommitDto {
    author: Option<CommitAuthorDto>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorDto {
    date: Option<DateTime<Utc>>,
}

impl From<CommitHitDto> for Commit {
    fn from(hit: CommitHitDto) -> Self {
        Self {
            sha: hit.sha,
            authored_at: hit.commit.author.and_then(|a| a.date),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssueHitDto {
    id: u64,
    number: u64,
    created_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    repository_url: String,
    pull_request: Option<PullRequestRefDto>,
}

#[derive(Debug, Deserialize)]
struct PullRequestRefDto {
    merged_at: Option<DateTime<Utc>>,
}

impl IssueHitDto {
    /// `(owner, repo)` parsed from `.../repos/{owner}/{repo}`.
    fn repository(&self) -> Option<(&str, &str)> {
        let (_, path) = self.repository_url.rsplit_once("/repos/")?;
        path.split_once('/')
    }
}

impl From<IssueHitDto> for PullRequest {
    fn from(hit: IssueHitDto) -> Self {
        Self {
            id: hit.id,
            number: hit.number,
            created_at: hit.created_at,
            closed_at: hit.closed_at,
            merged_at: hit.pull_request.and_then(|pr| pr.merged_at),
        }
    }
}

impl GitHubClient {
    async fn search_issues(&self, query: &str) -> Result<Vec<IssueHitDto>> {
        let url = self.endpoint("search/issues")?;
        let response: SearchResponse<IssueHitDto> = self
            .get_json(
                url,
                &[
                    ("q", query.to_string()),
                    ("sort", "created".to_string()),
                    ("order", "asc".to_string()),
                    ("per_page", ANCHOR_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    /// Earliest commits authored by `author` in `org`, ascending by author date.
    pub async fn fetch_commits_by_author(&self, org: &str, author: &str) -> Result<Vec<Commit>> {
        let url = self.endpoint("search/commits")?;
        let response: SearchResponse<CommitHitDto> = self
            .get_json(
                url,
                &[
                    ("q", format!("author:{author} org:{org}")),
                    ("sort", "author-date".to_string()),
                    ("order", "asc".to_string()),
                    ("per_page", ANCHOR_PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        debug!("Found {} commits for {author} in {org}", response.items.len());
        Ok(response.items.into_iter().map(Commit::from).collect())
    }

    /// Earliest merged pull requests opened by `author` in `org`.
    pub async fn fetch_merged_pull_requests(
        &self,
        org: &str,
        author: &str,
    ) -> Result<Vec<PullRequest>> {
        let hits = self
            .search_issues(&format!("author:{author} type:pr org:{org} is:merged"))
            .await?;

        debug!("Found {} merged PRs for {author} in {org}", hits.len());
        Ok(hits.into_iter().map(PullRequest::from).collect())
    }

    /// Approvals submitted by `approver` on the earliest pull requests they
    /// approved in `org`. Pull requests whose reviews cannot be read are
    /// skipped.
    pub async fn fetch_approved_reviews(&self, org: &str, approver: &str) -> Result<Vec<Review>> {
        let hits = self
            .search_issues(&format!("reviewed-by:{approver} type:pr org:{org} review:approved"))
            .await?;

        let mut approvals = Vec::new();
        for hit in &hits {
            let Some((owner, repo)) = hit.repository() else {
                warn!("Unexpected repository URL: {}", hit.repository_url);
                continue;
            };

            let reviews = match self.fetch_reviews(owner, repo, hit.number).await {
                Ok(reviews) => reviews,
                Err(e) => {
                    warn!("Error getting reviews for {owner}/{repo}#{}: {e}", hit.number);
                    continue;
                }
            };
            approvals.extend(reviews.into_iter().filter(|r| r.is_approval_by(approver)));
        }

        debug!("Found {} approvals by {approver} in {org}", approvals.len());
        Ok(approvals)
    }
}
