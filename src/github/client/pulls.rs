use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::Result;
use crate::github::types::{PullRequest, PullRequestDetail, Repository, Review};

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct PullRequestDto {
    id: u64,
    number: u64,
    created_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    review_comments: u64,
}

impl From<PullRequestDto> for PullRequest {
    fn from(dto: PullRequestDto) -> Self {
        Self {
            id: dto.id,
            number: dto.number,
            created_at: dto.created_at,
            closed_at: dto.closed_at,
            merged_at: dto.merged_at,
        }
    }
}

impl From<PullRequestDto> for PullRequestDetail {
    fn from(dto: PullRequestDto) -> Self {
        Self {
            id: dto.id,
            number: dto.number,
            additions: dto.additions,
            deletions: dto.deletions,
            changed_files: dto.changed_files,
            comments: dto.comments,
            review_comments: dto.review_comments,
            created_at: dto.created_at,
            closed_at: dto.closed_at,
            merged_at: dto.merged_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewDto {
    id: u64,
    user: Option<UserDto>,
    state: String,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    login: String,
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        Self {
            id: dto.id,
            reviewer: dto.user.map(|u| u.login),
            state: dto.state,
            submitted_at: dto.submitted_at,
        }
    }
}

impl GitHubClient {
    pub async fn fetch_closed_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>> {
        let url = self.repo_endpoint(&repo.owner, &repo.name, "pulls")?;
        let pulls: Vec<PullRequestDto> = self
            .get_json(
                url,
                &[("state", "closed".to_string()), ("per_page", PAGE_SIZE.to_string())],
            )
            .await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    pub async fn fetch_pull_request(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<PullRequestDetail> {
        let url = self.repo_endpoint(&repo.owner, &repo.name, &format!("pulls/{number}"))?;
        let pull: PullRequestDto = self.get_json(url, &[] as &[(&str, &str)]).await?;
        Ok(pull.into())
    }

    /// Reviews in submission order, as the API returns them.
    pub async fn fetch_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>> {
        let url = self.repo_endpoint(owner, repo, &format!("pulls/{number}/reviews"))?;
        let reviews: Vec<ReviewDto> = self
            .get_json(url, &[("per_page", PAGE_SIZE.to_string())])
            .await?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }
}
