use chrono::{DateTime, Utc};

pub const SUCCESS_CONCLUSION: &str = "success";
pub const APPROVED_STATE: &str = "APPROVED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub owner: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub authored_at: Option<DateTime<Utc>>,
}

/// A pull request as returned by list and search endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestDetail {
    pub id: u64,
    pub number: u64,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub comments: u64,
    pub review_comments: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: u64,
    pub reviewer: Option<String>,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn is_approval_by(&self, login: &str) -> bool {
        self.state == APPROVED_STATE
            && self
                .reviewer
                .as_deref()
                .is_some_and(|reviewer| reviewer.eq_ignore_ascii_case(login))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: u64,
    pub workflow_id: u64,
    pub name: String,
    /// `None` while the run has not finished.
    pub conclusion: Option<String>,
    pub run_number: u64,
    pub event: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowRun {
    pub fn is_success(&self) -> bool {
        self.conclusion.as_deref() == Some(SUCCESS_CONCLUSION)
    }

    /// Wall-clock duration in seconds, 0 when either end is unknown.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> f64 {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => {
                (completed - started).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }
}

/// An `org.add_member` entry of the enterprise audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAddEvent {
    pub user: String,
    pub user_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub used: u64,
    pub reset_at: DateTime<Utc>,
}
