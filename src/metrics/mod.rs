pub mod onboarding;
pub mod properties;
pub mod pull_requests;
pub mod workflows;

use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Signed hours from `from` to `to`, millisecond precision.
#[allow(clippy::cast_precision_loss)]
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingStats {
    pub login: String,
    pub join_date: DateTime<Utc>,
    pub first_commit: Option<DateTime<Utc>>,
    pub tenth_commit: Option<DateTime<Utc>>,
    pub first_pr: Option<DateTime<Utc>>,
    pub tenth_pr: Option<DateTime<Utc>>,
    pub first_review: Option<DateTime<Utc>>,
    pub time_to_first_commit: Option<f64>,
    pub time_to_10th_commit: Option<f64>,
    pub time_to_first_pr: Option<f64>,
    pub time_to_10th_pr: Option<f64>,
    pub initial_review_response_time: Option<f64>,
}

impl OnboardingStats {
    /// Whether anything was learned about the developer at all.
    pub fn has_anchor(&self) -> bool {
        [
            self.first_commit,
            self.tenth_commit,
            self.first_pr,
            self.tenth_pr,
            self.first_review,
        ]
        .iter()
        .any(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestMetrics {
    pub repository: String,
    pub pull_request_id: u64,
    pub size: u64,
    pub lifetime_hours: f64,
    pub pickup_time_hours: f64,
    /// 1 if merged, 0 otherwise.
    pub success: u8,
    pub review_participation: usize,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub comments: u64,
    pub review_comments: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    pub days: i64,
    pub median_duration: Option<f64>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub mean_duration: Option<f64>,
    pub total_runs: usize,
    pub total_failures: usize,
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowMetrics {
    pub repository: String,
    pub workflow_id: u64,
    pub workflow_name: String,
    pub windows: Vec<WindowStats>,
}
