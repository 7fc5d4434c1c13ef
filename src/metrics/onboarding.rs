use chrono::{DateTime, Utc};
use serde_json::Value;

use super::properties::ONBOARDING_PROPERTIES;
use super::{hours_between, OnboardingStats};
use crate::github::types::{Commit, PullRequest, Review};
use crate::port::Properties;

/// Index of the "10th" anchor in an ascending event list.
const TENTH: usize = 9;

/// First and 10th timestamps of an unordered set.
fn anchors(mut timestamps: Vec<DateTime<Utc>>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    timestamps.sort_unstable();
    (timestamps.first().copied(), timestamps.get(TENTH).copied())
}

fn since_join(join_date: DateTime<Utc>, anchor: Option<DateTime<Utc>>) -> Option<f64> {
    anchor.map(|at| hours_between(join_date, at))
}

/// Onboarding statistics for `login` from everything they did across
/// organizations. Events without a timestamp are ignored.
pub fn derive(
    login: &str,
    join_date: DateTime<Utc>,
    commits: &[Commit],
    pull_requests: &[PullRequest],
    reviews: &[Review],
) -> OnboardingStats {
    let (first_commit, tenth_commit) =
        anchors(commits.iter().filter_map(|c| c.authored_at).collect());
    let (first_pr, tenth_pr) =
        anchors(pull_requests.iter().filter_map(|pr| pr.created_at).collect());
    let first_review = reviews.iter().filter_map(|r| r.submitted_at).min();

    OnboardingStats {
        login: login.to_string(),
        join_date,
        first_commit,
        tenth_commit,
        first_pr,
        tenth_pr,
        first_review,
        time_to_first_commit: since_join(join_date, first_commit),
        time_to_10th_commit: since_join(join_date, tenth_commit),
        time_to_first_pr: since_join(join_date, first_pr),
        time_to_10th_pr: since_join(join_date, tenth_pr),
        initial_review_response_time: since_join(join_date, first_review),
    }
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// True when every onboarding property is already stored, so the
/// developer needs no further queries.
pub fn is_complete(properties: &Properties) -> bool {
    ONBOARDING_PROPERTIES
        .iter()
        .all(|name| properties.get(*name).is_some_and(is_populated))
}
