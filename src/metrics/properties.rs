//! Port property names for every derived metric.
//!
//! Derivation never deals with Port naming; these functions only translate
//! finished records into property maps. Absent values are never emitted so
//! that merging a map never clears a stored property.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use super::{OnboardingStats, PullRequestMetrics, WindowStats, WorkflowMetrics};
use crate::port::Properties;

pub const FIRST_COMMIT: &str = "first_commit";
pub const TENTH_COMMIT: &str = "tenth_commit";
pub const FIRST_PR: &str = "first_pr";
pub const TENTH_PR: &str = "tenth_pr";
pub const TIME_TO_FIRST_COMMIT: &str = "time_to_first_commit";
pub const TIME_TO_FIRST_PR: &str = "time_to_first_pr";
pub const TIME_TO_10TH_COMMIT: &str = "time_to_10th_commit";
pub const TIME_TO_10TH_PR: &str = "time_to_10th_pr";
pub const INITIAL_REVIEW_RESPONSE_TIME: &str = "initial_review_response_time";

/// Properties a developer needs before onboarding is considered done.
pub const ONBOARDING_PROPERTIES: [&str; 9] = [
    FIRST_COMMIT,
    TENTH_COMMIT,
    FIRST_PR,
    TENTH_PR,
    TIME_TO_FIRST_COMMIT,
    TIME_TO_FIRST_PR,
    TIME_TO_10TH_COMMIT,
    TIME_TO_10TH_PR,
    INITIAL_REVIEW_RESPONSE_TIME,
];

pub const PR_SIZE: &str = "pr_size";
pub const PR_LIFETIME: &str = "pr_lifetime";
pub const PR_PICKUP_TIME: &str = "pr_pickup_time";
pub const PR_SUCCESS_RATE: &str = "pr_success_rate";
pub const REVIEW_PARTICIPATION: &str = "review_participation";
pub const PR_ADDITIONS: &str = "pr_additions";
pub const PR_DELETIONS: &str = "pr_deletions";
pub const PR_FILES_CHANGED: &str = "pr_files_changed";
pub const COMMENTS: &str = "comments";
pub const REVIEW_COMMENTS: &str = "review_comments";

const MEDIAN_DURATION: &str = "medianDuration";
const MAX_DURATION: &str = "maxDuration";
const MIN_DURATION: &str = "minDuration";
const MEAN_DURATION: &str = "meanDuration";
const TOTAL_RUNS: &str = "totalRuns";
const TOTAL_FAILURES: &str = "totalFailures";
const SUCCESS_RATE: &str = "successRate";

/// Port identifier of a pull request entity.
pub fn pull_request_identifier(repository: &str, pull_request_id: u64) -> String {
    format!("{repository}{pull_request_id}")
}

/// Port identifier of a workflow entity.
pub fn workflow_identifier(repository: &str, workflow_id: u64) -> String {
    format!("{repository}{workflow_id}")
}

/// `<stat>_last_<days>_days`
pub fn window_property(stat: &str, days: i64) -> String {
    format!("{stat}_last_{days}_days")
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn insert_some<T: Into<Value>>(properties: &mut Properties, name: &str, value: Option<T>) {
    if let Some(value) = value {
        properties.insert(name.to_string(), value.into());
    }
}

pub fn onboarding_properties(stats: &OnboardingStats) -> Properties {
    let mut properties = Properties::new();

    insert_some(&mut properties, FIRST_COMMIT, stats.first_commit.map(timestamp));
    insert_some(&mut properties, TENTH_COMMIT, stats.tenth_commit.map(timestamp));
    insert_some(&mut properties, FIRST_PR, stats.first_pr.map(timestamp));
    insert_some(&mut properties, TENTH_PR, stats.tenth_pr.map(timestamp));
    insert_some(&mut properties, TIME_TO_FIRST_COMMIT, stats.time_to_first_commit);
    insert_some(&mut properties, TIME_TO_FIRST_PR, stats.time_to_first_pr);
    insert_some(&mut properties, TIME_TO_10TH_COMMIT, stats.time_to_10th_commit);
    insert_some(&mut properties, TIME_TO_10TH_PR, stats.time_to_10th_pr);
    insert_some(
        &mut properties,
        INITIAL_REVIEW_RESPONSE_TIME,
        stats.initial_review_response_time,
    );

    properties
}

pub fn pull_request_properties(metrics: &PullRequestMetrics) -> Properties {
    let mut properties = Properties::new();

    properties.insert(PR_SIZE.to_string(), json!(metrics.size));
    properties.insert(PR_LIFETIME.to_string(), json!(metrics.lifetime_hours));
    properties.insert(PR_PICKUP_TIME.to_string(), json!(metrics.pickup_time_hours));
    properties.insert(PR_SUCCESS_RATE.to_string(), json!(metrics.success));
    properties.insert(
        REVIEW_PARTICIPATION.to_string(),
        json!(metrics.review_participation),
    );
    properties.insert(PR_ADDITIONS.to_string(), json!(metrics.additions));
    properties.insert(PR_DELETIONS.to_string(), json!(metrics.deletions));
    properties.insert(PR_FILES_CHANGED.to_string(), json!(metrics.changed_files));
    properties.insert(COMMENTS.to_string(), json!(metrics.comments));
    properties.insert(REVIEW_COMMENTS.to_string(), json!(metrics.review_comments));

    properties
}

fn insert_window(properties: &mut Properties, window: &WindowStats) {
    let name = |stat: &str| window_property(stat, window.days);

    insert_some(properties, &name(MEDIAN_DURATION), window.median_duration);
    insert_some(properties, &name(MAX_DURATION), window.max_duration);
    insert_some(properties, &name(MIN_DURATION), window.min_duration);
    insert_some(properties, &name(MEAN_DURATION), window.mean_duration);
    properties.insert(name(TOTAL_RUNS), json!(window.total_runs));
    properties.insert(name(TOTAL_FAILURES), json!(window.total_failures));
    insert_some(properties, &name(SUCCESS_RATE), window.success_rate);
}

pub fn workflow_properties(metrics: &WorkflowMetrics) -> Properties {
    let mut properties = Properties::new();
    for window in &metrics.windows {
        insert_window(&mut properties, window);
    }
    properties
}
