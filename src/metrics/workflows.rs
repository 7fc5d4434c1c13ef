use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

use super::{WindowStats, WorkflowMetrics};
use crate::github::types::WorkflowRun;

/// Trailing windows, in days, every workflow is aggregated over.
pub const WINDOWS: [i64; 2] = [30, 90];

/// Runs grouped by workflow id, in order of first appearance.
pub fn group_by_workflow(runs: Vec<WorkflowRun>) -> IndexMap<u64, Vec<WorkflowRun>> {
    runs.into_iter().fold(IndexMap::new(), |mut groups, run| {
        groups.entry(run.workflow_id).or_insert_with(Vec::new).push(run);
        groups
    })
}

/// Statistics over runs started strictly after `now - days`.
///
/// `runs` must be sorted ascending by start time; the median is taken
/// from that order.
pub fn window_stats(runs: &[&WorkflowRun], days: i64, now: DateTime<Utc>) -> WindowStats {
    let since = now - Duration::days(days);

    let in_window: Vec<&WorkflowRun> = runs
        .iter()
        .copied()
        .filter(|run| run.started_at.is_some_and(|started| started > since))
        .collect();

    let durations: Vec<f64> = in_window
        .iter()
        .filter(|run| run.is_success())
        .map(|run| run.duration_seconds())
        .collect();

    let total_runs = in_window.len();

    #[allow(clippy::cast_precision_loss)]
    let success_rate = (total_runs > 0).then(|| durations.len() as f64 / total_runs as f64);

    WindowStats {
        days,
        median_duration: median(&durations),
        min_duration: durations.iter().copied().reduce(f64::min),
        max_duration: durations.iter().copied().reduce(f64::max),
        mean_duration: mean(&durations),
        total_runs,
        total_failures: total_runs - durations.len(),
        success_rate,
    }
}

/// Element at index n/2. Even-length input is not averaged.
fn median(values: &[f64]) -> Option<f64> {
    values.get(values.len() / 2).copied()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Aggregates of one workflow's runs for every window in [`WINDOWS`].
pub fn derive(
    repository: &str,
    workflow_id: u64,
    runs: &[WorkflowRun],
    now: DateTime<Utc>,
) -> WorkflowMetrics {
    let mut sorted: Vec<&WorkflowRun> = runs.iter().collect();
    sorted.sort_by_key(|run| run.started_at);

    let workflow_name = sorted
        .iter()
        .rev()
        .map(|run| run.name.as_str())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string();

    WorkflowMetrics {
        repository: repository.to_string(),
        workflow_id,
        workflow_name,
        windows: WINDOWS
            .iter()
            .map(|&days| window_stats(&sorted, days, now))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn run(id: u64, started_days_ago: i64, conclusion: &str, duration_secs: i64) -> WorkflowRun {
        let started = now() - Duration::days(started_days_ago);
        WorkflowRun {
            id,
            workflow_id: 7,
            name: "CI".to_string(),
            conclusion: Some(conclusion.to_string()),
            run_number: id,
            event: "push".to_string(),
            started_at: Some(started),
            completed_at: Some(started + Duration::seconds(duration_secs)),
        }
    }

    #[test]
    fn test_five_runs_two_failures_in_window() {
        let runs = vec![
            run(1, 10, "success", 10),
            run(2, 9, "failure", 999),
            run(3, 8, "success", 20),
            run(4, 7, "cancelled", 500),
            run(5, 6, "success", 30),
        ];

        let metrics = derive("widgets", 7, &runs, now());
        let last_30 = &metrics.windows[0];

        assert_eq!(last_30.days, 30);
        assert_eq!(last_30.median_duration, Some(20.0));
        assert_eq!(last_30.min_duration, Some(10.0));
        assert_eq!(last_30.max_duration, Some(30.0));
        assert_eq!(last_30.mean_duration, Some(20.0));
        assert_eq!(last_30.total_runs, 5);
        assert_eq!(last_30.total_failures, 2);
        assert_eq!(last_30.success_rate, Some(0.6));
    }

    #[test]
    fn test_median_of_even_count_takes_upper_middle() {
        let runs = vec![
            run(1, 4, "success", 10),
            run(2, 3, "success", 20),
            run(3, 2, "success", 30),
            run(4, 1, "success", 40),
        ];

        let metrics = derive("widgets", 7, &runs, now());

        assert_eq!(metrics.windows[0].median_duration, Some(30.0));
    }

    #[test]
    fn test_median_follows_start_order_not_duration() {
        let runs = vec![
            run(1, 3, "success", 50),
            run(2, 2, "success", 5),
            run(3, 1, "success", 20),
        ];

        let metrics = derive("widgets", 7, &runs, now());

        assert_eq!(metrics.windows[0].median_duration, Some(5.0));
        assert_eq!(metrics.windows[0].min_duration, Some(5.0));
    }

    #[test]
    fn test_runs_are_sorted_before_aggregation() {
        let runs = vec![
            run(3, 1, "success", 40),
            run(1, 4, "success", 10),
            run(4, 2, "success", 30),
            run(2, 3, "success", 20),
        ];

        let metrics = derive("widgets", 7, &runs, now());

        assert_eq!(metrics.windows[0].median_duration, Some(30.0));
    }

    #[test]
    fn test_windows_are_independent() {
        let runs = vec![
            run(1, 60, "success", 100),
            run(2, 45, "failure", 100),
            run(3, 5, "success", 10),
        ];

        let metrics = derive("widgets", 7, &runs, now());
        let (last_30, last_90) = (&metrics.windows[0], &metrics.windows[1]);

        assert_eq!(last_30.total_runs, 1);
        assert_eq!(last_30.max_duration, Some(10.0));
        assert_eq!(last_90.days, 90);
        assert_eq!(last_90.total_runs, 3);
        assert_eq!(last_90.total_failures, 1);
        assert_eq!(last_90.max_duration, Some(100.0));
        assert_eq!(last_90.mean_duration, Some(55.0));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let runs = vec![run(1, 30, "success", 10)];

        let metrics = derive("widgets", 7, &runs, now());

        assert_eq!(metrics.windows[0].total_runs, 0);
        assert_eq!(metrics.windows[1].total_runs, 1);
    }

    #[test]
    fn test_empty_window_has_no_rate_or_durations() {
        let runs = vec![run(1, 200, "success", 10)];

        let metrics = derive("widgets", 7, &runs, now());
        let stats = &metrics.windows[0];

        assert_eq!(stats.total_runs, 0);
        assert_eq!(stats.total_failures, 0);
        assert_eq!(stats.success_rate, None);
        assert_eq!(stats.median_duration, None);
        assert_eq!(stats.mean_duration, None);
    }

    #[test]
    fn test_window_without_successes() {
        let runs = vec![run(1, 3, "failure", 10), run(2, 2, "timed_out", 10)];

        let metrics = derive("widgets", 7, &runs, now());
        let stats = &metrics.windows[0];

        assert_eq!(stats.total_runs, 2);
        assert_eq!(stats.total_failures, 2);
        assert_eq!(stats.success_rate, Some(0.0));
        assert_eq!(stats.median_duration, None);
        assert_eq!(stats.min_duration, None);
        assert_eq!(stats.max_duration, None);
    }

    #[test]
    fn test_unfinished_run_counts_as_failure() {
        let mut pending = run(2, 1, "success", 10);
        pending.conclusion = None;
        let runs = vec![run(1, 2, "success", 10), pending];

        let metrics = derive("widgets", 7, &runs, now());
        let stats = &metrics.windows[0];

        assert_eq!(stats.total_failures, 1);
        assert_eq!(stats.success_rate, Some(0.5));
    }

    #[test]
    fn test_runs_without_start_are_outside_every_window() {
        let mut unstarted = run(1, 1, "success", 10);
        unstarted.started_at = None;

        let metrics = derive("widgets", 7, &[unstarted], now());

        assert!(metrics.windows.iter().all(|w| w.total_runs == 0));
    }

    #[test]
    fn test_group_by_workflow_keeps_first_appearance_order() {
        let mut deploy = run(2, 1, "success", 10);
        deploy.workflow_id = 9;
        let runs = vec![run(1, 1, "success", 10), deploy, run(3, 1, "failure", 10)];

        let groups = group_by_workflow(runs);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![7, 9]);
        assert_eq!(groups[&7].len(), 2);
        assert_eq!(groups[&9].len(), 1);
    }

    #[test]
    fn test_workflow_name_from_latest_run() {
        let mut renamed = run(2, 1, "success", 10);
        renamed.name = "Build & Test".to_string();
        let runs = vec![run(1, 2, "success", 10), renamed];

        assert_eq!(derive("widgets", 7, &runs, now()).workflow_name, "Build & Test");
    }
}
