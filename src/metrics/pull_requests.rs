use super::{hours_between, PullRequestMetrics};
use crate::github::types::{PullRequestDetail, Review};

/// Metrics of one closed pull request.
pub fn derive(repository: &str, detail: &PullRequestDetail, reviews: &[Review]) -> PullRequestMetrics {
    let lifetime_hours = match (detail.created_at, detail.closed_at) {
        (Some(created), Some(closed)) => hours_between(created, closed),
        _ => 0.0,
    };

    let first_review = reviews.iter().filter_map(|r| r.submitted_at).min();
    let pickup_time_hours = match (detail.created_at, first_review) {
        (Some(created), Some(reviewed)) => hours_between(created, reviewed),
        _ => 0.0,
    };

    PullRequestMetrics {
        repository: repository.to_string(),
        pull_request_id: detail.id,
        size: detail.additions + detail.deletions,
        lifetime_hours,
        pickup_time_hours,
        success: u8::from(detail.merged_at.is_some()),
        review_participation: reviews.len(),
        additions: detail.additions,
        deletions: detail.deletions,
        changed_files: detail.changed_files,
        comments: detail.comments,
        review_comments: detail.review_comments,
    }
}

/// Fraction of merged pull requests, `None` when there are none.
pub fn success_rate(metrics: &[PullRequestMetrics]) -> Option<f64> {
    if metrics.is_empty() {
        return None;
    }

    let merged = metrics.iter().filter(|m| m.success == 1).count();

    #[allow(clippy::cast_precision_loss)]
    let rate = merged as f64 / metrics.len() as f64;
    Some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
    }

    fn detail() -> PullRequestDetail {
        PullRequestDetail {
            id: 1001,
            number: 12,
            additions: 120,
            deletions: 30,
            changed_files: 4,
            comments: 2,
            review_comments: 5,
            created_at: Some(t0()),
            closed_at: Some(t0() + Duration::hours(48)),
            merged_at: Some(t0() + Duration::hours(48)),
        }
    }

    fn review(id: u64, submitted_at: Option<DateTime<Utc>>) -> Review {
        Review {
            id,
            reviewer: Some("hubot".to_string()),
            state: "COMMENTED".to_string(),
            submitted_at,
        }
    }

    #[test]
    fn test_unreviewed_merged_pull_request() {
        let metrics = derive("widgets", &detail(), &[]);

        assert_eq!(metrics.success, 1);
        assert_eq!(metrics.lifetime_hours, 48.0);
        assert_eq!(metrics.pickup_time_hours, 0.0);
        assert_eq!(metrics.review_participation, 0);
        assert_eq!(metrics.size, 150);
        assert_eq!(metrics.pull_request_id, 1001);
    }

    #[test]
    fn test_success_depends_only_on_merge() {
        let closed_unmerged = PullRequestDetail {
            merged_at: None,
            ..detail()
        };
        let merged_without_close = PullRequestDetail {
            closed_at: None,
            ..detail()
        };

        assert_eq!(derive("widgets", &closed_unmerged, &[]).success, 0);
        assert_eq!(derive("widgets", &merged_without_close, &[]).success, 1);
    }

    #[test]
    fn test_lifetime_zero_without_close() {
        let open = PullRequestDetail {
            closed_at: None,
            ..detail()
        };

        assert_eq!(derive("widgets", &open, &[]).lifetime_hours, 0.0);
    }

    #[test]
    fn test_pickup_time_uses_earliest_review() {
        let reviews = vec![
            review(1, Some(t0() + Duration::hours(5))),
            review(2, Some(t0() + Duration::minutes(90))),
            review(3, None),
        ];

        let metrics = derive("widgets", &detail(), &reviews);

        assert_eq!(metrics.pickup_time_hours, 1.5);
        assert_eq!(metrics.review_participation, 3);
    }

    #[test]
    fn test_pickup_time_zero_when_reviews_lack_timestamps() {
        let metrics = derive("widgets", &detail(), &[review(1, None)]);

        assert_eq!(metrics.pickup_time_hours, 0.0);
        assert_eq!(metrics.review_participation, 1);
    }

    #[test]
    fn test_success_rate_across_pull_requests() {
        let merged = derive("widgets", &detail(), &[]);
        let rejected = derive(
            "widgets",
            &PullRequestDetail {
                merged_at: None,
                ..detail()
            },
            &[],
        );

        let rate = success_rate(&[merged.clone(), merged, rejected]).unwrap();

        assert!((rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(success_rate(&[]), None);
    }
}
