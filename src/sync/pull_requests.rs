use log::{info, warn};

use super::{MetricsSync, SyncSummary, PULL_REQUEST_BLUEPRINT};
use crate::error::Result;
use crate::github::types::Repository;
use crate::github::SourceControl;
use crate::metrics::properties::{pull_request_identifier, pull_request_properties};
use crate::metrics::pull_requests::{derive, success_rate};
use crate::metrics::PullRequestMetrics;
use crate::port::Catalog;

impl<S: SourceControl, C: Catalog> MetricsSync<'_, S, C> {
    /// Write metrics for every closed pull request of `repos`. A repository
    /// whose listing fails is skipped; a pull request whose details fail is
    /// counted as failed.
    pub async fn sync_pull_requests(&self, repos: &[Repository]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        for repo in repos {
            let pull_requests = match self.source.list_closed_pull_requests(repo).await {
                Ok(pull_requests) => pull_requests,
                Err(e) => {
                    warn!("Error getting PRs for repo {}: {e}", repo.name);
                    continue;
                }
            };
            info!("Processing {} closed PRs in {}", pull_requests.len(), repo.name);

            let mut repo_metrics: Vec<PullRequestMetrics> = Vec::with_capacity(pull_requests.len());

            for pull_request in &pull_requests {
                summary.processed += 1;

                let metrics = match self.pull_request_metrics(repo, pull_request.number).await {
                    Ok(metrics) => metrics,
                    Err(e) => {
                        warn!("Error getting PR #{} in {}: {e}", pull_request.number, repo.name);
                        summary.failed += 1;
                        continue;
                    }
                };

                let identifier = pull_request_identifier(&repo.name, metrics.pull_request_id);
                self.write_properties(
                    PULL_REQUEST_BLUEPRINT,
                    &identifier,
                    &pull_request_properties(&metrics),
                    &mut summary,
                )
                .await;

                repo_metrics.push(metrics);
            }

            if let Some(rate) = success_rate(&repo_metrics) {
                info!("{}: {:.1}% of closed PRs merged", repo.name, rate * 100.0);
            }
        }

        Ok(summary)
    }

    async fn pull_request_metrics(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<PullRequestMetrics> {
        let detail = self.source.get_pull_request(repo, number).await?;
        let reviews = self.source.list_reviews(repo, number).await?;
        Ok(derive(&repo.name, &detail, &reviews))
    }
}
