use chrono::{DateTime, Utc};
use log::{info, warn};

use super::{MetricsSync, SyncSummary, WORKFLOW_BLUEPRINT};
use crate::error::Result;
use crate::github::types::Repository;
use crate::github::SourceControl;
use crate::metrics::properties::{workflow_identifier, workflow_properties};
use crate::metrics::workflows::{derive, group_by_workflow};
use crate::port::Catalog;

impl<S: SourceControl, C: Catalog> MetricsSync<'_, S, C> {
    /// Write windowed run statistics for every workflow that ran on each
    /// repository's default branch. Windows end at `now`.
    pub async fn sync_workflows(
        &self,
        repos: &[Repository],
        now: DateTime<Utc>,
    ) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        for repo in repos {
            let runs = match self
                .source
                .list_workflow_runs(repo, &repo.default_branch)
                .await
            {
                Ok(runs) => runs,
                Err(e) => {
                    warn!("Error getting workflow runs for repo {}: {e}", repo.name);
                    continue;
                }
            };

            let workflows = group_by_workflow(runs);
            info!("Found {} workflows in {}", workflows.len(), repo.name);

            for (workflow_id, runs) in &workflows {
                summary.processed += 1;

                let metrics = derive(&repo.name, *workflow_id, runs, now);
                info!(
                    "Workflow {} ({}) in {}",
                    metrics.workflow_name, workflow_id, repo.name
                );

                self.write_properties(
                    WORKFLOW_BLUEPRINT,
                    &workflow_identifier(&repo.name, *workflow_id),
                    &workflow_properties(&metrics),
                    &mut summary,
                )
                .await;
            }
        }

        Ok(summary)
    }
}
