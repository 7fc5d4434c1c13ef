use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::Result;
use crate::github::types::{Repository, WorkflowRun};

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<WorkflowRunDto>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunDto {
    id: u64,
    workflow_id: u64,
    name: Option<String>,
    conclusion: Option<String>,
    run_number: u64,
    event: String,
    run_started_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<WorkflowRunDto> for WorkflowRun {
    fn from(dto: WorkflowRunDto) -> Self {
        Self {
            id: dto.id,
            workflow_id: dto.workflow_id,
            name: dto.name.unwrap_or_default(),
            conclusion: dto.conclusion,
            run_number: dto.run_number,
            event: dto.event,
            started_at: dto.run_started_at,
            // The last update of a finished run is its completion
            completed_at: dto.updated_at,
        }
    }
}

impl GitHubClient {
    /// Runs on `branch`, newest first, excluding runs triggered by pull requests.
    pub async fn fetch_workflow_runs(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Vec<WorkflowRun>> {
        let url = self.repo_endpoint(&repo.owner, &repo.name, "actions/runs")?;
        let response: WorkflowRunsResponse = self
            .get_json(
                url,
                &[
                    ("branch", branch.to_string()),
                    ("exclude_pull_requests", "true".to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        Ok(response
            .workflow_runs
            .into_iter()
            .map(WorkflowRun::from)
            .collect())
    }
}
