mod onboarding;
mod pull_requests;
mod workflows;

use std::fmt;

use log::{debug, error, info};

use crate::error::{Result, SyncError};
use crate::github::types::{RateLimit, Repository};
use crate::github::SourceControl;
use crate::port::{Catalog, Properties};

pub const USER_BLUEPRINT: &str = "githubUser";
pub const PULL_REQUEST_BLUEPRINT: &str = "githubPullRequest";
pub const WORKFLOW_BLUEPRINT: &str = "githubWorkflow";

/// Outcome counts of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub processed: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}, updated {}, skipped {}, failed {}",
            self.processed, self.updated, self.skipped, self.failed
        )
    }
}

/// Fails when no requests are left before the limit resets.
pub async fn check_rate_limit<S: SourceControl>(source: &S) -> Result<RateLimit> {
    let rate = source.rate_limit().await?;
    let seconds_until_reset = (rate.reset_at - chrono::Utc::now()).num_seconds();

    info!(
        "{} requests left, used {}/{}. Reset at {} ({seconds_until_reset}s)",
        rate.remaining, rate.used, rate.limit, rate.reset_at
    );

    if rate.remaining == 0 {
        return Err(SyncError::RateLimitExhausted {
            limit: rate.limit,
            reset_at: rate.reset_at,
        });
    }

    Ok(rate)
}

/// Drives fetch, derive and write cycles one entity at a time.
pub struct MetricsSync<'a, S, C> {
    source: &'a S,
    catalog: &'a C,
    orgs: &'a [String],
    dry_run: bool,
}

impl<'a, S: SourceControl, C: Catalog> MetricsSync<'a, S, C> {
    pub fn new(source: &'a S, catalog: &'a C, orgs: &'a [String]) -> Self {
        Self {
            source,
            catalog,
            orgs,
            dry_run: false,
        }
    }

    /// Derive and log payloads without writing to the catalog.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn repositories(&self) -> Result<Vec<Repository>> {
        let repos = self.source.list_repositories(self.orgs).await?;
        info!("Got {} repos", repos.len());
        Ok(repos)
    }

    /// Patch `properties` onto one entity, recording the outcome.
    async fn write_properties(
        &self,
        kind: &str,
        identifier: &str,
        properties: &Properties,
        summary: &mut SyncSummary,
    ) {
        if self.dry_run {
            info!("[dry-run] {kind}/{identifier}: {}", Payload(properties));
            summary.updated += 1;
            return;
        }

        match self
            .catalog
            .upsert_properties(kind, identifier, properties)
            .await
        {
            Ok(()) => {
                debug!("Updated {kind}/{identifier}");
                summary.updated += 1;
            }
            Err(e) => {
                error!("Failed to update {kind}/{identifier}: {e}");
                summary.failed += 1;
            }
        }
    }
}

/// Compact JSON rendering for log lines.
struct Payload<'a>(&'a Properties);

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("<unprintable>"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory gateways recording every write.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::{Result, SyncError};
    use crate::github::types::{
        Commit, MemberAddEvent, PullRequest, PullRequestDetail, RateLimit, Repository, Review,
        WorkflowRun,
    };
    use crate::github::SourceControl;
    use crate::port::{Catalog, Entity, Properties};

    pub struct FakeSource {
        pub remaining: u64,
        pub repositories: Vec<Repository>,
        pub member_events: Vec<MemberAddEvent>,
        /// Keyed by `(org, login)`
        pub commits: HashMap<(String, String), Vec<Commit>>,
        pub merged_pull_requests: HashMap<(String, String), Vec<PullRequest>>,
        pub approvals: HashMap<(String, String), Vec<Review>>,
        /// Orgs whose searches fail
        pub failing_orgs: Vec<String>,
        /// Keyed by repository name
        pub closed_pull_requests: HashMap<String, Vec<PullRequest>>,
        pub details: HashMap<(String, u64), PullRequestDetail>,
        pub reviews: HashMap<(String, u64), Vec<Review>>,
        pub runs: HashMap<String, Vec<WorkflowRun>>,
        pub searches: Mutex<Vec<String>>,
    }

    impl Default for FakeSource {
        fn default() -> Self {
            Self {
                remaining: 5000,
                repositories: Vec::new(),
                member_events: Vec::new(),
                commits: HashMap::new(),
                merged_pull_requests: HashMap::new(),
                approvals: HashMap::new(),
                failing_orgs: Vec::new(),
                closed_pull_requests: HashMap::new(),
                details: HashMap::new(),
                reviews: HashMap::new(),
                runs: HashMap::new(),
                searches: Mutex::new(Vec::new()),
            }
        }
    }

    impl FakeSource {
        fn search<T: Clone>(
            &self,
            table: &HashMap<(String, String), Vec<T>>,
            org: &str,
            login: &str,
        ) -> Result<Vec<T>> {
            self.searches
                .lock()
                .unwrap()
                .push(format!("{org}/{login}"));
            if self.failing_orgs.iter().any(|o| o == org) {
                return Err(SyncError::Api(format!("search failed in {org}")));
            }
            Ok(table
                .get(&(org.to_string(), login.to_string()))
                .cloned()
                .unwrap_or_default())
        }
    }

    #[async_trait]
    impl SourceControl for FakeSource {
        async fn rate_limit(&self) -> Result<RateLimit> {
            Ok(RateLimit {
                limit: 5000,
                remaining: self.remaining,
                used: 5000 - self.remaining,
                reset_at: Utc::now(),
            })
        }

        async fn list_repositories(&self, _orgs: &[String]) -> Result<Vec<Repository>> {
            Ok(self.repositories.clone())
        }

        async fn list_member_add_events(&self, _enterprise: &str) -> Result<Vec<MemberAddEvent>> {
            Ok(self.member_events.clone())
        }

        async fn search_commits(&self, org: &str, author: &str) -> Result<Vec<Commit>> {
            self.search(&self.commits, org, author)
        }

        async fn search_merged_pull_requests(
            &self,
            org: &str,
            author: &str,
        ) -> Result<Vec<PullRequest>> {
            self.search(&self.merged_pull_requests, org, author)
        }

        async fn search_approved_reviews(&self, org: &str, approver: &str) -> Result<Vec<Review>> {
            self.search(&self.approvals, org, approver)
        }

        async fn list_closed_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>> {
            self.closed_pull_requests
                .get(&repo.name)
                .cloned()
                .ok_or_else(|| SyncError::Api(format!("{} unavailable", repo.name)))
        }

        async fn get_pull_request(
            &self,
            repo: &Repository,
            number: u64,
        ) -> Result<PullRequestDetail> {
            self.details
                .get(&(repo.name.clone(), number))
                .cloned()
                .ok_or_else(|| SyncError::NotFound(format!("{}#{number}", repo.name)))
        }

        async fn list_reviews(&self, repo: &Repository, number: u64) -> Result<Vec<Review>> {
            Ok(self
                .reviews
                .get(&(repo.name.clone(), number))
                .cloned()
                .unwrap_or_default())
        }

        async fn list_workflow_runs(
            &self,
            repo: &Repository,
            _branch: &str,
        ) -> Result<Vec<WorkflowRun>> {
            self.runs
                .get(&repo.name)
                .cloned()
                .ok_or_else(|| SyncError::Api(format!("{} unavailable", repo.name)))
        }
    }

    #[derive(Default)]
    pub struct FakeCatalog {
        pub entities: Vec<Entity>,
        /// Identifiers whose writes fail
        pub failing: Vec<String>,
        pub upserted: Mutex<Vec<Entity>>,
        pub patched: Mutex<Vec<(String, String, Properties)>>,
    }

    impl FakeCatalog {
        fn check(&self, identifier: &str) -> Result<()> {
            if self.failing.iter().any(|f| f == identifier) {
                return Err(SyncError::Api(format!("write rejected for {identifier}")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn get_entities(&self, _kind: &str) -> Result<Vec<Entity>> {
            Ok(self.entities.clone())
        }

        async fn upsert_entity(&self, _kind: &str, entity: &Entity) -> Result<Entity> {
            self.check(&entity.identifier)?;
            self.upserted.lock().unwrap().push(entity.clone());
            Ok(entity.clone())
        }

        async fn upsert_properties(
            &self,
            kind: &str,
            identifier: &str,
            properties: &Properties,
        ) -> Result<()> {
            self.check(identifier)?;
            self.patched.lock().unwrap().push((
                kind.to_string(),
                identifier.to_string(),
                properties.clone(),
            ));
            Ok(())
        }
    }

    pub fn repository(name: &str) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            owner: "acme".to_string(),
            default_branch: "main".to_string(),
        }
    }
}
