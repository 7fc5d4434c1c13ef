use chrono::{DateTime, Utc};
use log::{error, info, warn};

use super::{MetricsSync, Payload, SyncSummary, USER_BLUEPRINT};
use crate::error::Result;
use crate::github::types::MemberAddEvent;
use crate::github::SourceControl;
use crate::metrics::onboarding::{self, is_complete};
use crate::metrics::properties::onboarding_properties;
use crate::metrics::OnboardingStats;
use crate::port::{Catalog, Entity};

/// Earliest time `login` was added to any organization.
pub fn join_date_for(records: &[MemberAddEvent], login: &str) -> Option<DateTime<Utc>> {
    records
        .iter()
        .filter(|record| record.user.eq_ignore_ascii_case(login))
        .map(|record| record.created_at)
        .min()
}

impl<S: SourceControl, C: Catalog> MetricsSync<'_, S, C> {
    /// Fill in onboarding metrics for developers that are still missing any.
    pub async fn sync_onboarding(&self, enterprise: &str) -> Result<SyncSummary> {
        let users = self.catalog.get_entities(USER_BLUEPRINT).await?;
        let join_records = self.source.list_member_add_events(enterprise).await?;

        let pending: Vec<&Entity> = users
            .iter()
            .filter(|user| !is_complete(&user.properties))
            .collect();
        info!(
            "Found {} of {} users without complete onboarding metrics",
            pending.len(),
            users.len()
        );

        let mut summary = SyncSummary::default();

        for user in pending {
            summary.processed += 1;

            let Some(join_date) = join_date_for(&join_records, &user.identifier) else {
                info!("No join date found for {}. Skipping...", user.identifier);
                summary.skipped += 1;
                continue;
            };

            info!(
                "Calculating stats for {} with join date {join_date}",
                user.identifier
            );
            let stats = self.developer_stats(&user.identifier, join_date).await;

            if !stats.has_anchor() {
                info!("No activity found for {}. Skipping...", user.identifier);
                summary.skipped += 1;
                continue;
            }

            let mut entity = user.clone();
            entity.properties.extend(onboarding_properties(&stats));

            if self.dry_run {
                info!(
                    "[dry-run] {USER_BLUEPRINT}/{}: {}",
                    entity.identifier,
                    Payload(&entity.properties)
                );
                summary.updated += 1;
                continue;
            }

            match self.catalog.upsert_entity(USER_BLUEPRINT, &entity).await {
                Ok(_) => {
                    info!("Updated onboarding metrics for user {}", user.identifier);
                    summary.updated += 1;
                }
                Err(e) => {
                    error!("Failed to update user {}: {e}", user.identifier);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Collect activity across every organization. An organization whose
    /// queries fail contributes nothing.
    async fn developer_stats(&self, login: &str, join_date: DateTime<Utc>) -> OnboardingStats {
        let mut commits = Vec::new();
        let mut pull_requests = Vec::new();
        let mut reviews = Vec::new();

        for org in self.orgs {
            match self.source.search_commits(org, login).await {
                Ok(found) => commits.extend(found),
                Err(e) => warn!("Error fetching commits for {login} in {org}: {e}"),
            }

            match self.source.search_merged_pull_requests(org, login).await {
                Ok(found) => pull_requests.extend(found),
                Err(e) => warn!("Error fetching PRs for {login} in {org}: {e}"),
            }

            match self.source.search_approved_reviews(org, login).await {
                Ok(found) => reviews.extend(found),
                Err(e) => warn!("Error fetching reviews for {login} in {org}: {e}"),
            }
        }

        onboarding::derive(login, join_date, &commits, &pull_requests, &reviews)
    }
}
