use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::{Result, SyncError};
use crate::github::types::{MemberAddEvent, RateLimit, Repository};

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct RepositoryDto {
    id: u64,
    name: String,
    owner: OwnerDto,
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwnerDto {
    login: String,
}

impl From<RepositoryDto> for Repository {
    fn from(dto: RepositoryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            owner: dto.owner.login,
            default_branch: dto.default_branch.unwrap_or_else(|| "main".to_string()),
        }
    }
}

/// The audit log reports `created_at` in epoch milliseconds; older
/// exports use RFC 3339.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuditTimestamp {
    Millis(i64),
    Text(DateTime<Utc>),
}

impl AuditTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::Text(dt) => Some(*dt),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuditEventDto {
    user: Option<String>,
    user_id: Option<u64>,
    created_at: Option<AuditTimestamp>,
}

impl AuditEventDto {
    fn into_event(self) -> Option<MemberAddEvent> {
        let created_at = self.created_at.as_ref().and_then(AuditTimestamp::to_utc)?;
        Some(MemberAddEvent {
            user: self.user?,
            user_id: self.user_id,
            created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateDto,
}

#[derive(Debug, Deserialize)]
struct RateDto {
    limit: u64,
    remaining: u64,
    used: u64,
    reset: i64,
}

impl GitHubClient {
    pub async fn fetch_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&format!("orgs/{org}/repos"))?;
        let repos: Vec<RepositoryDto> = self
            .get_json(url, &[("per_page", PAGE_SIZE.to_string())])
            .await?;

        debug!("Found {} repositories in {org}", repos.len());
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    pub async fn fetch_member_add_events(&self, enterprise: &str) -> Result<Vec<MemberAddEvent>> {
        let url = self.endpoint(&format!("enterprises/{enterprise}/audit-log"))?;
        let entries: Vec<AuditEventDto> = self
            .get_json(
                url,
                &[
                    ("phrase", "action:org.add_member".to_string()),
                    ("include", "web".to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        let total = entries.len();
        let events: Vec<MemberAddEvent> =
            entries.into_iter().filter_map(AuditEventDto::into_event).collect();

        if events.len() < total {
            warn!(
                "Ignored {} audit log entries without user or timestamp",
                total - events.len()
            );
        }

        info!("Found {} member add events for {enterprise}", events.len());
        Ok(events)
    }

    pub async fn fetch_rate_limit(&self) -> Result<RateLimit> {
        let url = self.endpoint("rate_limit")?;
        let response: RateLimitResponse = self.get_json(url, &[] as &[(&str, &str)]).await?;
        let rate = response.rate;

        let reset_at = DateTime::from_timestamp(rate.reset, 0).ok_or_else(|| {
            SyncError::Api(format!("Invalid rate limit reset timestamp: {}", rate.reset))
        })?;

        Ok(RateLimit {
            limit: rate.limit,
            remaining: rate.remaining,
            used: rate.used,
            reset_at,
        })
    }
}
