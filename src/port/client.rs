use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{Catalog, Entity, Properties};
use crate::auth::{PortCredentials, Token};
use crate::error::{Result, SyncError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct EntityResponse {
    entity: Entity,
}

pub struct PortClient {
    client: Client,
    api_url: Url,
    access_token: Token,
}

impl PortClient {
    /// Exchange the client credentials for an access token reused for the
    /// whole run.
    pub async fn connect(base_url: &str, credentials: &PortCredentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("github-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| SyncError::Config(format!("Invalid Port API URL: {e}")))?
            .join("v1/")?;

        let response = client
            .post(api_url.join("auth/access_token")?)
            .json(credentials)
            .send()
            .await?;
        let token: AccessTokenResponse = Self::decode(response, "auth/access_token").await?;

        info!("Authenticated with Port as {}", credentials.client_id);

        Ok(Self {
            client,
            api_url,
            access_token: Token::from(token.access_token.as_str()),
        })
    }

    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.access_token.as_str())
    }

    fn entities_url(&self, kind: &str, identifier: Option<&str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                SyncError::Config(format!("Cannot build URL from {}", self.api_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["blueprints", kind, "entities"]);
            if let Some(identifier) = identifier {
                segments.push(identifier);
            }
        }
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api(format!("Port {what} - {status} - {body}")));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Catalog for PortClient {
    async fn get_entities(&self, kind: &str) -> Result<Vec<Entity>> {
        let url = self.entities_url(kind, None)?;
        let response = self.auth_request(self.client.get(url)).send().await?;
        let body: EntitiesResponse = Self::decode(response, kind).await?;

        debug!("Fetched {} {kind} entities", body.entities.len());
        Ok(body.entities)
    }

    async fn upsert_entity(&self, kind: &str, entity: &Entity) -> Result<Entity> {
        let url = self.entities_url(kind, None)?;
        let request = self
            .client
            .post(url)
            .query(&[("upsert", "true"), ("merge", "true")])
            .json(entity);
        let response = self.auth_request(request).send().await?;
        let body: EntityResponse =
            Self::decode(response, &format!("{kind}/{}", entity.identifier)).await?;

        Ok(body.entity)
    }

    async fn upsert_properties(
        &self,
        kind: &str,
        identifier: &str,
        properties: &Properties,
    ) -> Result<()> {
        let url = self.entities_url(kind, Some(identifier))?;
        let request = self
            .client
            .patch(url)
            .json(&json!({ "properties": properties }));
        let response = self.auth_request(request).send().await?;
        Self::decode::<serde_json::Value>(response, &format!("{kind}/{identifier}")).await?;

        Ok(())
    }
}
