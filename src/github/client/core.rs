use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, SyncError};

const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: Token,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("github-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Keep any path prefix (GitHub Enterprise Server serves under /api/v3)
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let api_url = Url::parse(&base)
            .map_err(|e| SyncError::Config(format!("Invalid GitHub API URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(self.token.as_str())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.api_url.join(path)?)
    }

    pub(super) fn repo_endpoint(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| SyncError::Config(format!("Cannot build URL from {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", owner, repo])
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// GET `url` with `query` and decode the JSON body.
    pub(super) async fn get_json<T, Q>(&self, url: Url, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let request = self.auth_request(self.client.get(url.clone()).query(query));
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api(format!("GET {} - {status} - {body}", url.path())));
        }

        Ok(response.json::<T>().await?)
    }
}
