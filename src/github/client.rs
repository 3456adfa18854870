use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, warn};

use crate::core::{Result, UpdateError};
use crate::github::release::Release;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// HTTP client for the GitHub releases API.
///
/// Wraps a [`reqwest::Client`] configured with a descriptive `User-Agent`
/// and the GitHub JSON accept header. An optional token is sent as a bearer
/// `Authorization` header for private repositories.
///
/// The API base is configurable so tests can point the client at a local
/// mock server; production use never changes it.
pub struct ReleaseClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl ReleaseClient {
    /// Creates a client with the given request timeout and optional token.
    pub fn new(token: Option<String>, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ghup/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .map_err(|source| UpdateError::Network {
                operation: "build HTTP client".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            token,
        })
    }

    /// Overrides the API base URL (tests only).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Fetches the most recent release for `owner`/`repo`.
    ///
    /// Queries the `releases/latest` endpoint first. On any failure there -
    /// transport error or non-200 - it falls back to listing all releases
    /// and taking the most recent non-prerelease entry, matching what
    /// `releases/latest` would have returned. Only when both paths fail is
    /// an error reported.
    pub async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{}/{}/releases/latest", self.api_base, owner, repo);

        match self.fetch_json::<Release>(&url).await {
            Ok(release) => Ok(release),
            Err(err) => {
                debug!(
                    "releases/latest failed ({}), falling back to release list",
                    err
                );
                self.first_from_list(owner, repo).await
            }
        }
    }

    async fn first_from_list(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{}/{}/releases", self.api_base, owner, repo);
        let releases: Vec<Release> = self.fetch_json(&url).await?;

        // The list endpoint includes prereleases; `releases/latest` does
        // not, so the fallback must skip them too.
        releases
            .into_iter()
            .find(|r| !r.prerelease)
            .ok_or_else(|| UpdateError::MalformedRelease {
                reason: "no published releases available".to_string(),
            })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpdateError::Network {
                operation: format!("fetch {url}"),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 403 || status.as_u16() == 429 {
                warn!("GitHub API rate limited or forbidden ({}) for {}", status, url);
            }
            return Err(UpdateError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| UpdateError::MalformedRelease {
                reason: format!("invalid JSON from {url}: {err}"),
            })
    }

    /// HEAD reachability probe: `true` iff the URL answers HTTP 200 within
    /// `timeout`.
    ///
    /// Used only to test whether a candidate package URL resolves, never to
    /// download content. Any transport error counts as unreachable.
    pub async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.http.head(url).timeout(timeout).send().await {
            Ok(response) => {
                let reachable = response.status() == reqwest::StatusCode::OK;
                debug!("Probe {} -> {}", url, response.status());
                reachable
            }
            Err(err) => {
                debug!("Probe {} failed: {}", url, err);
                false
            }
        }
    }
}
