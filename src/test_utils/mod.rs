//! Shared fixtures for unit and integration tests.
//!
//! Available to integration tests through the `test-utils` cargo feature
//! (the crate depends on itself with that feature in `dev-dependencies`).

use serde_json::{Value, json};

use crate::config::UpdaterConfig;

/// Builder for GitHub release JSON payloads served by mock servers.
#[derive(Debug, Clone)]
pub struct ReleaseFixture {
    tag: String,
    zipball_url: Option<String>,
    assets: Vec<(String, String)>,
    body: Option<String>,
    prerelease: bool,
}

impl ReleaseFixture {
    /// A release for `tag` with a default zipball URL and no assets.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            zipball_url: Some(format!("https://api.github.com/repos/o/r/zipball/{tag}")),
            assets: Vec::new(),
            body: None,
            prerelease: false,
        }
    }

    /// Replaces the zipball URL (`None` removes it).
    #[must_use]
    pub fn zipball_url(mut self, url: Option<&str>) -> Self {
        self.zipball_url = url.map(str::to_string);
        self
    }

    /// Adds an uploaded asset.
    #[must_use]
    pub fn asset(mut self, name: &str, url: &str) -> Self {
        self.assets.push((name.to_string(), url.to_string()));
        self
    }

    /// Sets the release body (changelog markdown).
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Marks the release as a prerelease.
    #[must_use]
    pub fn prerelease(mut self) -> Self {
        self.prerelease = true;
        self
    }

    /// Renders the payload as the GitHub API would.
    pub fn build(&self) -> Value {
        let assets: Vec<Value> = self
            .assets
            .iter()
            .map(|(name, url)| json!({"name": name, "browser_download_url": url}))
            .collect();

        let mut release = json!({
            "tag_name": self.tag,
            "prerelease": self.prerelease,
            "assets": assets,
            "published_at": "2026-01-15T12:00:00Z",
        });
        if let Some(url) = &self.zipball_url {
            release["zipball_url"] = json!(url);
        }
        if let Some(body) = &self.body {
            release["body"] = json!(body);
        }
        release
    }
}

/// An updater config pointed at mock API and download servers.
pub fn mock_config(api_base: &str, download_base: &str) -> UpdaterConfig {
    let mut config: UpdaterConfig = toml::from_str(
        r#"
            [github]
            owner = "JustCasey76"
            repo = "aqm-sitemaps"

            [plugin]
            id = "aqm-sitemaps/aqm-sitemaps.php"
            slug = "aqm-sitemaps"
            version = "2.2.1"

            [update]
            probe_timeout = 2
            request_timeout = 5
        "#,
    )
    .expect("fixture config parses");
    config.github.api_base = Some(api_base.to_string());
    config.github.download_base = Some(download_base.to_string());
    config
}
