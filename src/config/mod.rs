//! Updater configuration.
//!
//! [`UpdaterConfig`] carries everything that parameterizes one updater
//! instance: the GitHub coordinates to watch, the plugin identity to
//! reconcile against, and the timing knobs (cache TTL, flag TTL, network
//! timeouts). The config is plain data - loading it from TOML is how the
//! CLI builds an updater, while embedding hosts typically construct it in
//! code.
//!
//! # TOML Example
//!
//! ```toml
//! [github]
//! owner = "JustCasey76"
//! repo = "aqm-sitemaps"
//! # token = "ghp_..."           # only needed for private repositories
//!
//! [plugin]
//! id = "aqm-sitemaps/aqm-sitemaps.php"
//! slug = "aqm-sitemaps"
//! version = "2.2.1"             # installed version, used by the CLI
//!
//! [update]
//! cache_ttl = 21600             # seconds; 6 hours
//! flag_ttl = 300                # seconds; 5 minutes
//! probe_timeout = 5
//! request_timeout = 30
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::UpdateError;

/// Complete configuration for one [`PluginUpdater`](crate::update::PluginUpdater).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Repository to watch for releases.
    pub github: GithubConfig,
    /// Identity of the plugin being kept up to date.
    pub plugin: PluginConfig,
    /// Timing knobs; every field has a sensible default.
    #[serde(default)]
    pub update: UpdateSettings,
}

/// GitHub coordinates and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for private repositories, sent as a bearer header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// API base override; tests point this at a mock server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Download base override for constructed tag-archive URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_base: Option<String>,
}

/// Identity of the plugin in the host environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Stable identifier the host keys its registry by
    /// (e.g., `aqm-sitemaps/aqm-sitemaps.php`).
    pub id: String,
    /// Canonical folder slug the host's loader expects.
    pub slug: String,
    /// Installed version. The CLI reads it from here; embedding hosts pass
    /// the live value into each call instead (it is never cached).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Informational URL for registry records; defaults to the GitHub
    /// repository page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Timing configuration, all in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettings {
    /// How long a fetched descriptor stays fresh.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,

    /// Lifetime of the reactivation intent flags. Raise it for hosts whose
    /// install step can take longer than five minutes; an expired flag
    /// silently drops the reactivation.
    #[serde(default = "default_flag_ttl")]
    pub flag_ttl: u64,

    /// HEAD reachability probe timeout.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: u64,

    /// Overall timeout for GitHub API requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            cache_ttl: default_cache_ttl(),
            flag_ttl: default_flag_ttl(),
            probe_timeout: default_probe_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    21600 // 6 hours in seconds
}

fn default_flag_ttl() -> u64 {
    300 // 5 minutes in seconds
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl UpdaterConfig {
    /// Loads configuration from a TOML file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file syntax in {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that every required field is present and non-empty.
    pub fn validate(&self) -> Result<(), UpdateError> {
        for (field, value) in [
            ("github.owner", &self.github.owner),
            ("github.repo", &self.github.repo),
            ("plugin.id", &self.plugin.id),
            ("plugin.slug", &self.plugin.slug),
        ] {
            if value.trim().is_empty() {
                return Err(UpdateError::Config {
                    message: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Informational URL for registry records.
    pub fn plugin_url(&self) -> String {
        self.plugin.url.clone().unwrap_or_else(|| {
            format!(
                "https://github.com/{}/{}",
                self.github.owner, self.github.repo
            )
        })
    }

    /// Descriptor cache lifetime.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.update.cache_ttl as i64)
    }

    /// Reactivation flag lifetime.
    pub fn flag_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.update.flag_ttl as i64)
    }

    /// Probe timeout as a std duration.
    pub fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.update.probe_timeout)
    }

    /// API request timeout as a std duration.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.update.request_timeout)
    }
}

/// Default location of the CLI's persistent store file
/// (`~/.ghup/store.json`).
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ghup").join("store.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            [github]
            owner = "JustCasey76"
            repo = "aqm-sitemaps"

            [plugin]
            id = "aqm-sitemaps/aqm-sitemaps.php"
            slug = "aqm-sitemaps"
        "#
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: UpdaterConfig = toml::from_str(minimal_toml()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.update.cache_ttl, 21600);
        assert_eq!(config.update.flag_ttl, 300);
        assert_eq!(config.update.probe_timeout, 5);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_plugin_url_defaults_to_repository() {
        let config: UpdaterConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(
            config.plugin_url(),
            "https://github.com/JustCasey76/aqm-sitemaps"
        );
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut config: UpdaterConfig = toml::from_str(minimal_toml()).unwrap();
        config.github.owner = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("github.owner"));
    }

    #[tokio::test]
    async fn test_load_from_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ghup.toml");
        tokio::fs::write(&path, minimal_toml()).await.unwrap();

        let config = UpdaterConfig::load_from(&path).await.unwrap();
        assert_eq!(config.github.repo, "aqm-sitemaps");
        assert_eq!(config.plugin.slug, "aqm-sitemaps");
    }

    #[tokio::test]
    async fn test_load_from_missing_file_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = UpdaterConfig::load_from(&temp.path().join("absent.toml")).await;
        assert!(result.is_err());
    }
}
