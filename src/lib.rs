//! ghup - GitHub-release update engine for plugin hosts
//!
//! ghup keeps a plugin installed from a GitHub repository up to date
//! without a central plugin directory: it polls the repository's releases,
//! compares against the live installed version, offers the update to the
//! host's shared update registry, and carries the install-time hooks that
//! make GitHub-generated archives and activation bookkeeping behave.
//!
//! # Architecture Overview
//!
//! The engine follows a check -> cache -> compare -> offer -> install ->
//! fix-directory -> reactivate pipeline. The host drives it; ghup never
//! downloads or installs anything itself:
//!
//! - Release metadata is fetched from the GitHub releases API (with a
//!   fallback from `releases/latest` to the release list) and normalized
//!   into an immutable descriptor
//! - A TTL'd cache over the host's key-value store bounds API traffic and
//!   is the primary defense against rate limiting
//! - Semantic-versioning precedence decides update availability; the
//!   installed version is read live at every call, never cached
//! - Package URLs are resolved through a probe-gated fallback chain that
//!   always produces some URL (GitHub's archive naming is inconsistent
//!   across repositories)
//! - Install-time hooks rename the extracted archive directory to the
//!   plugin's canonical slug and restore the plugin's active state after
//!   the file swap
//!
//! Every failure mode degrades softly: the engine is an auxiliary
//! convenience layer over the host's own update machinery and never aborts
//! a host-driven install.
//!
//! # Core Modules
//!
//! - [`update`] - the protocol core: descriptor, cache, registry
//!   reconciliation, package resolver, and the [`update::PluginUpdater`]
//!   facade
//! - [`github`] - releases API client and reachability probes
//! - [`installer`] - directory normalization and reactivation hooks
//! - [`store`] - injected key-value persistence with TTL semantics
//! - [`version`] - tag normalization and semver comparison
//!
//! ## Supporting Modules
//! - [`cli`] - the `ghup` command-line shell
//! - [`config`] - TOML configuration
//! - [`core`] - error taxonomy
//! - [`utils`] - filesystem helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ghup::config::UpdaterConfig;
//! use ghup::store::MemoryStore;
//! use ghup::update::{PluginUpdater, UpdateRegistry};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config: UpdaterConfig = toml::from_str(r#"
//!     [github]
//!     owner = "JustCasey76"
//!     repo = "aqm-sitemaps"
//!
//!     [plugin]
//!     id = "aqm-sitemaps/aqm-sitemaps.php"
//!     slug = "aqm-sitemaps"
//! "#)?;
//!
//! let updater = PluginUpdater::new(config, Arc::new(MemoryStore::new()))?;
//!
//! // Reconcile the host's registry snapshot against the latest release.
//! let registry = updater.reconcile("2.2.1", UpdateRegistry::new()).await;
//! if let Some(record) = registry.response.get("aqm-sitemaps/aqm-sitemaps.php") {
//!     println!("Update available: {} ({})", record.new_version, record.package);
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod config;
pub mod core;
pub mod github;
pub mod installer;
pub mod store;
pub mod update;
pub mod version;

// Supporting modules
pub mod cli;
pub mod utils;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
