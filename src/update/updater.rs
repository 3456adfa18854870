use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::UpdaterConfig;
use crate::core::Result;
use crate::github::ReleaseClient;
use crate::installer::{self, PluginHost, ReactivationController, UpdateContext};
use crate::store::KeyValueStore;
use crate::update::cache::{CacheEntry, UpdateCache};
use crate::update::registry::{self, UpdateRecord, UpdateRegistry};
use crate::update::resolver::PackageResolver;
use crate::update::UpdateDescriptor;
use crate::version;

/// The update engine's single entry point for a host environment.
///
/// One `PluginUpdater` watches one GitHub repository on behalf of one
/// plugin. It owns the fetch/cache/compare pipeline and exposes the
/// lifecycle hooks the host calls at well-defined points:
///
/// ```text
/// 1. Update check (cron-equivalent or manual trigger)
///    ├── consult cache, fetch from GitHub on miss
///    ├── resolve a reachable package URL
///    └── reconcile the host's update registry snapshot
///
/// 2. Install (driven entirely by the host)
///    ├── before_install - capture activation intent
///    ├── normalize_source_dir - fix GitHub's archive naming
///    └── after_install - restore activation
///
/// 3. Next admin load
///    └── on_admin_load - reactivation safety net
/// ```
///
/// The installed version is passed into every comparison by the caller and
/// never cached here: the live plugin manifest is the ground truth, and an
/// update swaps it out from under any copy this struct could hold.
pub struct PluginUpdater {
    config: UpdaterConfig,
    client: ReleaseClient,
    cache: UpdateCache,
    cache_key: String,
    resolver: PackageResolver,
    reactivation: ReactivationController,
}

impl PluginUpdater {
    /// Builds an updater from configuration and the host's key-value
    /// store.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the HTTP client cannot be
    /// constructed.
    pub fn new(config: UpdaterConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate()?;

        let mut client = ReleaseClient::new(config.github.token.clone(), config.request_timeout())?;
        if let Some(base) = &config.github.api_base {
            client = client.with_api_base(base.clone());
        }

        let mut resolver = PackageResolver::new(config.probe_timeout());
        if let Some(base) = &config.github.download_base {
            resolver = resolver.with_download_base(base.clone());
        }

        let cache = UpdateCache::new(store.clone(), config.cache_ttl());
        let cache_key = UpdateCache::key(&config.github.owner, &config.github.repo);
        let reactivation =
            ReactivationController::new(store, config.plugin.id.clone(), config.flag_ttl());

        Ok(Self {
            config,
            client,
            cache,
            cache_key,
            resolver,
            reactivation,
        })
    }

    /// The configuration this updater was built from.
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Cache-aware descriptor fetch.
    ///
    /// With `force_refresh` the cache is bypassed entirely and the fresh
    /// result overwrites whatever was stored; otherwise a live cache entry
    /// short-circuits the network round trip.
    pub async fn fetch_descriptor(&self, force_refresh: bool) -> Result<UpdateDescriptor> {
        if !force_refresh
            && let Some(entry) = self.cache.get(&self.cache_key)
        {
            return Ok(entry.descriptor);
        }

        let release = self
            .client
            .latest_release(&self.config.github.owner, &self.config.github.repo)
            .await?;
        let descriptor = UpdateDescriptor::from_release(&release)?;
        debug!(
            "Fetched release {} for {}/{}",
            descriptor.version, self.config.github.owner, self.config.github.repo
        );

        self.cache.put(&self.cache_key, &descriptor);
        Ok(descriptor)
    }

    /// Checks whether a newer release than `installed_version` exists.
    ///
    /// Returns the descriptor when an update is available, `None` when the
    /// installation is current.
    pub async fn check_for_update(
        &self,
        installed_version: &str,
        force_refresh: bool,
    ) -> Result<Option<UpdateDescriptor>> {
        let descriptor = self.fetch_descriptor(force_refresh).await?;

        if version::is_newer(&descriptor.version, installed_version) {
            info!(
                "Update available: {} -> {}",
                installed_version, descriptor.version
            );
            Ok(Some(descriptor))
        } else {
            debug!("Already on latest version ({})", installed_version);
            Ok(None)
        }
    }

    /// Manual "check now" trigger: drops the cache entry and re-checks
    /// against a forced fresh fetch.
    pub async fn check_now(&self, installed_version: &str) -> Result<Option<UpdateDescriptor>> {
        self.cache.invalidate(&self.cache_key);
        self.check_for_update(installed_version, true).await
    }

    /// Reconciles the host's update registry snapshot against the latest
    /// known release.
    ///
    /// Never fails: a fetch error leaves the snapshot untouched (neither
    /// side written) so the host's own default behavior prevails. Package
    /// URL resolution is re-run on every call - reachability changes.
    pub async fn reconcile(
        &self,
        installed_version: &str,
        registry: UpdateRegistry,
    ) -> UpdateRegistry {
        let descriptor = match self.fetch_descriptor(false).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                debug!("Update check failed, leaving registry untouched: {}", err);
                return registry;
            }
        };

        let package = self.resolve_package_url(&descriptor).await;
        let record = self.record_for(&descriptor, package);
        registry::reconcile(installed_version, record, registry)
    }

    /// Resolves the archive URL the host should download for `descriptor`.
    pub async fn resolve_package_url(&self, descriptor: &UpdateDescriptor) -> String {
        self.resolver
            .resolve(
                &self.client,
                descriptor,
                &self.config.github.owner,
                &self.config.github.repo,
            )
            .await
    }

    /// The last cached fetch result, if still live (status display).
    pub fn cached_entry(&self) -> Option<CacheEntry> {
        self.cache.get(&self.cache_key)
    }

    /// Drops the cached descriptor.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate(&self.cache_key);
    }

    fn record_for(&self, descriptor: &UpdateDescriptor, package: String) -> UpdateRecord {
        UpdateRecord {
            slug: self.config.plugin.slug.clone(),
            plugin_id: self.config.plugin.id.clone(),
            new_version: descriptor.version.clone(),
            url: self.config.plugin_url(),
            package,
            tested: descriptor.tested.clone(),
            requires: descriptor.requires.clone(),
        }
    }

    // Host lifecycle hooks.

    /// Captures activation intent; call immediately before the host begins
    /// installing an update.
    pub fn before_install(&self, host: &dyn PluginHost) {
        self.reactivation.before_install(host);
    }

    /// Restores activation after an install; safe to call for unrelated
    /// operations (it checks the context subject).
    pub fn after_install(&self, ctx: &UpdateContext, host: &dyn PluginHost) {
        self.reactivation.after_install(ctx, host);
    }

    /// Reactivation safety net; call on every admin load. Cheap when no
    /// retry is pending.
    pub fn on_admin_load(&self, host: &dyn PluginHost) {
        self.reactivation.on_admin_load(host);
    }

    /// Archive-extraction hook: returns the directory the host should
    /// treat as the plugin's new source (see
    /// [`installer::normalize_source_dir`]).
    pub fn normalize_source_dir(
        &self,
        extracted: &Path,
        remote_root: &Path,
        ctx: &UpdateContext,
    ) -> PathBuf {
        installer::normalize_source_dir(
            extracted,
            remote_root,
            ctx,
            &self.config.plugin.id,
            &self.config.plugin.slug,
            &self.config.github.repo,
        )
    }
}
