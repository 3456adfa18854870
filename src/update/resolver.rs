use std::time::Duration;

use tracing::debug;

use crate::github::ReleaseClient;
use crate::update::UpdateDescriptor;

/// Default base for constructed tag-archive URLs.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

/// Resolves the archive URL the host should actually download.
///
/// GitHub's zipball and tag-archive URL formats, and the presence of a
/// literal `v` prefix on tags, are inconsistent across repositories. The
/// resolver walks an ordered candidate chain, gating each step on a HEAD
/// reachability probe, and always produces *some* URL - resolution is
/// total. Reachability can change between requests, so resolution is
/// re-run on every use and never cached.
pub struct PackageResolver {
    download_base: String,
    probe_timeout: Duration,
}

impl PackageResolver {
    /// Creates a resolver whose probes time out after `probe_timeout`.
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            probe_timeout,
        }
    }

    /// Overrides the tag-archive base URL (tests only).
    #[must_use]
    pub fn with_download_base(mut self, base: impl Into<String>) -> Self {
        self.download_base = base.into();
        self
    }

    /// Resolves the best reachable archive URL for `descriptor`.
    ///
    /// Candidate chain, in order:
    /// 1. The descriptor's own URL (uploaded `.zip` asset, else zipball),
    ///    accepted if its probe succeeds.
    /// 2. `{base}/{owner}/{repo}/archive/refs/tags/v{version}.zip`,
    ///    accepted if its probe succeeds.
    /// 3. The same URL without the leading `v`, returned unconditionally.
    ///    Returning a possibly-unreachable last resort beats returning no
    ///    package at all; the host's download step reports the real
    ///    failure if there is one.
    pub async fn resolve(
        &self,
        client: &ReleaseClient,
        descriptor: &UpdateDescriptor,
        owner: &str,
        repo: &str,
    ) -> String {
        if client
            .probe(&descriptor.download_url, self.probe_timeout)
            .await
        {
            return descriptor.download_url.clone();
        }

        let tagged = self.tag_archive_url(owner, repo, &format!("v{}", descriptor.version));
        if client.probe(&tagged, self.probe_timeout).await {
            debug!("Falling back to tag archive {}", tagged);
            return tagged;
        }

        let bare = self.tag_archive_url(owner, repo, &descriptor.version);
        debug!("All probes failed, using last-resort URL {}", bare);
        bare
    }

    fn tag_archive_url(&self, owner: &str, repo: &str, tag: &str) -> String {
        format!(
            "{}/{}/{}/archive/refs/tags/{}.zip",
            self.download_base, owner, repo, tag
        )
    }
}
