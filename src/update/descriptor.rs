use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Result, UpdateError};
use crate::github::Release;
use crate::version;

/// Normalized representation of a discovered remote release.
///
/// Created fresh on every successful GitHub fetch and immutable once
/// constructed; a newer fetch replaces the descriptor, never mutates it.
/// The cache entry is the descriptor's only owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    /// Release version with any single leading `v`/`V` stripped.
    pub version: String,
    /// Candidate archive URL - an uploaded `.zip` asset when the release
    /// has one, otherwise the auto-generated zipball. Not yet validated;
    /// the package resolver probes it before use.
    pub download_url: String,
    /// Raw markdown from the release body; empty when the release carries
    /// no notes.
    pub changelog: String,
    /// Release publication time, when GitHub reported one.
    pub published_at: Option<DateTime<Utc>>,
    /// Minimum host version hint parsed from the release notes
    /// (informational only).
    pub requires: Option<String>,
    /// "Tested up to" host version hint parsed from the release notes
    /// (informational only).
    pub tested: Option<String>,
}

impl UpdateDescriptor {
    /// Builds a descriptor from a raw GitHub release.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::MalformedRelease`] when the release has no
    /// tag name, or neither a zipball URL nor a downloadable asset - there
    /// is nothing to offer the host in either case. A missing body is not
    /// an error; the changelog is simply empty.
    pub fn from_release(release: &Release) -> Result<Self> {
        let tag = release.tag_name.trim();
        if tag.is_empty() {
            return Err(UpdateError::MalformedRelease {
                reason: "release has no tag_name".to_string(),
            });
        }

        let download_url = match release.zip_asset() {
            Some(asset) => asset.browser_download_url.clone(),
            None => release
                .zipball_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| UpdateError::MalformedRelease {
                    reason: format!("release {tag} has neither assets nor a zipball URL"),
                })?,
        };

        let changelog = release.body.clone().unwrap_or_default();

        Ok(Self {
            version: version::normalize(tag).to_string(),
            download_url,
            requires: compatibility_hint(&changelog, "requires"),
            tested: compatibility_hint(&changelog, "tested"),
            changelog,
            published_at: release.published_at,
        })
    }
}

/// Scans release notes for a `Requires: x.y` / `Tested: x.y` style line.
///
/// Publishers commonly carry host-compatibility hints in the release body;
/// they are purely informational, so any shape that doesn't match simply
/// yields `None`.
fn compatibility_hint(changelog: &str, key: &str) -> Option<String> {
    changelog.lines().find_map(|line| {
        let line = line.trim().trim_start_matches(['*', '-']).trim();
        let (head, value) = line.split_once(':')?;
        if head.trim().eq_ignore_ascii_case(key) {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
