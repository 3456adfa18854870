//! Install-time hooks: directory normalization and reactivation.
//!
//! The host performs the download and archive extraction itself; this
//! module supplies the two hooks it calls around that work:
//!
//! - [`normalize_source_dir`] - fired during extraction. GitHub-generated
//!   archives name their root folder after a commit hash or `{repo}-{tag}`,
//!   never the slug the host's plugin loader requires, so the extracted
//!   directory is renamed (or copied, when rename fails) to the canonical
//!   slug.
//! - [`ReactivationController`](reactivate::ReactivationController) - fired
//!   before and after install, restoring a previously-active plugin to its
//!   active state after the file swap knocked it out.
//!
//! Both hooks are strictly non-fatal: any failure degrades to returning
//! the input unchanged or skipping the convenience step, and the host's
//! own error path takes over.

pub mod reactivate;

pub use reactivate::{PluginHost, ReactivationController};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::utils::fs::{copy_dir, remove_path};

/// Identifies the subject of the host's current install operation.
///
/// During bulk updates the host may not know which plugin an extraction
/// belongs to, in which case `plugin_id` is `None` and hooks fall back to
/// heuristics.
#[derive(Debug, Clone, Default)]
pub struct UpdateContext {
    /// Stable identifier of the plugin being operated on, when known.
    pub plugin_id: Option<String>,
}

impl UpdateContext {
    /// Context for an operation known to target `plugin_id`.
    pub fn for_plugin(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: Some(plugin_id.into()),
        }
    }

    /// Context for an operation whose subject is unknown (bulk updates).
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether this operation targets the plugin identified by
    /// `plugin_id`, falling back to a directory-name heuristic when the
    /// context carries no identifier.
    fn is_subject(&self, plugin_id: &str, extracted_name: &str, repo: &str) -> bool {
        match &self.plugin_id {
            Some(id) => id == plugin_id,
            None => extracted_name.contains(repo),
        }
    }
}

/// Renames a freshly extracted archive directory to the plugin's canonical
/// slug, returning the path the host should treat as the plugin source.
///
/// No-op (input returned unchanged) when the operation doesn't target this
/// plugin, or when the extracted directory already carries the expected
/// slug. A pre-existing entry at the target - stale leftover from a prior
/// failed attempt - is removed first, whether file or directory.
///
/// On rename failure (cross-device link, permissions) the contents are
/// copied file by file instead. If even that fails the original path is
/// returned unchanged and the host's own install error path surfaces the
/// problem - a degraded but non-fatal outcome.
pub fn normalize_source_dir(
    extracted: &Path,
    remote_root: &Path,
    ctx: &UpdateContext,
    plugin_id: &str,
    slug: &str,
    repo: &str,
) -> PathBuf {
    let extracted_name = match extracted.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return extracted.to_path_buf(),
    };

    if !ctx.is_subject(plugin_id, extracted_name, repo) {
        debug!(
            "Skipping source normalization for unrelated operation ({})",
            extracted_name
        );
        return extracted.to_path_buf();
    }

    if extracted_name == slug {
        return extracted.to_path_buf();
    }

    let target = remote_root.join(slug);

    if target.exists() {
        debug!("Removing stale target {}", target.display());
        if let Err(err) = remove_path(&target) {
            warn!("Could not clear stale target: {}", err);
            return extracted.to_path_buf();
        }
    }

    match std::fs::rename(extracted, &target) {
        Ok(()) => {
            info!(
                "Normalized extracted directory {} -> {}",
                extracted_name, slug
            );
            target
        }
        Err(err) => {
            debug!("Rename failed ({}), copying file by file", err);
            match copy_dir(extracted, &target) {
                Ok(()) => target,
                Err(copy_err) => {
                    warn!(
                        "Directory normalization failed, returning path unchanged: {}",
                        copy_err
                    );
                    extracted.to_path_buf()
                }
            }
        }
    }
}
