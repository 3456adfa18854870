use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::version;

/// One plugin's entry in the host's shared update registry.
///
/// The same shape is used for "update available" and "up to date" records;
/// only which side of the registry it lands on differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Canonical folder slug the host's plugin loader expects.
    pub slug: String,
    /// Stable plugin identifier (registry key).
    pub plugin_id: String,
    /// Version the record offers (or the installed version for up-to-date
    /// records).
    pub new_version: String,
    /// Informational URL (repository or release page).
    pub url: String,
    /// Resolved package archive URL the host should download.
    pub package: String,
    /// "Tested up to" host compatibility hint.
    pub tested: Option<String>,
    /// Minimum host version hint.
    pub requires: Option<String>,
}

/// Immutable snapshot of the host's shared update registry.
///
/// The registry is host-owned and spans every installed plugin; this type
/// models the slice of behavior the engine needs: adding or removing its
/// own plugin's entry on either side. Reconciliation consumes a snapshot
/// and returns a new one, which keeps the operation trivially testable and
/// free of ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRegistry {
    /// Update-available records, keyed by plugin identifier.
    pub response: HashMap<String, UpdateRecord>,
    /// Up-to-date records, keyed by plugin identifier.
    pub no_update: HashMap<String, UpdateRecord>,
}

impl UpdateRegistry {
    /// Creates an empty registry snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot where `record` is this plugin's sole entry, on
    /// the update-available side.
    #[must_use]
    pub fn with_update(mut self, record: UpdateRecord) -> Self {
        self.no_update.remove(&record.plugin_id);
        self.response.insert(record.plugin_id.clone(), record);
        self
    }

    /// Returns a snapshot where `record` is this plugin's sole entry, on
    /// the up-to-date side.
    ///
    /// Any stale update-available entry for the plugin is actively removed:
    /// the registry is append-only across many plugins, and a leftover
    /// offer would keep prompting the host to install an update that no
    /// longer applies.
    #[must_use]
    pub fn with_no_update(mut self, record: UpdateRecord) -> Self {
        self.response.remove(&record.plugin_id);
        self.no_update.insert(record.plugin_id.clone(), record);
        self
    }
}

/// Places `record` on the correct side of the registry based on a version
/// comparison against the installed version.
///
/// Pure function over snapshots: a fetch failure upstream means this is
/// never called and the registry passes through untouched, leaving the
/// host's own default behavior to prevail.
#[must_use]
pub fn reconcile(
    installed_version: &str,
    record: UpdateRecord,
    registry: UpdateRegistry,
) -> UpdateRegistry {
    if version::is_newer(&record.new_version, installed_version) {
        registry.with_update(record)
    } else {
        registry.with_no_update(record)
    }
}
