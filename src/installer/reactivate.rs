use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::installer::UpdateContext;
use crate::store::KeyValueStore;

/// Host hook for querying and changing plugin activation state.
///
/// The engine never flips activation state on its own; it asks the host
/// through this trait, so tests (and embedding applications) inject their
/// own implementation.
pub trait PluginHost: Send + Sync {
    /// Whether the plugin is currently active in the host.
    fn is_active(&self, plugin_id: &str) -> bool;

    /// Activates the plugin. Errors are reported to the controller, which
    /// logs and schedules at most one retry - they never propagate.
    fn activate(&self, plugin_id: &str) -> anyhow::Result<()>;
}

/// Restores a plugin's active state after an update replaces its files.
///
/// Swapping out plugin files mid-update can leave a previously-active
/// plugin marked inactive purely as a side effect of the host's
/// bookkeeping. This controller captures intent before the swap
/// (`before_install`), restores it after (`after_install`), and keeps a
/// safety net for the case where the process ends before the after-install
/// hook fires (`on_admin_load`).
///
/// Both flags are short-TTL records: a flag that outlives its update cycle
/// must never trigger a reactivation long after an unrelated deactivation,
/// so expiry bounds the blast radius of any missed hook. Activation is
/// attempted at most twice per update cycle - once immediately, once as a
/// fallback - never repeatedly on every admin load.
pub struct ReactivationController {
    store: Arc<dyn KeyValueStore>,
    plugin_id: String,
    flag_ttl: Duration,
}

impl ReactivationController {
    /// Creates a controller for `plugin_id` persisting flags to `store`.
    ///
    /// `flag_ttl` bounds how long captured intent survives; hosts whose
    /// install step can outlast it should raise it (a known limitation:
    /// expiry during a very slow install silently drops the reactivation).
    pub fn new(store: Arc<dyn KeyValueStore>, plugin_id: impl Into<String>, flag_ttl: Duration) -> Self {
        Self {
            store,
            plugin_id: plugin_id.into(),
            flag_ttl,
        }
    }

    fn was_active_key(&self) -> String {
        format!("was-active-before-update:{}", self.plugin_id)
    }

    fn pending_key(&self) -> String {
        format!("pending-reactivation:{}", self.plugin_id)
    }

    /// Captures activation intent immediately before the host begins an
    /// update, while the old code is still in place to be asked.
    pub fn before_install(&self, host: &dyn PluginHost) {
        if host.is_active(&self.plugin_id) {
            debug!("{} active before update, persisting intent", self.plugin_id);
            self.store
                .set(&self.was_active_key(), "1", Some(self.flag_ttl));
        }
    }

    /// Restores activation after the install completes, when this update's
    /// subject matches the plugin and intent was captured.
    ///
    /// On activation failure a retry flag is left behind for
    /// [`on_admin_load`](Self::on_admin_load); the failure itself is logged
    /// and swallowed - the update already succeeded, only the convenience
    /// step did not.
    pub fn after_install(&self, ctx: &UpdateContext, host: &dyn PluginHost) {
        if ctx.plugin_id.as_deref() != Some(self.plugin_id.as_str()) {
            return;
        }
        if self.store.get(&self.was_active_key()).is_none() {
            debug!("No activation intent recorded for {}", self.plugin_id);
            return;
        }
        self.store.remove(&self.was_active_key());

        match host.activate(&self.plugin_id) {
            Ok(()) => {
                info!("Reactivated {} after update", self.plugin_id);
                self.store.remove(&self.pending_key());
            }
            Err(err) => {
                warn!(
                    "Reactivation of {} failed ({}), will retry on next load",
                    self.plugin_id, err
                );
                self.store.set(&self.pending_key(), "1", Some(self.flag_ttl));
            }
        }
    }

    /// Safety-net entry point for the next admin page load.
    ///
    /// If the retry flag is set - the immediate reactivation failed, or the
    /// process ended before `after_install` ran - activation is attempted
    /// exactly once more. The flag is cleared before the attempt, success
    /// or failure, guaranteeing at-most-one-retry and ruling out
    /// reactivation loops.
    pub fn on_admin_load(&self, host: &dyn PluginHost) {
        if self.store.get(&self.pending_key()).is_none() {
            return;
        }
        self.store.remove(&self.pending_key());

        match host.activate(&self.plugin_id) {
            Ok(()) => info!("Reactivated {} on admin load", self.plugin_id),
            Err(err) => warn!(
                "Deferred reactivation of {} failed, giving up: {}",
                self.plugin_id, err
            ),
        }
    }

    /// Marks a reactivation as pending, for hosts whose install pipeline
    /// ends the process before `after_install` can run.
    pub fn mark_pending(&self) {
        self.store.set(&self.pending_key(), "1", Some(self.flag_ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Mutex;

    const PLUGIN_ID: &str = "aqm-sitemaps/aqm-sitemaps.php";

    /// Recording fake host: counts activation attempts, optionally fails
    /// the first N of them.
    struct FakeHost {
        active: bool,
        attempts: Mutex<u32>,
        failures_remaining: Mutex<u32>,
    }

    impl FakeHost {
        fn new(active: bool) -> Self {
            Self {
                active,
                attempts: Mutex::new(0),
                failures_remaining: Mutex::new(0),
            }
        }

        fn failing(active: bool, failures: u32) -> Self {
            let host = Self::new(active);
            *host.failures_remaining.lock().unwrap() = failures;
            host
        }

        fn attempts(&self) -> u32 {
            *self.attempts.lock().unwrap()
        }
    }

    impl PluginHost for FakeHost {
        fn is_active(&self, _plugin_id: &str) -> bool {
            self.active
        }

        fn activate(&self, _plugin_id: &str) -> anyhow::Result<()> {
            *self.attempts.lock().unwrap() += 1;
            let mut failures = self.failures_remaining.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                anyhow::bail!("activation refused");
            }
            Ok(())
        }
    }

    fn controller(store: Arc<MemoryStore>) -> ReactivationController {
        ReactivationController::new(store, PLUGIN_ID, Duration::minutes(5))
    }

    #[test]
    fn test_inactive_plugin_records_no_intent() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::new(false);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin(PLUGIN_ID), &host);

        assert_eq!(host.attempts(), 0);
    }

    #[test]
    fn test_active_plugin_is_reactivated_once() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::new(true);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin(PLUGIN_ID), &host);
        assert_eq!(host.attempts(), 1);

        // Subsequent admin loads do nothing.
        ctrl.on_admin_load(&host);
        ctrl.on_admin_load(&host);
        assert_eq!(host.attempts(), 1);
    }

    #[test]
    fn test_unrelated_update_subject_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::new(true);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin("other/other.php"), &host);

        assert_eq!(host.attempts(), 0);
        // Intent stays captured for the real after-install hook.
        assert!(store.get(&ctrl.was_active_key()).is_some());
    }

    #[test]
    fn test_failed_activation_retries_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::failing(true, 10);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin(PLUGIN_ID), &host);
        assert_eq!(host.attempts(), 1);

        // First admin load retries; flag cleared regardless of outcome.
        ctrl.on_admin_load(&host);
        assert_eq!(host.attempts(), 2);

        // Later loads never attempt again even though activation failed.
        ctrl.on_admin_load(&host);
        ctrl.on_admin_load(&host);
        assert_eq!(host.attempts(), 2);
    }

    #[test]
    fn test_retry_succeeds_and_clears_flag() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::failing(true, 1);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin(PLUGIN_ID), &host);
        ctrl.on_admin_load(&host);

        assert_eq!(host.attempts(), 2);
        assert!(store.get(&ctrl.pending_key()).is_none());
    }

    #[test]
    fn test_missed_after_install_recovered_via_pending() {
        // Process ended before after_install fired; the host marked a
        // pending reactivation and the next admin load picks it up.
        let store = Arc::new(MemoryStore::new());
        let ctrl = controller(store.clone());
        let host = FakeHost::new(true);

        ctrl.mark_pending();
        ctrl.on_admin_load(&host);
        assert_eq!(host.attempts(), 1);

        ctrl.on_admin_load(&host);
        assert_eq!(host.attempts(), 1);
    }

    #[test]
    fn test_expired_intent_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let ctrl = ReactivationController::new(store.clone(), PLUGIN_ID, Duration::seconds(-1));
        let host = FakeHost::new(true);

        ctrl.before_install(&host);
        ctrl.after_install(&UpdateContext::for_plugin(PLUGIN_ID), &host);

        assert_eq!(host.attempts(), 0);
    }
}
