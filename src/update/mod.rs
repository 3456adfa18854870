//! The update-protocol core.
//!
//! This module ties the engine's pieces into the check -> cache -> compare ->
//! offer -> resolve pipeline a plugin host drives:
//!
//! ```text
//! 1. Check
//!    ├── consult the TTL'd descriptor cache
//!    └── on miss (or forced refresh), fetch the latest GitHub release
//!
//! 2. Compare
//!    ├── installed version read live from the host, never cached
//!    └── semver precedence decides update vs. up-to-date
//!
//! 3. Offer
//!    ├── resolve a reachable package URL (probe-gated fallback chain)
//!    └── reconcile the host's shared update registry snapshot
//! ```
//!
//! # Components
//!
//! - [`UpdateDescriptor`] - normalized, immutable view of a remote release
//! - [`cache::UpdateCache`] - TTL-bounded descriptor cache over the host's
//!   key-value store
//! - [`registry`] - pure snapshot reconciliation (the update-available /
//!   up-to-date decision)
//! - [`resolver::PackageResolver`] - probe-gated download URL fallback
//!   chain
//! - [`PluginUpdater`] - the facade a host holds, wiring the above to the
//!   install-time hooks in [`crate::installer`]
//!
//! Everything here fails soft: a fetch or probe failure degrades to "no
//! update information available" and the host's own machinery carries on.

pub mod cache;
pub mod descriptor;
pub mod registry;
pub mod resolver;
pub mod updater;

pub use cache::{CacheEntry, UpdateCache};
pub use descriptor::UpdateDescriptor;
pub use registry::{UpdateRecord, UpdateRegistry};
pub use resolver::PackageResolver;
pub use updater::PluginUpdater;
