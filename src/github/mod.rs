//! GitHub releases API integration.
//!
//! This module is the only place the update engine talks to the network.
//! [`ReleaseClient`] fetches release metadata (with a fallback from the
//! `releases/latest` endpoint to the full release list) and performs the
//! lightweight HEAD reachability probes the package resolver relies on.
//!
//! Raw payload shapes live in [`release`]; everything downstream of this
//! module works with the normalized
//! [`UpdateDescriptor`](crate::update::UpdateDescriptor) instead.

pub mod client;
pub mod release;

pub use client::{DEFAULT_API_BASE, ReleaseClient};
pub use release::{Release, ReleaseAsset};
