//! Core types and functionality for ghup
//!
//! This module forms the foundation of the update engine's type system,
//! providing the error taxonomy used throughout the crate.
//!
//! # Error Management
//!
//! ghup's error handling is built around soft degradation: the engine is an
//! auxiliary convenience layer over the host's own (more authoritative)
//! update machinery, so no failure here may abort an in-progress host
//! install. See [`error`] for the full taxonomy:
//! - **Strongly-typed errors** ([`UpdateError`]) for precise handling in code
//! - **Automatic conversion** from common standard library errors
//! - **Generic user-facing messages** for manual-trigger failures

pub mod error;

pub use error::{Result, UpdateError};
