//! Error handling for ghup
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`UpdateError`]) for precise handling in code
//! 2. **Soft degradation** - no error in the update core may abort a
//!    host-driven install step; every failure mode reduces to "no update
//!    information available" or "skip this optional enhancement"
//!
//! # Error Categories
//!
//! - **Network**: [`UpdateError::Network`] - transport-level failure reaching
//!   GitHub or a probe target (timeout, DNS, TLS)
//! - **HTTP**: [`UpdateError::Http`] - non-200 response from the GitHub API
//!   (rate limiting, missing repository, bad token)
//! - **Release data**: [`UpdateError::MalformedRelease`] - response parsed as
//!   JSON but lacks the fields a usable release must carry
//! - **Configuration**: [`UpdateError::Config`] - invalid or missing updater
//!   configuration
//! - **Persistence**: [`UpdateError::Io`] / [`UpdateError::Json`] - store and
//!   serialization failures, converted from the standard library and
//!   `serde_json` errors
//!
//! Callers that sit on the host's update path (registry reconciliation,
//! directory fixup, reactivation) catch these internally, log at debug level,
//! and carry on. Only user-initiated operations (a manual `check`) surface a
//! failure, and then only as the generic message from
//! [`UpdateError::user_message`] - raw causes stay in the logs.

use thiserror::Error;

/// The main error type for update-engine operations.
///
/// Each variant carries enough context to log a useful diagnostic without
/// requiring the caller to reconstruct what was being attempted.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Transport-level failure reaching GitHub or a probe target.
    ///
    /// Covers timeouts, DNS resolution failures, and TLS errors. Recovered
    /// locally: a prior cache entry (if any) remains valid until its own TTL
    /// expiry.
    #[error("Network error during {operation}")]
    Network {
        /// The network operation that failed (e.g., "fetch latest release")
        operation: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The GitHub API answered with a non-success status code.
    ///
    /// Rate limiting (403/429) lands here; the TTL'd update cache is the
    /// primary defense against hitting limits, so this is never retried
    /// aggressively.
    #[error("GitHub API returned HTTP {status} for {url}")]
    Http {
        /// The HTTP status code received
        status: u16,
        /// The URL that produced the response
        url: String,
    },

    /// The release payload parsed as JSON but is not usable.
    ///
    /// A usable release needs a `tag_name` and either a zipball URL or at
    /// least one downloadable asset.
    #[error("Malformed release data: {reason}")]
    MalformedRelease {
        /// What was missing or invalid
        reason: String,
    },

    /// Updater configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// I/O error from the standard library.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error from configuration files.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl UpdateError {
    /// Generic, user-facing message for a failed manual check.
    ///
    /// Raw error details are logged internally but never shown to the end
    /// user of a manual "check now" trigger.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Updater is not configured correctly",
            _ => "Could not check for updates - please try again later",
        }
    }

    /// Whether this failure leaves previously cached update information
    /// usable.
    ///
    /// Everything except configuration errors is transient from the cache's
    /// point of view: the fetch produced no data, the prior entry stands.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}

/// Result alias used throughout the update engine.
pub type Result<T, E = UpdateError> = std::result::Result<T, E>;
