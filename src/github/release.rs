use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A release as returned by the GitHub REST API.
///
/// Only the fields the update engine consumes are modeled; everything else
/// in the payload is ignored. `tag_name` is the sole hard requirement for a
/// usable release - the rest degrade to sensible defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Git tag the release points at (e.g., `v2.2.2` or `2.2.2`).
    pub tag_name: String,
    /// GitHub's auto-generated source archive URL for the tag.
    #[serde(default)]
    pub zipball_url: Option<String>,
    /// Raw markdown release notes; absent bodies read as no changelog.
    #[serde(default)]
    pub body: Option<String>,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Whether the release is flagged as a prerelease.
    #[serde(default)]
    pub prerelease: bool,
    /// Files uploaded to the release.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset filename (e.g., `aqm-sitemaps-2.2.2.zip`).
    pub name: String,
    /// Direct download URL for the asset.
    pub browser_download_url: String,
}

impl Release {
    /// First asset whose filename ends in `.zip`, if any.
    ///
    /// An explicitly uploaded zip is preferred over the auto-generated
    /// zipball because its internal directory layout is under the
    /// publisher's control.
    pub fn zip_asset(&self) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name.ends_with(".zip"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_release() {
        let release: Release =
            serde_json::from_str(r#"{"tag_name": "v1.0.0"}"#).expect("minimal release parses");
        assert_eq!(release.tag_name, "v1.0.0");
        assert!(release.zipball_url.is_none());
        assert!(release.assets.is_empty());
        assert!(!release.prerelease);
    }

    #[test]
    fn test_zip_asset_prefers_first_zip() {
        let release: Release = serde_json::from_str(
            r#"{
                "tag_name": "v2.2.2",
                "assets": [
                    {"name": "checksums.txt", "browser_download_url": "https://example.com/sums"},
                    {"name": "plugin-2.2.2.zip", "browser_download_url": "https://example.com/a.zip"},
                    {"name": "other.zip", "browser_download_url": "https://example.com/b.zip"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(release.zip_asset().unwrap().name, "plugin-2.2.2.zip");
    }
}
