//! Release metadata and asset selection.

mod github;

pub use github::GithubReleases;

use serde::Deserialize;

use crate::platform::Platform;

/// Errors from querying releases or downloading assets.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("failed to query GitHub releases: {0}")]
    Query(String),
    #[error("no release asset for {0}")]
    NoMatchingAsset(String),
    #[error("download failed: {0}")]
    Download(String),
}

/// The subset of a GitHub release document the installer needs.
///
/// Unknown fields are ignored; a release without assets parses to an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub url: String,
}

/// Source of release metadata and asset bytes.
pub trait ReleaseClient {
    /// Fetch the latest published release.
    fn latest(&self) -> Result<Release, ReleaseError>;

    /// Download an asset into memory.
    fn download(&self, url: &str) -> Result<Vec<u8>, ReleaseError>;
}

/// Pick the asset for `platform` out of a release.
///
/// An asset is a candidate when its name contains both platform tokens and
/// ends with the OS archive extension. Candidates are ranked by how many of
/// the tokens appear as whole name components (split on `_`, `-`, `.`), so
/// `linux_arm64` beats `linux-musl-arm64v8`; equal ranks keep list order.
pub fn select_asset<'a>(
    release: &'a Release,
    platform: &Platform,
) -> Result<&'a ReleaseAsset, ReleaseError> {
    let (os, arch) = platform.tokens();
    let extension = platform.archive_format().extension();

    release
        .assets
        .iter()
        .filter(|asset| {
            asset.name.contains(os) && asset.name.contains(arch) && asset.name.ends_with(extension)
        })
        .min_by_key(|asset| std::cmp::Reverse(whole_token_matches(&asset.name, &[os, arch])))
        .ok_or_else(|| ReleaseError::NoMatchingAsset(platform.to_string()))
}

fn whole_token_matches(name: &str, tokens: &[&str]) -> usize {
    let parts: Vec<&str> = name.split(['_', '-', '.']).collect();
    tokens.iter().filter(|t| parts.contains(t)).count()
}
