use std::time::Duration;

use super::{Release, ReleaseClient, ReleaseError};

/// Latest-release endpoint for gitleaks.
const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/gitleaks/gitleaks/releases/latest";

const QUERY_TIMEOUT: Duration = Duration::from_secs(20);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for GitHub's release API.
pub struct GithubReleases {
    client: reqwest::blocking::Client,
}

impl GithubReleases {
    pub fn new() -> Result<Self, ReleaseError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::Query(e.to_string()))?;
        Ok(GithubReleases { client })
    }
}

impl ReleaseClient for GithubReleases {
    fn latest(&self) -> Result<Release, ReleaseError> {
        tracing::debug!(url = LATEST_RELEASE_URL, "querying latest release");
        self.client
            .get(LATEST_RELEASE_URL)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(QUERY_TIMEOUT)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ReleaseError::Query(e.to_string()))?
            .text()
            .map_err(|e| ReleaseError::Query(e.to_string()))
            .and_then(|body| {
                serde_json::from_str(&body).map_err(|e| ReleaseError::Query(e.to_string()))
            })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ReleaseError> {
        tracing::debug!(url, "downloading release asset");
        let bytes = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| ReleaseError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
