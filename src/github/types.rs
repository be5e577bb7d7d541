use serde::Deserialize;

/// Error body GitHub sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// Subset of `GET /repos/{owner}/{repo}` the tracker reads.
#[derive(Clone, Debug, Deserialize)]
pub struct RepoMetadata {
    pub full_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
}
