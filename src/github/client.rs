use crate::config::DEFAULT_API_URL;
use crate::error::{Result, TrackerError, GENERIC_FETCH_ERROR};
use crate::github::types::{ApiError, RepoMetadata};
use http::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use std::fmt;
use std::future::Future;

pub const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// Everything needed to build a client. Passed around explicitly and rebuilt
/// into a fresh [`GitHubClient`] whenever the token changes.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    token: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Sets or removes the token. An empty string removes it.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn default_headers(&self) -> Result<Vec<(HeaderName, String)>> {
        let mut headers = vec![(ACCEPT, ACCEPT_GITHUB_V3.to_string())];
        if let Some(ref token) = self.token {
            let value = format!("token {token}");
            HeaderValue::from_str(&value)
                .map_err(|_| TrackerError::Config("token contains invalid characters".into()))?;
            headers.push((AUTHORIZATION, value));
        }
        Ok(headers)
    }
}

/// Rejects anything but `owner/repo` made of GitHub's name characters, so the
/// identifier can go into a route verbatim.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    let mut parts = identifier.split('/');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) => valid_segment(owner) && valid_segment(repo),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(TrackerError::Validation(format!(
            "invalid repository identifier: {identifier}"
        )))
    }
}

fn valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Looks up repository metadata by `owner/repo`.
pub trait RepoLookup {
    fn fetch_repo(&self, identifier: &str) -> impl Future<Output = Result<RepoMetadata>> + Send;
}

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
    config: ClientConfig,
}

impl GitHubClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(config.base_url.as_str())
            .map_err(|e| TrackerError::Config(format!("invalid api url: {e}")))?
            .add_retry_config(RetryConfig::None);

        for (name, value) in config.default_headers()? {
            builder = builder.add_header(name, value);
        }

        let octo = builder
            .build()
            .map_err(|e| TrackerError::GitHub(e.to_string()))?;

        tracing::debug!(
            base_url = %config.base_url,
            authenticated = config.token().is_some(),
            "github client built"
        );

        Ok(Self {
            octo,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl RepoLookup for GitHubClient {
    async fn fetch_repo(&self, identifier: &str) -> Result<RepoMetadata> {
        validate_identifier(identifier)?;
        let route = format!("/repos/{identifier}");

        let response = self.octo._get(route.as_str()).await.map_err(transport_error)?;
        let status = response.status();
        let body = self
            .octo
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("GitHub responded with {status}"));
            return Err(TrackerError::remote(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, %status, "unexpected repository payload");
            TrackerError::GitHub(GENERIC_FETCH_ERROR.to_string())
        })
    }
}

fn transport_error(e: octocrab::Error) -> TrackerError {
    tracing::debug!(error = %e, "github request failed");
    TrackerError::GitHub(GENERIC_FETCH_ERROR.to_string())
}
