use thiserror::Error;

pub const GENERIC_FETCH_ERROR: &str = "failed to fetch repository, check the token or try again";

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(String),

    #[error("duplicate repository: {0}")]
    Duplicate(String),

    #[error("{0}")]
    GitHub(String),

    #[error("a repository lookup is already in progress")]
    Busy,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Remote failure with the API's message, or the generic one when it has none.
    pub fn remote(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            TrackerError::GitHub(GENERIC_FETCH_ERROR.to_string())
        } else {
            TrackerError::GitHub(message)
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
