use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Network failure, non-success status, or an unreadable answer body.
    #[error("Remote call failed: {0}")]
    RemoteCallFailed(String),
    #[error("Unknown portal: {0}")]
    UnknownPortal(String),
    #[error("No portal selected")]
    NoActivePortal,
    #[error("Store error: {0}")]
    Store(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        PortalError::RemoteCallFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
