use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status: {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("token acquisition failed: {0}")]
    TokenAcquisition(String),
    #[error("other: {0}")]
    Other(String),
}
