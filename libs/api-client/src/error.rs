use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Invalid backend URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported backend URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Backend address error: {0}")]
    Locator(#[from] LocatorError),

    #[error("Invalid request target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Invalid API namespace: {0}")]
    InvalidNamespace(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
