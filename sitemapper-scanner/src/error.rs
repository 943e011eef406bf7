use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Every way a single page fetch can fail. The crawler does not tell them apart.
pub type FetchError = ScanError;

pub type Result<T> = std::result::Result<T, ScanError>;
