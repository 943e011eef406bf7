use sitemapper_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Crawl failed: {0}")]
    Scan(#[from] ScanError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write sitemap XML: {0}")]
    Xml(String),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot derive a sitemap name from root URL: {0}")]
    InvalidRoot(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
