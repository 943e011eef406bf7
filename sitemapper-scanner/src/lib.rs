pub mod classifier;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod normalizer;
pub mod result;
pub mod root;

pub use classifier::is_site_url;
pub use crawler::{
    CrawlEvent, CrawlSession, CrawlState, Crawler, DEFAULT_TIME_BUDGET, ProgressCallback,
};
pub use error::{FetchError, ScanError};
pub use extractor::{HtmlLinkExtractor, LinkExtractor};
pub use fetcher::{DEFAULT_REQUEST_TIMEOUT, HttpFetcher, PageFetcher, RawContent};
pub use frontier::Frontier;
pub use normalizer::{NormalizedUrl, normalize, normalize_from};
pub use result::{CrawlOutcome, CrawlResult};
pub use root::RootUrl;
