use crate::error::Result;
use crate::sitemap::{SitemapFormat, batch_sitemap_filenames, sitemap_filename, write_sitemap};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use sitemapper_scanner::{
    CrawlEvent, CrawlOutcome, Crawler, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TIME_BUDGET,
    LinkExtractor, PageFetcher, RootUrl,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_OUTPUT_DIR: &str = "sitemaps";

/// Options for a batch of site crawls
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub time_budget: Duration,
    pub request_timeout: Duration,
    /// Number of sites crawled at once
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub format: SitemapFormat,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            time_budget: DEFAULT_TIME_BUDGET,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: SitemapFormat::Xml,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting batch progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub root_url: String,
    pub processing_time_secs: f64,
    pub urls_found: usize,
    pub outcome: CrawlOutcome,
    pub sitemap_path: PathBuf,
}

impl SiteSummary {
    pub fn sitemap_filename(&self) -> String {
        self.sitemap_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.sitemap_path.display().to_string())
    }
}

/// One line of the batch report.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SiteRow {
    Done(SiteSummary),
    Failed { root_url: String, error: String },
}

impl SiteRow {
    pub fn root_url(&self) -> &str {
        match self {
            SiteRow::Done(summary) => &summary.root_url,
            SiteRow::Failed { root_url, .. } => root_url,
        }
    }

    pub fn summary(&self) -> Option<&SiteSummary> {
        match self {
            SiteRow::Done(summary) => Some(summary),
            SiteRow::Failed { .. } => None,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn extract_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Crawls one site and writes its sitemap under `output_dir`.
pub async fn generate_sitemap<F: PageFetcher, X: LinkExtractor>(
    crawler: &Crawler<F, X>,
    root: &str,
    output_dir: &Path,
    format: SitemapFormat,
) -> Result<SiteSummary> {
    let root_url = RootUrl::parse(root)?;
    let sitemap_path = output_dir.join(sitemap_filename(root_url.as_str(), format)?);
    generate_sitemap_at(crawler, root, &sitemap_path, format).await
}

/// Crawls one site and writes its sitemap to `sitemap_path`.
pub async fn generate_sitemap_at<F: PageFetcher, X: LinkExtractor>(
    crawler: &Crawler<F, X>,
    root: &str,
    sitemap_path: &Path,
    format: SitemapFormat,
) -> Result<SiteSummary> {
    let root_url = RootUrl::parse(root)?;
    let result = crawler.crawl(root_url.as_str()).await?;
    write_sitemap(&result.urls, sitemap_path, format)?;

    let summary = SiteSummary {
        root_url: result.root_url.clone(),
        processing_time_secs: round_secs(result.elapsed_secs()),
        urls_found: result.len(),
        outcome: result.outcome,
        sitemap_path: sitemap_path.to_path_buf(),
    };
    info!(
        "{}: {} URLs in {:.2}s ({}), sitemap saved to {}",
        summary.root_url,
        summary.urls_found,
        summary.processing_time_secs,
        summary.outcome,
        summary.sitemap_path.display()
    );

    Ok(summary)
}

/// Execute a batch crawl with the given options.
/// Rows come back in input order; a site that fails only fails its own row.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<SiteRow>> {
    let CrawlOptions {
        urls,
        time_budget,
        request_timeout,
        concurrency,
        output_dir,
        format,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::with_timeout(request_timeout)?.with_time_budget(time_budget);
    if let Some(pb) = &progress_bar {
        let pb_clone = pb.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |event: &CrawlEvent| {
            if let Some(message) = spinner_message(event) {
                pb_clone.set_message(message);
            }
        }));
    }

    let total = urls.len();
    let crawler = &crawler;
    let output_dir = output_dir.as_path();
    let filenames = batch_sitemap_filenames(&urls, format);
    let rows: Vec<SiteRow> = stream::iter(urls.into_iter().zip(filenames).enumerate())
        .map(|(idx, (url, filename))| {
            let progress_callback = progress_callback.clone();
            async move {
                if let Some(callback) = &progress_callback
                    && total > 1
                {
                    callback(format!("Crawling host {}/{}: {}", idx + 1, total, url));
                }

                let outcome = match filename {
                    Ok(filename) => {
                        generate_sitemap_at(crawler, &url, &output_dir.join(filename), format)
                            .await
                    }
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(summary) => SiteRow::Done(summary),
                    Err(e) => {
                        warn!("Failed to generate sitemap for {}: {}", url, e);
                        if let Some(callback) = &progress_callback {
                            callback(format!("[!]  Failed to crawl {}: {}", url, e));
                        }
                        SiteRow::Failed {
                            root_url: url,
                            error: e.to_string(),
                        }
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    if let Some(pb) = &progress_bar {
        let sites = rows.iter().filter(|row| row.summary().is_some()).count();
        pb.finish_with_message(format!(
            "Crawl complete! {} of {} sitemaps written",
            sites, total
        ));
    }

    Ok(rows)
}

/// Counts are per site, since several sites share one spinner.
fn spinner_message(event: &CrawlEvent) -> Option<String> {
    match event {
        CrawlEvent::Added { url, total } => Some(format!(
            "Crawling {}... {} URLs found, last {}",
            extract_host(url),
            total,
            extract_url_path(url)
        )),
        _ => None,
    }
}

fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
