use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitemapper_core::report::{ReportFormat, generate_report, save_report};
use sitemapper_core::sitemap::SitemapFormat;
use sitemapper_scanner::{CrawlOutcome, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TIME_BUDGET};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use url::Url;

// Re-export crawl types and functions from sitemapper-core
pub use sitemapper_core::crawl::{
    CrawlOptions, CrawlProgressCallback, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR, SiteRow,
    execute_crawl, extract_url_path,
};

// Helper functions for crawl handler

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    match Url::parse(line) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return Some(line.to_string()),
        // an explicit non-web scheme, e.g. ftp://
        Ok(_) if line.contains("://") => {
            eprintln!("{}  Skipping non-HTTP URL '{}'", "⚠".yellow(), line);
            return None;
        }
        _ => {}
    }

    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.host_str().is_some_and(|host| !host.is_empty())
    {
        return Some(with_scheme);
    }

    eprintln!("{}  Skipping invalid URL '{}'", "⚠".yellow(), line);
    None
}

/// Installs the fmt subscriber on stderr. Calling it twice is harmless.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Maps the `crawl` arguments onto batch options.
pub fn crawl_options_from_args(
    args: &ArgMatches,
    show_progress_bars: bool,
) -> anyhow::Result<CrawlOptions> {
    let urls = load_urls_from_source(
        args.get_one::<Url>("url"),
        args.get_one::<PathBuf>("hosts-file"),
    )
    .map_err(anyhow::Error::msg)?;

    let output_dir = args
        .get_one::<String>("output-dir")
        .map(String::as_str)
        .unwrap_or(DEFAULT_OUTPUT_DIR);
    let output_dir = PathBuf::from(shellexpand::tilde(output_dir).as_ref());

    let format = match args.get_one::<String>("format") {
        Some(format) => format.parse::<SitemapFormat>().map_err(anyhow::Error::msg)?,
        None => SitemapFormat::default(),
    };

    let time_budget = args
        .get_one::<u64>("time-budget")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(DEFAULT_TIME_BUDGET);
    let request_timeout = args
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let concurrency = args
        .get_one::<u64>("concurrency")
        .map(|n| *n as usize)
        .unwrap_or(DEFAULT_CONCURRENCY);

    Ok(CrawlOptions {
        urls,
        time_budget,
        request_timeout,
        concurrency,
        output_dir,
        format,
        show_progress_bars,
    })
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let options = crawl_options_from_args(sub_matches, !quiet)?;
    let report_path = sub_matches.get_one::<PathBuf>("report").cloned();
    let report_format = sub_matches
        .get_one::<String>("report-format")
        .and_then(|format| ReportFormat::from_str(format))
        .unwrap_or(ReportFormat::Markdown);

    if !quiet {
        println!("\n🕷️  Crawling {} site(s)", options.urls.len());
        println!("Output directory: {}", options.output_dir.display());
        println!("Sitemap format: {}", options.format);
        println!("Time budget: {}s per site", options.time_budget.as_secs());
        println!("Concurrency: {}\n", options.concurrency);
    }

    let progress_callback: Option<CrawlProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{}", msg);
        }))
    };

    let rows = execute_crawl(options, progress_callback)
        .await
        .context("Crawl failed")?;

    if !quiet {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
    }
    print_results(&rows);

    if let Some(path) = report_path {
        let report = generate_report(&rows, report_format)?;
        save_report(&report, &path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    if !rows.is_empty() && rows.iter().all(|row| row.summary().is_none()) {
        bail!("No sitemap could be generated");
    }

    Ok(())
}

fn print_results(rows: &[SiteRow]) {
    for row in rows {
        match row {
            SiteRow::Done(site) => {
                let outcome = match site.outcome {
                    CrawlOutcome::Completed => "completed".green(),
                    CrawlOutcome::Aborted => "time budget exhausted".yellow(),
                };
                println!(
                    "{} {}  {} URLs in {:.2}s ({})  {}",
                    "✓".green().bold(),
                    site.root_url.bright_white(),
                    site.urls_found.to_string().cyan(),
                    site.processing_time_secs,
                    outcome,
                    site.sitemap_path.display()
                );
            }
            SiteRow::Failed { root_url, error } => {
                println!("{} {}  {}", "✗".red().bold(), root_url.bright_white(), error.red());
            }
        }
    }
}
