// Report generation from batch crawl results

use crate::crawl::SiteRow;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sitemapper_scanner::CrawlOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const MARKDOWN_HEADERS: [&str; 4] = [
    "site",
    "processing time (sec)",
    "URLs count",
    "sitemap filename",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub sites: usize,
    pub completed: usize,
    pub aborted: usize,
    pub failed: usize,
    pub total_urls: usize,
}

impl ReportSummary {
    pub fn from_rows(rows: &[SiteRow]) -> Self {
        let mut summary = ReportSummary {
            sites: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row {
                SiteRow::Done(site) => {
                    summary.total_urls += site.urls_found;
                    match site.outcome {
                        CrawlOutcome::Completed => summary.completed += 1,
                        CrawlOutcome::Aborted => summary.aborted += 1,
                    }
                }
                SiteRow::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

pub fn generate_report(rows: &[SiteRow], format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => generate_text_report(rows),
        ReportFormat::Markdown => generate_markdown_report(rows),
        ReportFormat::Json => generate_json_report(rows)?,
    })
}

/// GitHub-flavored table, one row per site.
pub fn generate_markdown_report(rows: &[SiteRow]) -> String {
    let cells: Vec<[String; 4]> = rows.iter().map(markdown_cells).collect();

    let mut widths = MARKDOWN_HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut report = String::new();
    report.push_str(&table_line(&MARKDOWN_HEADERS.map(String::from), &widths));
    report.push('|');
    for width in &widths {
        report.push_str(&"-".repeat(width + 2));
        report.push('|');
    }
    report.push('\n');
    for row in &cells {
        report.push_str(&table_line(row, &widths));
    }

    report
}

fn markdown_cells(row: &SiteRow) -> [String; 4] {
    match row {
        SiteRow::Done(site) => [
            escape_cell(&site.root_url),
            format!("{:.2}", site.processing_time_secs),
            site.urls_found.to_string(),
            escape_cell(&site.sitemap_filename()),
        ],
        SiteRow::Failed { root_url, error } => [
            escape_cell(root_url),
            "-".to_string(),
            "-".to_string(),
            escape_cell(&format!("failed: {}", error)),
        ],
    }
}

fn table_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:<width$} |", cell, width = width));
    }
    line.push('\n');
    line
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

pub fn generate_text_report(rows: &[SiteRow]) -> String {
    let summary = ReportSummary::from_rows(rows);

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Sites crawled: {}\n", summary.sites));
    report.push_str(&format!("  Completed: {}\n", summary.completed));
    report.push_str(&format!("  Stopped by time budget: {}\n", summary.aborted));
    report.push_str(&format!("  Failed: {}\n", summary.failed));
    report.push_str(&format!("  Total URLs found: {}\n", summary.total_urls));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for row in rows {
        match row {
            SiteRow::Done(site) => {
                report.push_str(&format!("## {}\n", site.root_url));
                report.push_str(&format!("  URLs found: {}\n", site.urls_found));
                report.push_str(&format!(
                    "  Processing time: {:.2}s ({})\n",
                    site.processing_time_secs, site.outcome
                ));
                report.push_str(&format!("  Sitemap: {}\n\n", site.sitemap_path.display()));
            }
            SiteRow::Failed { root_url, error } => {
                report.push_str(&format!("## {}\n", root_url));
                report.push_str(&format!("  Failed: {}\n\n", error));
            }
        }
    }

    report
}

pub fn generate_json_report(rows: &[SiteRow]) -> std::result::Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitemapper",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": ReportSummary::from_rows(rows),
            "sites": rows
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::SiteSummary;
    use std::path::PathBuf;

    fn done(root: &str, urls: usize, secs: f64, outcome: CrawlOutcome, file: &str) -> SiteRow {
        SiteRow::Done(SiteSummary {
            root_url: root.to_string(),
            processing_time_secs: secs,
            urls_found: urls,
            outcome,
            sitemap_path: PathBuf::from("sitemaps").join(file),
        })
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            done("http://a.com/", 3, 1.0, CrawlOutcome::Completed, "a.com_sitemap.xml"),
            done("http://b.com/", 5, 1000.5, CrawlOutcome::Aborted, "b.com_sitemap.xml"),
            SiteRow::Failed {
                root_url: "http://c.com/".to_string(),
                error: "unreachable".to_string(),
            },
        ];

        let summary = ReportSummary::from_rows(&rows);
        assert_eq!(
            summary,
            ReportSummary {
                sites: 3,
                completed: 1,
                aborted: 1,
                failed: 1,
                total_urls: 8,
            }
        );
    }

    #[test]
    fn test_markdown_columns_aligned() {
        let rows = vec![done(
            "http://example.com/",
            12,
            3.456,
            CrawlOutcome::Completed,
            "example.com_sitemap.xml",
        )];

        let report = generate_markdown_report(&rows);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("|---"));
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("plain"), "plain");
    }
}
