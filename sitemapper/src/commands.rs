use crate::CLAP_STYLING;
use clap::{arg, command};
use sitemapper_core::crawl::DEFAULT_OUTPUT_DIR;
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress output and informational logs")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every link decision (debug level)")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site (or a list of sites) breadth-first and write one sitemap per \
                site.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The root URL of the site to crawl")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of root URLs to crawl")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-o --"output-dir" <DIR>)
                        .required(false)
                        .help("Directory the sitemaps are written to")
                        .default_value(DEFAULT_OUTPUT_DIR),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Sitemap format: xml, txt")
                        .value_parser(["xml", "txt"])
                        .default_value("xml"),
                )
                .arg(
                    arg!(--"time-budget" <SECONDS>)
                        .required(false)
                        .help("Stop a site's crawl once it has run longer than this")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM_SITES>)
                        .required(false)
                        .help("How many sites are crawled at the same time")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("4"),
                )
                .arg(
                    arg!(-r --"report" <PATH>)
                        .required(false)
                        .help("Save the results table to a file (default: display to screen only)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"report-format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, markdown, json")
                        .value_parser(["text", "markdown", "json"])
                        .default_value("markdown"),
                ),
        )
}
