pub mod crawl;
pub mod error;
pub mod report;
pub mod sitemap;

use colored::Colorize;

pub use error::CoreError;

const BANNER: &str = r#"
   _____ _ _                                              
  / ____(_) |                                             
 | (___  _| |_ ___ _ __ ___   __ _ _ __  _ __   ___ _ __ 
  \___ \| | __/ _ \ '_ ` _ \ / _` | '_ \| '_ \ / _ \ '__|
  ____) | | ||  __/ | | | | | (_| | |_) | |_) |  __/ |   
 |_____/|_|\__\___|_| |_| |_|\__,_| .__/| .__/ \___|_|   
                                  | |   | |              
                                  |_|   |_|              
"#;

pub fn print_banner() {
    println!("{}", BANNER.cyan().bold());
    println!(
        "  {} {}\n",
        "breadth-first sitemap generator".dimmed(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
