use crate::fetcher::RawContent;
use scraper::{Html, Selector};

/// Turns fetched content into raw `href` values, in document order.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, content: &RawContent) -> Vec<String>;
}

pub struct HtmlLinkExtractor {
    anchors: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self {
            anchors: Selector::parse("a[href]").expect("anchor selector is valid"),
        }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, content: &RawContent) -> Vec<String> {
        let document = Html::parse_document(&content.body);
        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| href.to_string())
            .collect()
    }
}
