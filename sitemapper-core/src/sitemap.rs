use crate::error::{CoreError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use url::Url;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SitemapFormat {
    #[default]
    Xml,
    /// One URL per line.
    Text,
}

impl SitemapFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SitemapFormat::Xml => "xml",
            SitemapFormat::Text => "txt",
        }
    }
}

impl FromStr for SitemapFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(SitemapFormat::Xml),
            "txt" | "text" => Ok(SitemapFormat::Text),
            other => Err(format!("unknown sitemap format '{}' (expected xml or txt)", other)),
        }
    }
}

impl fmt::Display for SitemapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// `<host>_sitemap.<ext>`, or `<host>_<port>_sitemap.<ext>` for a root with an explicit port.
pub fn sitemap_filename(root: &str, format: SitemapFormat) -> Result<String> {
    let (stem, _) = sitemap_stem(root)?;
    Ok(format!("{}_sitemap.{}", stem, format.extension()))
}

/// Filenames for a batch of roots, in order. A root whose name is already taken
/// by an earlier one gets its scheme added to the stem, then a counter.
pub fn batch_sitemap_filenames<S: AsRef<str>>(
    roots: &[S],
    format: SitemapFormat,
) -> Vec<Result<String>> {
    let mut taken = HashSet::new();
    roots
        .iter()
        .map(|root| {
            let (stem, scheme) = sitemap_stem(root.as_ref())?;
            let ext = format.extension();
            let mut name = format!("{}_sitemap.{}", stem, ext);
            if taken.contains(&name) {
                name = format!("{}_{}_sitemap.{}", stem, scheme, ext);
            }
            let mut n = 2;
            while taken.contains(&name) {
                name = format!("{}_{}_{}_sitemap.{}", stem, scheme, n, ext);
                n += 1;
            }
            taken.insert(name.clone());
            Ok(name)
        })
        .collect()
}

fn sitemap_stem(root: &str) -> Result<(String, String)> {
    let url = Url::parse(root.trim()).map_err(|_| CoreError::InvalidRoot(root.to_string()))?;
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| CoreError::InvalidRoot(root.to_string()))?;

    let stem = match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    };
    Ok((stem, url.scheme().to_string()))
}

pub fn render_xml<I, S>(urls: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
        ))
        .map_err(xml_error)?;

    for url in urls {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("loc")))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::new(url.as_ref())))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("loc")))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_error)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    xml.push('\n');
    Ok(xml)
}

pub fn render_text<I, S>(urls: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for url in urls {
        text.push_str(url.as_ref());
        text.push('\n');
    }
    text
}

/// Writes the sitemap to `path`, creating missing parent directories.
pub fn write_sitemap<I, S>(urls: I, path: &Path, format: SitemapFormat) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let content = match format {
        SitemapFormat::Xml => render_xml(urls)?,
        SitemapFormat::Text => render_text(urls),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Wrote {} sitemap to {}", format, path.display());
    Ok(())
}

fn xml_error(e: impl fmt::Display) -> CoreError {
    CoreError::Xml(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_document_shape() {
        let xml = render_xml(["http://a.com/a", "http://a.com/b"]).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>http://a.com/a</loc>"));
        assert!(xml.contains("<loc>http://a.com/b</loc>"));
        assert!(xml.find("http://a.com/a") < xml.find("http://a.com/b"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_xml_escapes_markup() {
        let xml = render_xml(["http://a.com/a&b<c>"]).unwrap();

        assert!(xml.contains("<loc>http://a.com/a&amp;b&lt;c&gt;</loc>"));
    }

    #[test]
    fn test_empty_urlset() {
        let xml = render_xml(Vec::<String>::new()).unwrap();

        assert!(xml.contains("<urlset"));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_text_one_url_per_line() {
        let text = render_text(["http://a.com/a", "http://a.com/b"]);
        assert_eq!(text, "http://a.com/a\nhttp://a.com/b\n");
        assert_eq!(render_text(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            sitemap_filename("http://example.com/", SitemapFormat::Xml).unwrap(),
            "example.com_sitemap.xml"
        );
        assert_eq!(
            sitemap_filename("https://example.com", SitemapFormat::Text).unwrap(),
            "example.com_sitemap.txt"
        );
        assert_eq!(
            sitemap_filename("http://127.0.0.1:8080/", SitemapFormat::Xml).unwrap(),
            "127.0.0.1_8080_sitemap.xml"
        );
        // default port is not part of the name
        assert_eq!(
            sitemap_filename("http://example.com:80/", SitemapFormat::Xml).unwrap(),
            "example.com_sitemap.xml"
        );
    }

    #[test]
    fn test_filename_without_host() {
        assert!(matches!(
            sitemap_filename("not a url", SitemapFormat::Xml),
            Err(CoreError::InvalidRoot(_))
        ));
        assert!(matches!(
            sitemap_filename("mailto:someone@example.com", SitemapFormat::Xml),
            Err(CoreError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_batch_filenames_never_collide() {
        let roots = [
            "http://a.com/",
            "https://a.com/",
            "http://b.com:8080/",
            "http://a.com/",
            "not a url",
        ];
        let names: Vec<_> = batch_sitemap_filenames(&roots, SitemapFormat::Xml)
            .into_iter()
            .map(|name| name.ok())
            .collect();

        assert_eq!(
            names,
            vec![
                Some("a.com_sitemap.xml".to_string()),
                Some("a.com_https_sitemap.xml".to_string()),
                Some("b.com_8080_sitemap.xml".to_string()),
                Some("a.com_http_sitemap.xml".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("xml".parse::<SitemapFormat>(), Ok(SitemapFormat::Xml));
        assert_eq!("TXT".parse::<SitemapFormat>(), Ok(SitemapFormat::Text));
        assert_eq!("text".parse::<SitemapFormat>(), Ok(SitemapFormat::Text));
        assert!("html".parse::<SitemapFormat>().is_err());
        assert_eq!(SitemapFormat::default(), SitemapFormat::Xml);
    }
}
