//! In-scope / out-of-scope decision for raw hrefs.
//!
//! A candidate is a site URL when it lives on the root's scheme and host (or is
//! relative to it) and its path names an actual page: either `/`-rooted and longer
//! than `/` itself, or a bare relative segment with no `/` at all. Anything that
//! fails to parse is simply not in scope.

use crate::root::RootUrl;
use url::{ParseError, Url};

pub fn is_site_url(candidate: &str, root: &RootUrl) -> bool {
    match in_scope_path(candidate.trim(), root) {
        Some(path) => is_crawlable_path(&path),
        None => false,
    }
}

/// Path of `candidate` if it is on the root's site, `None` otherwise.
fn in_scope_path(candidate: &str, root: &RootUrl) -> Option<String> {
    match Url::parse(candidate) {
        Ok(url) => root.same_site(&url).then(|| url.path().to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            // `\` reads as `/` in http(s) references, so `/\host` is protocol-relative
            let resolved = root.as_url().join(candidate).ok()?;
            if !root.same_site(&resolved) {
                return None;
            }
            if candidate.starts_with("//") {
                Some(resolved.path().to_string())
            } else {
                Some(strip_query_and_fragment(candidate).to_string())
            }
        }
        Err(_) => None,
    }
}

fn strip_query_and_fragment(reference: &str) -> &str {
    match reference.find(['?', '#']) {
        Some(idx) => &reference[..idx],
        None => reference,
    }
}

fn is_crawlable_path(path: &str) -> bool {
    (path.starts_with('/') && path.len() > 1) || (!path.contains('/') && !path.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RootUrl {
        RootUrl::parse("http://a.com/").unwrap()
    }

    #[test]
    fn test_relative_paths() {
        let root = root();
        assert!(is_site_url("/about", &root));
        assert!(is_site_url("/docs/intro", &root));
        assert!(is_site_url("contact", &root));
        assert!(is_site_url("contact.html?lang=en", &root));
    }

    #[test]
    fn test_nested_relative_path_rejected() {
        let root = root();
        assert!(!is_site_url("sub/page", &root));
        assert!(!is_site_url("../up", &root));
        assert!(!is_site_url("./here", &root));
    }

    #[test]
    fn test_root_and_empty_paths_rejected() {
        let root = root();
        assert!(!is_site_url("", &root));
        assert!(!is_site_url("/", &root));
        assert!(!is_site_url("#frag", &root));
        assert!(!is_site_url("?page=2", &root));
        assert!(!is_site_url("http://a.com", &root));
        assert!(!is_site_url("http://a.com/", &root));
        assert!(!is_site_url("http://a.com/?x=1#top", &root));
    }

    #[test]
    fn test_absolute_same_site() {
        let root = root();
        assert!(is_site_url("http://a.com/x", &root));
        assert!(is_site_url("HTTP://A.COM/x", &root));
        assert!(is_site_url("http://a.com:80/x", &root));
        assert!(is_site_url("http://a.com/page?x=1#frag", &root));
    }

    #[test]
    fn test_off_site_rejected() {
        let root = root();
        assert!(!is_site_url("http://b.com/x", &root));
        assert!(!is_site_url("https://a.com/x", &root));
        assert!(!is_site_url("http://sub.a.com/x", &root));
        assert!(!is_site_url("http://a.com:8080/x", &root));
    }

    #[test]
    fn test_protocol_relative() {
        let root = root();
        assert!(is_site_url("//a.com/x", &root));
        assert!(!is_site_url("//b.com/x", &root));
        assert!(!is_site_url("//a.com", &root));
        assert!(!is_site_url("//", &root));
    }

    #[test]
    fn test_backslash_authority_rejected() {
        let root = root();
        assert!(!is_site_url("/\\evil.com", &root));
        assert!(!is_site_url("/\\evil.com/x", &root));
        assert!(!is_site_url("\\\\evil.com", &root));
        assert!(!is_site_url("\\/evil.com", &root));
        assert!(is_site_url("/\\a.com/x", &root));
    }

    #[test]
    fn test_other_schemes_rejected() {
        let root = root();
        assert!(!is_site_url("mailto:team@a.com", &root));
        assert!(!is_site_url("javascript:void(0)", &root));
        assert!(!is_site_url("tel:+15551234", &root));
        assert!(!is_site_url("ftp://a.com/file", &root));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert!(is_site_url("  /padded\n", &root()));
    }

    #[test]
    fn test_malformed_rejected() {
        let root = root();
        assert!(!is_site_url("http://[::1", &root));
        assert!(!is_site_url("http://", &root));
    }
}
