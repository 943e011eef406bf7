use crate::error::{Result, ScanError};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// The scope anchor of a crawl.
///
/// Always an absolute `http`/`https` URL with a host. Query and fragment are
/// dropped on construction, so `http://a.com` and `http://a.com/?x=1` name the
/// same root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootUrl(Url);

impl RootUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let mut url = Url::parse(input.trim())
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", input, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                input,
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ScanError::InvalidUrl(format!("{}: missing host", input)));
        }

        url.set_query(None);
        url.set_fragment(None);
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn host_str(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Explicit non-default port, if any.
    pub fn port(&self) -> Option<u16> {
        self.0.port()
    }

    /// True when `url` has this root's scheme, host and port.
    pub fn same_site(&self, url: &Url) -> bool {
        url.scheme() == self.scheme()
            && url.host_str() == Some(self.host_str())
            && url.port() == self.port()
    }
}

impl FromStr for RootUrl {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RootUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
