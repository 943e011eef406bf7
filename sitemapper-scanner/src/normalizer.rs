use crate::root::RootUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A site URL reduced to scheme, host and path. Equality on this type is the
/// crawler's notion of "same page".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&RootUrl> for NormalizedUrl {
    fn from(root: &RootUrl) -> Self {
        Self(root.as_str().to_string())
    }
}

impl From<NormalizedUrl> for String {
    fn from(url: NormalizedUrl) -> Self {
        url.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves `candidate` against the root itself.
pub fn normalize(candidate: &str, root: &RootUrl) -> Option<NormalizedUrl> {
    normalize_from(candidate, root.as_url(), root)
}

/// Resolves `candidate` against the page it was found on, then drops query and
/// fragment. Returns `None` when the href does not resolve, leaves the root's
/// site or lands on the root.
pub fn normalize_from(candidate: &str, page: &Url, root: &RootUrl) -> Option<NormalizedUrl> {
    let mut resolved = page.join(candidate.trim()).ok()?;
    if !root.same_site(&resolved) {
        return None;
    }
    resolved.set_query(None);
    resolved.set_fragment(None);

    if resolved.as_str() == root.as_str() {
        return None;
    }
    Some(NormalizedUrl(resolved.into()))
}
