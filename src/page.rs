//! Classification of the host page from its URL.
//!
//! Bundling only runs on inbox pages (`#inbox`, `#inbox/p2`, ...). The
//! starred-in-inbox search page gets date dividers only.

use url::{form_urlencoded, Url};

/// Fragment of the search page listing starred inbox messages.
pub const STARRED_PAGE_HASH: &str = "search/is%3Astarred+label%3Ainbox";

const INBOX_HASH: &str = "inbox";

/// A parsed page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    base: String,
    hash: Option<String>,
}

impl PageLocation {
    /// Parses a page URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(input)?;
        // The fragment may carry its own query, e.g. `#inbox/p2?compose=new`.
        let hash = url
            .fragment()
            .map(|f| f.split('?').next().unwrap_or_default().to_string());
        url.set_fragment(None);

        Ok(Self {
            base: url.to_string(),
            hash,
        })
    }

    /// The URL without its fragment.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// The fragment without any trailing `?query`, if present.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// The 1-based inbox page number, or `None` off the inbox.
    pub fn page_number(&self) -> Option<u32> {
        match self.hash() {
            None => Some(1),
            Some(INBOX_HASH) => Some(1),
            Some(hash) => paged(hash, INBOX_HASH),
        }
    }

    /// Whether messages on this page should be bundled.
    pub fn supports_bundling(&self) -> bool {
        self.page_number().is_some()
    }

    /// Whether this is the starred-in-inbox search page (any page of it).
    pub fn is_starred_page(&self) -> bool {
        match self.hash() {
            None => false,
            Some(STARRED_PAGE_HASH) => true,
            Some(hash) => paged(hash, STARRED_PAGE_HASH).is_some(),
        }
    }

    /// Link to the host's page for a label, used by a header's "View all".
    pub fn label_url(&self, label: &str) -> String {
        let escaped: String = form_urlencoded::byte_serialize(label.as_bytes()).collect();
        format!("{}#label/{}", self.base, escaped)
    }
}

/// Matches `<prefix>/p<digits>` and returns the digits.
fn paged(hash: &str, prefix: &str) -> Option<u32> {
    let digits = hash.strip_prefix(prefix)?.strip_prefix("/p")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
