//! Navigation history and page location.
//!
//! The open image is addressable: its id is carried in the location
//! fragment, so back/forward and shared links land on the same image. The
//! viewer talks to history only through [`NavigationHistory`]; the browser
//! implementation lives in the `wasm` module and [`MemoryHistory`] serves
//! native runs and tests.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use url::Url;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::constants::{FOLDER_PARAM, IMAGE_PARAM};

/// Base that relative URLs are resolved against.
const RELATIVE_BASE: &str = "folio://local/";

static RELATIVE_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(RELATIVE_BASE).expect("Invalid relative base URL"));

/// A page URL and the parts of it the viewer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
    /// Fragment without the leading `#`, percent-decoded
    pub fragment: String,
}

impl Location {
    /// Parse a URL. Relative URLs resolve against `folio://local/`.
    ///
    /// An unparseable URL is logged and treated as the bare base.
    pub fn parse(input: &str) -> Self {
        let url = Url::options()
            .base_url(Some(&RELATIVE_BASE_URL))
            .parse(input)
            .unwrap_or_else(|e| {
                log::warn!("Cannot parse location '{}': {}", input, e);
                RELATIVE_BASE_URL.clone()
            });
        let fragment = url
            .fragment()
            .map(|fragment| percent_decode_str(fragment).decode_utf8_lossy().into_owned())
            .unwrap_or_default();
        Self { url, fragment }
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First value of a query parameter, decoded.
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// The `folder` parameter, if present and non-empty.
    pub fn folder_param(&self) -> Option<String> {
        self.param(FOLDER_PARAM).filter(|folder| !folder.is_empty())
    }

    /// The image the page should open with: the fragment, else the `image` parameter.
    pub fn initial_target(&self) -> Option<String> {
        if !self.fragment.is_empty() {
            return Some(self.fragment.clone());
        }
        self.param(IMAGE_PARAM).filter(|id| !id.is_empty())
    }

    /// The URL without its fragment.
    pub fn without_fragment(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }

    /// The URL addressing `fragment`, encoded as needed.
    pub fn with_fragment(&self, fragment: &str) -> String {
        let mut url = self.url.clone();
        url.set_fragment(Some(fragment));
        url.into()
    }
}

/// One entry pushed onto the history stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Full URL of the entry
    pub url: String,
    /// Milliseconds since the Unix epoch when the entry was pushed
    pub pushed_at_ms: u64,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn now(url: impl Into<String>) -> Self {
        let pushed_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        Self {
            url: url.into(),
            pushed_at_ms,
        }
    }
}

/// Access to the page's navigation history.
pub trait NavigationHistory {
    /// The URL of the current entry.
    fn current_url(&self) -> String;

    /// Push a new entry and make it current.
    fn push(&mut self, entry: HistoryEntry);

    /// Remove the fragment from the current URL without adding an entry.
    fn clear_fragment(&mut self);

    /// The current URL, parsed.
    fn location(&self) -> Location {
        Location::parse(&self.current_url())
    }
}

/// An in-memory history stack with back/forward.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    position: usize,
    push_count: usize,
}

impl MemoryHistory {
    /// Create a history whose only entry is `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::now(url)],
            position: 0,
            push_count: 0,
        }
    }

    /// Number of `push` calls so far.
    pub fn push_count(&self) -> usize {
        self.push_count
    }

    /// Number of entries on the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step back. Returns false at the first entry.
    pub fn back(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        log::debug!("History back to {}", self.entries[self.position].url);
        true
    }

    /// Step forward. Returns false at the last entry.
    pub fn forward(&mut self) -> bool {
        if self.position + 1 >= self.entries.len() {
            return false;
        }
        self.position += 1;
        log::debug!("History forward to {}", self.entries[self.position].url);
        true
    }
}

impl NavigationHistory for MemoryHistory {
    fn current_url(&self) -> String {
        self.entries[self.position].url.clone()
    }

    fn push(&mut self, entry: HistoryEntry) {
        // Pushing drops any forward entries, like a browser does
        self.entries.truncate(self.position + 1);
        self.entries.push(entry);
        self.position = self.entries.len() - 1;
        self.push_count += 1;
    }

    fn clear_fragment(&mut self) {
        let url = self.location().without_fragment();
        self.entries[self.position].url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let loc = Location::parse("https://host/view.html?folder=scans%2Fvol1&image=p1.jpg#p2.jpg");
        assert_eq!(loc.url().path(), "/view.html");
        assert_eq!(loc.url().query(), Some("folder=scans%2Fvol1&image=p1.jpg"));
        assert_eq!(loc.fragment, "p2.jpg");
        assert_eq!(loc.folder_param().as_deref(), Some("scans/vol1"));
        assert_eq!(loc.param("image").as_deref(), Some("p1.jpg"));
        assert_eq!(loc.param("missing"), None);
    }

    #[test]
    fn test_initial_target_prefers_fragment() {
        let loc = Location::parse("https://host/?image=a.jpg#b.jpg");
        assert_eq!(loc.initial_target().as_deref(), Some("b.jpg"));
        let loc = Location::parse("https://host/?image=a.jpg");
        assert_eq!(loc.initial_target().as_deref(), Some("a.jpg"));
        let loc = Location::parse("https://host/?image=#");
        assert_eq!(loc.initial_target(), None);
    }

    #[test]
    fn test_query_decoding() {
        let loc = Location::parse("https://host/v?folder=my+scans%20old&flag");
        assert_eq!(loc.folder_param().as_deref(), Some("my scans old"));
        assert_eq!(loc.param("flag").as_deref(), Some(""));
    }

    #[test]
    fn test_fragment_decoding() {
        assert_eq!(Location::parse("https://host/#caf%C3%A9.jpg").fragment, "café.jpg");
        assert_eq!(Location::parse("https://host/#100%").fragment, "100%");
        assert_eq!(Location::parse("https://host/#").fragment, "");
    }

    #[test]
    fn test_with_and_without_fragment() {
        let loc = Location::parse("https://host/v?folder=x#old");
        assert_eq!(loc.with_fragment("new.jpg"), "https://host/v?folder=x#new.jpg");
        assert_eq!(loc.without_fragment(), "https://host/v?folder=x");
    }

    #[test]
    fn test_fragment_round_trips_non_ascii_ids() {
        let loc = Location::parse("https://host/v");
        let url = loc.with_fragment("café.jpg");
        assert_eq!(url, "https://host/v#caf%C3%A9.jpg");
        assert_eq!(Location::parse(&url).fragment, "café.jpg");
    }

    #[test]
    fn test_relative_urls_resolve_against_local_base() {
        let loc = Location::parse("/v?folder=x#a");
        assert_eq!(loc.fragment, "a");
        assert_eq!(loc.folder_param().as_deref(), Some("x"));
        assert_eq!(loc.without_fragment(), "folio://local/v?folder=x");
    }

    #[test]
    fn test_memory_history_push_and_navigate() {
        let mut history = MemoryHistory::new("https://host/v");
        history.push(HistoryEntry::now("https://host/v#a"));
        history.push(HistoryEntry::now("https://host/v#b"));
        assert_eq!(history.push_count(), 2);
        assert_eq!(history.location().fragment, "b");

        assert!(history.back());
        assert_eq!(history.location().fragment, "a");
        assert!(history.back());
        assert_eq!(history.location().fragment, "");
        assert!(!history.back());

        assert!(history.forward());
        history.push(HistoryEntry::now("https://host/v#c"));
        assert_eq!(history.len(), 3);
        assert!(!history.forward());
    }

    #[test]
    fn test_clear_fragment_does_not_push() {
        let mut history = MemoryHistory::new("https://host/v?folder=x#a");
        history.clear_fragment();
        assert_eq!(history.current_url(), "https://host/v?folder=x");
        assert_eq!(history.push_count(), 0);
        assert_eq!(history.len(), 1);
    }
}
