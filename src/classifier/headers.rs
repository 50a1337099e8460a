//! Header presence view consumed by the classifier.

use axum::http::header::{HeaderMap, HeaderName, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION};

/// Headers every mainstream browser sends.
pub const BROWSER_HEADERS: [HeaderName; 4] = [ACCEPT, ACCEPT_LANGUAGE, ACCEPT_ENCODING, CONNECTION];

/// Presence/absence checks over a request's headers.
pub trait HeaderPresence {
    fn has(&self, name: &HeaderName) -> bool;

    /// Number of [`BROWSER_HEADERS`] that are absent.
    fn missing_browser_headers(&self) -> usize {
        BROWSER_HEADERS.iter().filter(|name| !self.has(name)).count()
    }
}

impl HeaderPresence for HeaderMap {
    fn has(&self, name: &HeaderName) -> bool {
        self.contains_key(name)
    }
}

/// Fixed presence set, for callers that only know which headers were sent.
#[derive(Debug, Clone, Default)]
pub struct PresentHeaders(pub Vec<HeaderName>);

impl HeaderPresence for PresentHeaders {
    fn has(&self, name: &HeaderName) -> bool {
        self.0.contains(name)
    }
}
