//! Ordered User-Agent classification rules.

use axum::http::header::{HeaderMap, HeaderName, ACCEPT, REFERER, USER_AGENT};
use url::Url;

use crate::classifier::headers::HeaderPresence;
use crate::classifier::patterns::{find_marker, PatternTables};
use crate::classifier::verdict::{Confidence, Verdict};
use crate::config::ClassifierConfig;

/// Pure classifier over immutable pattern tables.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: PatternTables,
    missing_header_threshold: usize,
    ai_crawlers: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self::with_tables(
            PatternTables::default().with_referer_domains(&config.referer_domains),
            config,
        )
    }

    pub fn with_tables(tables: PatternTables, config: &ClassifierConfig) -> Self {
        Self {
            tables,
            missing_header_threshold: config.missing_header_threshold,
            ai_crawlers: config.ai_crawlers,
        }
    }

    pub fn tables(&self) -> &PatternTables {
        &self.tables
    }

    /// Classify a request. First matching rule wins.
    pub fn classify<H>(&self, user_agent: &str, referer: &str, headers: &H) -> Verdict
    where
        H: HeaderPresence + ?Sized,
    {
        if let Some(marker) = find_marker(user_agent, self.tables.webview) {
            return Verdict::human(Confidence::High, Some(format!("platform webview: {}", marker)));
        }

        if let Some(marker) = find_marker(user_agent, self.tables.named_crawlers) {
            return Verdict::bot(Confidence::High, format!("platform crawler: {}", marker));
        }

        let ua = user_agent.to_ascii_lowercase();

        if self.ai_crawlers {
            if let Some(marker) = find_marker(&ua, self.tables.ai_crawlers) {
                return Verdict::bot(Confidence::High, format!("ai crawler: {}", marker));
            }
        }

        if let Some(domain) = self.referer_domain(referer) {
            return Verdict::bot(Confidence::Medium, format!("platform referer: {}", domain));
        }

        let Some(marker) = find_marker(&ua, self.tables.automation) else {
            return Verdict::human(Confidence::High, None);
        };

        let missing = headers.missing_browser_headers();
        if missing >= self.missing_header_threshold {
            return Verdict::bot(
                Confidence::Medium,
                format!("automation marker {} with {} browser headers missing", marker, missing),
            );
        }

        if !headers.has(&ACCEPT) {
            return Verdict::bot(
                Confidence::Medium,
                format!("automation marker {} without accept header", marker),
            );
        }

        match find_marker(&ua, self.tables.obvious_tools) {
            Some(tool) => Verdict::bot(Confidence::Medium, format!("automation client: {}", tool)),
            None => Verdict::bot(Confidence::Low, format!("automation marker: {}", marker)),
        }
    }

    /// Classify from a raw header map. Non-UTF-8 values count as absent.
    pub fn classify_request(&self, headers: &HeaderMap) -> Verdict {
        let text = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
        };
        self.classify(text(USER_AGENT), text(REFERER), headers)
    }

    fn referer_domain(&self, referer: &str) -> Option<&str> {
        if self.tables.referer_domains.is_empty() || referer.is_empty() {
            return None;
        }
        let url = Url::parse(referer).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        self.tables
            .referer_domains
            .iter()
            .find(|domain| {
                host == domain.as_str()
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .map(String::as_str)
    }
}
