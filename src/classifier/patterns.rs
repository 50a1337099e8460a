//! Static User-Agent pattern tables.
//!
//! Webview and named-crawler markers are matched case-sensitively against the
//! platform's documented casing. Every other table is stored lowercase and
//! matched against the lowercased User-Agent.

/// In-app browser identifiers of the short-video platform. Always human.
pub const WEBVIEW_MARKERS: &[&str] = &[
    "BytedanceWebview",
    "ByteLocale",
    "ByteFullLocale",
    "musical_ly",
    "trill_",
    "JsSdk/",
    "AppName/musical_ly",
];

/// Documented identifiers of the platform's content-fetching bots.
pub const NAMED_CRAWLER_MARKERS: &[&str] = &["Bytespider", "TikTokSpider", "TikTokBot"];

/// LLM and search-assistant fetchers (lowercase).
pub const AI_CRAWLER_MARKERS: &[&str] = &[
    "gptbot",
    "chatgpt-user",
    "oai-searchbot",
    "claudebot",
    "claude-web",
    "claude-user",
    "anthropic-ai",
    "perplexitybot",
    "perplexity-user",
    "google-extended",
    "ccbot",
    "cohere-ai",
    "meta-externalagent",
    "applebot-extended",
    "amazonbot",
    "youbot",
    "diffbot",
];

/// Broad automation hints (lowercase).
pub const AUTOMATION_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "scraper",
    "curl",
    "wget",
    "python-requests",
    "python-urllib",
    "aiohttp",
    "httpx",
    "go-http-client",
    "okhttp",
    "axios",
    "node-fetch",
    "java/",
    "libwww-perl",
    "scrapy",
    "headlesschrome",
    "phantomjs",
    "puppeteer",
    "playwright",
    "selenium",
    "webdriver",
];

/// Automation clients that are never a browser (lowercase).
pub const OBVIOUS_TOOL_MARKERS: &[&str] = &[
    "curl",
    "wget",
    "python-requests",
    "python-urllib",
    "go-http-client",
    "libwww-perl",
    "scrapy",
    "headlesschrome",
    "phantomjs",
    "puppeteer",
    "playwright",
    "selenium",
];

/// The full set of tables a [`Classifier`](super::Classifier) evaluates.
#[derive(Debug, Clone)]
pub struct PatternTables {
    pub webview: &'static [&'static str],
    pub named_crawlers: &'static [&'static str],
    pub ai_crawlers: &'static [&'static str],
    pub automation: &'static [&'static str],
    pub obvious_tools: &'static [&'static str],
    /// Lowercase referer domains. Empty keeps the referer check inert.
    pub referer_domains: Vec<String>,
}

impl Default for PatternTables {
    fn default() -> Self {
        Self {
            webview: WEBVIEW_MARKERS,
            named_crawlers: NAMED_CRAWLER_MARKERS,
            ai_crawlers: AI_CRAWLER_MARKERS,
            automation: AUTOMATION_MARKERS,
            obvious_tools: OBVIOUS_TOOL_MARKERS,
            referer_domains: Vec::new(),
        }
    }
}

impl PatternTables {
    /// Replace the referer-domain table, normalizing entries to bare
    /// lowercase hosts.
    pub fn with_referer_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.referer_domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }
}

/// First marker contained in `haystack`.
pub(crate) fn find_marker(haystack: &str, markers: &[&'static str]) -> Option<&'static str> {
    markers.iter().copied().find(|m| haystack.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_tables_are_lowercase() {
        for table in [AI_CRAWLER_MARKERS, AUTOMATION_MARKERS, OBVIOUS_TOOL_MARKERS] {
            for marker in table {
                assert_eq!(*marker, marker.to_ascii_lowercase());
            }
        }
    }

    #[test]
    fn obvious_tools_are_automation_markers() {
        for marker in OBVIOUS_TOOL_MARKERS {
            assert!(AUTOMATION_MARKERS.contains(marker), "{marker}");
        }
    }

    #[test]
    fn referer_domains_normalized() {
        let tables = PatternTables::default().with_referer_domains([" .TikTok.com ", "", "vm.tiktok.com"]);
        assert_eq!(tables.referer_domains, vec!["tiktok.com", "vm.tiktok.com"]);
    }

    #[test]
    fn find_marker_returns_first_hit() {
        assert_eq!(find_marker("curl/8.4.0 bot", AUTOMATION_MARKERS), Some("bot"));
        assert_eq!(find_marker("mozilla/5.0", AUTOMATION_MARKERS), None);
    }
}
