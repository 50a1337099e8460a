//! Response construction helpers.
//!
//! # Responsibilities
//! - Force revalidation on every routed response
//! - Attach the diagnostic headers describing the routing decision
//! - Provide the static fallback and error bodies
//!
//! # Diagnostic headers
//! - `x-decoy-verdict`: `bot` | `human`
//! - `x-decoy-confidence`: `high` | `medium` | `low`
//! - `x-decoy-destination`: `bot` | `human` (the URL actually used)
//! - `x-decoy-render`: `redirect` | `proxy` | `fallback`

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::classifier::Verdict;
use crate::dispatch::Destination;

pub const X_DECOY_VERDICT: HeaderName = HeaderName::from_static("x-decoy-verdict");
pub const X_DECOY_CONFIDENCE: HeaderName = HeaderName::from_static("x-decoy-confidence");
pub const X_DECOY_DESTINATION: HeaderName = HeaderName::from_static("x-decoy-destination");
pub const X_DECOY_RENDER: HeaderName = HeaderName::from_static("x-decoy-render");

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Body returned when no destination pair is configured.
pub const MISSING_DESTINATIONS_BODY: &str =
    "Destination URLs are not configured. Set HUMAN_URL and BOT_URL, or define [destinations] in the configuration file.";

/// Body returned for an unknown routing identifier.
pub const UNKNOWN_LINK_BODY: &str = "Link not found";

/// Body returned for any unexpected failure.
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Page returned when the upstream cannot be fetched.
pub const SERVICE_UNAVAILABLE_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head><meta charset=\"utf-8\"><title>Service temporarily unavailable</title></head>
<body>
<h1>Service temporarily unavailable</h1>
<p>The page could not be loaded right now. Please try again in a moment.</p>
</body>
</html>
";

/// How the response body was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Redirect,
    Proxy,
    Fallback,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Redirect => "redirect",
            RenderMode::Proxy => "proxy",
            RenderMode::Fallback => "fallback",
        }
    }
}

/// Overwrite caching headers so neither browsers nor intermediaries keep
/// the response.
pub fn apply_no_cache(headers: &mut HeaderMap) {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
}

/// Attach the diagnostic headers.
pub fn apply_diagnostics(
    headers: &mut HeaderMap,
    verdict: &Verdict,
    destination: Destination,
    render: RenderMode,
) {
    headers.insert(X_DECOY_VERDICT, HeaderValue::from_static(verdict.label()));
    headers.insert(
        X_DECOY_CONFIDENCE,
        HeaderValue::from_static(verdict.confidence.as_str()),
    );
    headers.insert(X_DECOY_DESTINATION, HeaderValue::from_static(destination.as_str()));
    headers.insert(X_DECOY_RENDER, HeaderValue::from_static(render.as_str()));
}

/// Static 503 page.
pub fn service_unavailable() -> Response {
    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        SERVICE_UNAVAILABLE_PAGE,
    )
        .into_response();
    apply_no_cache(response.headers_mut());
    response
}

/// Plain-text response with no-cache headers.
pub fn plain(status: StatusCode, body: &'static str) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    apply_no_cache(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Confidence;

    #[test]
    fn no_cache_overwrites_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=3600"));
        apply_no_cache(&mut headers);

        assert_eq!(headers[header::CACHE_CONTROL], NO_CACHE);
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "0");
    }

    #[test]
    fn diagnostics_reflect_decision() {
        let mut headers = HeaderMap::new();
        let verdict = Verdict::bot(Confidence::Low, "automation marker: bot");
        apply_diagnostics(&mut headers, &verdict, Destination::Human, RenderMode::Proxy);

        assert_eq!(headers[X_DECOY_VERDICT], "bot");
        assert_eq!(headers[X_DECOY_CONFIDENCE], "low");
        assert_eq!(headers[X_DECOY_DESTINATION], "human");
        assert_eq!(headers[X_DECOY_RENDER], "proxy");
    }

    #[test]
    fn unavailable_page_is_html_503() {
        let response = service_unavailable();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
