//! Reverse-proxy dispatch.
//!
//! One outbound request per inbound request, bounded by the configured
//! timeout. The full upstream body is buffered before the response is
//! built; nothing is streamed.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    response::Response,
};
use std::time::Duration;
use url::Url;

use crate::classifier::Verdict;
use crate::config::{ProxyConfig, RelayHeaderSet};
use crate::dispatch::Destination;
use crate::http::request::RequestDescriptor;
use crate::http::response::{apply_diagnostics, apply_no_cache, RenderMode};
use crate::observability::metrics;

/// Response headers relayed for every variant.
static CONTENT_HEADERS: [HeaderName; 3] = [
    header::CONTENT_TYPE,
    header::CONTENT_LANGUAGE,
    header::CONTENT_ENCODING,
];

static CACHING_HEADERS: [HeaderName; 4] = [
    header::CACHE_CONTROL,
    header::EXPIRES,
    header::LAST_MODIFIED,
    header::ETAG,
];

static SECURITY_HEADERS: [HeaderName; 3] = [
    header::CONTENT_SECURITY_POLICY,
    header::X_FRAME_OPTIONS,
    header::X_CONTENT_TYPE_OPTIONS,
];

/// Why an upstream fetch failed.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("upstream connection failed: {0}")]
    Connect(reqwest::Error),
    #[error("upstream request failed: {0}")]
    Request(reqwest::Error),
}

impl UpstreamError {
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Connect(_) => "connect",
            UpstreamError::Request(_) => "request",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(e)
        } else if e.is_connect() {
            UpstreamError::Connect(e)
        } else {
            UpstreamError::Request(e)
        }
    }
}

/// Fetch-and-relay client.
#[derive(Debug, Clone)]
pub struct ProxyDispatcher {
    client: reqwest::Client,
    config: ProxyConfig,
}

impl ProxyDispatcher {
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Allow-listed request headers, with defaults for absent ones.
    pub fn forward_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let defaults = [
            (header::USER_AGENT, &self.config.default_user_agent),
            (header::ACCEPT, &self.config.default_accept),
            (header::ACCEPT_LANGUAGE, &self.config.default_accept_language),
            (header::ACCEPT_ENCODING, &self.config.default_accept_encoding),
        ];

        let mut headers = HeaderMap::with_capacity(defaults.len());
        for (name, default) in defaults {
            let value = inbound
                .get(&name)
                .cloned()
                .or_else(|| HeaderValue::from_str(default).ok());
            if let Some(value) = value {
                headers.insert(name, value);
            }
        }
        headers
    }

    /// Perform the upstream fetch.
    pub async fn fetch(
        &self,
        target: Url,
        request: &RequestDescriptor,
        body: Bytes,
    ) -> Result<Response, UpstreamError> {
        let mut outbound = self
            .client
            .request(request.method().clone(), target)
            .headers(self.forward_headers(request.headers()));

        if request.method() != Method::GET && request.method() != Method::HEAD {
            outbound = outbound.body(body);
        }

        let upstream = outbound.send().await?;
        let status = upstream.status();
        let upstream_headers = upstream.headers().clone();
        let bytes = upstream.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        relay_headers(&upstream_headers, response.headers_mut(), self.config.header_set);
        Ok(response)
    }

    /// Fetch `target` and relay it, tagging the response with the routing
    /// decision. Failures are returned to the caller for the fallback.
    pub async fn relay(
        &self,
        verdict: &Verdict,
        destination: Destination,
        target: Url,
        request: &RequestDescriptor,
        body: Bytes,
    ) -> Result<Response, UpstreamError> {
        let target_str = target.to_string();
        match self.fetch(target, request, body).await {
            Ok(mut response) => {
                let headers = response.headers_mut();
                apply_no_cache(headers);
                apply_diagnostics(headers, verdict, destination, RenderMode::Proxy);
                Ok(response)
            }
            Err(e) => {
                tracing::error!(target = %target_str, kind = e.kind(), error = %e, "Upstream fetch failed");
                metrics::record_upstream_failure(e.kind());
                Err(e)
            }
        }
    }
}

/// Copy the allow-listed upstream response headers.
pub fn relay_headers(upstream: &HeaderMap, out: &mut HeaderMap, set: RelayHeaderSet) {
    let variant: &[HeaderName] = match set {
        RelayHeaderSet::Caching => &CACHING_HEADERS,
        RelayHeaderSet::Security => &SECURITY_HEADERS,
    };
    for name in CONTENT_HEADERS.iter().chain(variant) {
        if let Some(value) = upstream.get(name) {
            out.insert(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> ProxyDispatcher {
        ProxyDispatcher::new(ProxyConfig::default()).unwrap()
    }

    #[test]
    fn forwards_only_allow_listed_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.4.0"));
        inbound.insert(header::HOST, HeaderValue::from_static("gate.example"));
        inbound.insert(header::ORIGIN, HeaderValue::from_static("https://gate.example"));
        inbound.insert(header::REFERER, HeaderValue::from_static("https://gate.example/"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("session=1"));

        let headers = dispatcher().forward_headers(&inbound);
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[header::USER_AGENT], "curl/8.4.0");
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::ORIGIN).is_none());
        assert!(headers.get(header::REFERER).is_none());
        assert!(headers.get(header::COOKIE).is_none());
    }

    #[test]
    fn absent_headers_get_defaults() {
        let config = ProxyConfig::default();
        let headers = dispatcher().forward_headers(&HeaderMap::new());
        assert_eq!(headers[header::USER_AGENT], config.default_user_agent.as_str());
        assert_eq!(headers[header::ACCEPT], config.default_accept.as_str());
        assert_eq!(headers[header::ACCEPT_ENCODING], "identity");
    }

    #[test]
    fn relays_variant_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        upstream.insert(header::ETAG, HeaderValue::from_static("\"v1\""));
        upstream.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        upstream.insert(header::SET_COOKIE, HeaderValue::from_static("a=b"));

        let mut caching = HeaderMap::new();
        relay_headers(&upstream, &mut caching, RelayHeaderSet::Caching);
        assert_eq!(caching[header::CONTENT_TYPE], "text/plain");
        assert_eq!(caching[header::ETAG], "\"v1\"");
        assert!(caching.get(header::X_FRAME_OPTIONS).is_none());
        assert!(caching.get(header::SET_COOKIE).is_none());

        let mut security = HeaderMap::new();
        relay_headers(&upstream, &mut security, RelayHeaderSet::Security);
        assert_eq!(security[header::X_FRAME_OPTIONS], "DENY");
        assert!(security.get(header::ETAG).is_none());
    }
}
