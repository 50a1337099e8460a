//! Redirect-mode dispatch.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use crate::classifier::Verdict;
use crate::dispatch::target::compose_target;
use crate::dispatch::Destination;
use crate::http::request::RequestDescriptor;
use crate::http::response::{self, apply_diagnostics, apply_no_cache, RenderMode};

/// Location for `base` extended by the inbound suffix and query, or the
/// unmodified base when composition fails.
pub fn location(base: &str, suffix: &str, query: Option<&str>) -> String {
    match compose_target(base, suffix, query) {
        Ok(url) => url.into(),
        Err(e) => {
            tracing::warn!(base = %base, suffix = %suffix, error = %e, "Target composition failed, using base URL");
            base.to_string()
        }
    }
}

/// Build a redirect response to `base`.
pub fn redirect(
    status: StatusCode,
    verdict: &Verdict,
    destination: Destination,
    render: RenderMode,
    base: &str,
    request: &RequestDescriptor,
    suffix: &str,
) -> Response {
    let location = location(base, suffix, request.query());
    let value = match HeaderValue::from_str(&location) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(location = %location, error = %e, "Location is not a valid header value");
            return response::plain(StatusCode::INTERNAL_SERVER_ERROR, response::INTERNAL_ERROR_BODY);
        }
    };

    let mut response = Response::new(axum::body::Body::empty());
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, value);
    apply_no_cache(headers);
    apply_diagnostics(headers, verdict, destination, render);
    response
}
