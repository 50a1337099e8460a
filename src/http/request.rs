//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Capture the read-only request view shared by classifier and dispatcher
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The descriptor is never mutated after construction

use axum::http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// UUID v4 request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID of `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Read-only view of an inbound request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: String, query: Option<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            path,
            query,
            headers,
        }
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::new(
            parts.method.clone(),
            parts.uri.path().to_string(),
            parts.uri.query().map(str::to_string),
            parts.headers.clone(),
        )
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn request_id(&self) -> &str {
        request_id(&self.headers)
    }
}
