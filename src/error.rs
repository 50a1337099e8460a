//! Request-path error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;
use thiserror::Error;

use crate::http::response::{self, INTERNAL_ERROR_BODY, MISSING_DESTINATIONS_BODY, UNKNOWN_LINK_BODY};

/// Errors surfaced to the client by the gate handler.
#[derive(Debug, Error)]
pub enum GateError {
    /// No destination pair is configured for this request.
    #[error("destination URLs are not configured")]
    MissingDestinations,
    /// Keyed route with an identifier the store does not know.
    #[error("unknown link `{0}`")]
    UnknownLink(String),
    /// Inbound request body larger than the forwarding limit.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
    /// Client input rejected by the admin API.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::MissingDestinations | GateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GateError::UnknownLink(_) => StatusCode::NOT_FOUND,
            GateError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GateError::MissingDestinations => {
                tracing::error!("Request rejected: destination URLs are not configured");
                response::plain(status, MISSING_DESTINATIONS_BODY)
            }
            GateError::UnknownLink(id) => {
                tracing::debug!(id = %id, "Unknown link");
                response::plain(status, UNKNOWN_LINK_BODY)
            }
            GateError::BodyTooLarge(_) => response::plain(status, "Request body too large"),
            GateError::InvalidInput(reason) => (status, reason).into_response(),
            GateError::Internal(reason) => {
                tracing::error!(reason = %reason, "Internal error");
                response::plain(status, INTERNAL_ERROR_BODY)
            }
        }
    }
}

/// Convert a handler panic into a generic 500 without leaking details.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    response::plain(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            GateError::MissingDestinations.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GateError::UnknownLink("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GateError::InvalidInput("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn panic_is_generic_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
