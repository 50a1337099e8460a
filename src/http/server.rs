//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gate, health and admin handlers
//! - Wire up middleware (panic catcher, request ID, tracing, timeout, limits)
//! - Resolve, classify and dispatch every filtered request
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - The gate is the router fallback; any path not claimed by `/healthz` or
//!   the admin API reaches it
//! - Handler state is immutable and shared by `Arc`

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::classifier::Classifier;
use crate::config::{DestinationConfig, DispatchMode, GateConfig};
use crate::dispatch::Dispatcher;
use crate::error::{panic_response, GateError};
use crate::http::request::{MakeRequestUuidV4, RequestDescriptor, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{Resolution, RouteResolver};
use crate::store::{DestinationStore, MemoryStore, StoreError};

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to open destination store: {0}")]
    Store(#[from] StoreError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub classifier: Arc<Classifier>,
    pub resolver: Arc<RouteResolver>,
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<dyn DestinationStore>,
}

/// HTTP server for the gate.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server, opening the configured destination store.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let store: Arc<dyn DestinationStore> = match &config.keyed.persistence_path {
            Some(path) => Arc::new(MemoryStore::load_from_file(path)?),
            None => Arc::new(MemoryStore::new(None)),
        };
        Self::with_store(config, store)
    }

    /// Create a server backed by an existing store.
    pub fn with_store(
        config: GateConfig,
        store: Arc<dyn DestinationStore>,
    ) -> Result<Self, ServerError> {
        let state = AppState {
            classifier: Arc::new(Classifier::new(&config.classifier)),
            resolver: Arc::new(RouteResolver::from_config(&config)),
            dispatcher: Arc::new(Dispatcher::new(&config)?),
            store,
            config: Arc::new(config),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let mut router = Router::new().route("/healthz", get(healthz));
        if config.admin.enabled {
            router = router.merge(admin::router(state.clone()));
        }
        let mut router = router.fallback(gate_handler).with_state(state);

        if config.dispatch.mode == DispatchMode::Proxy {
            router = router.layer(RequestBodyLimitLayer::new(config.proxy.max_body_bytes));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(CatchPanicLayer::custom(panic_response))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = self.state.dispatcher.mode().as_str(),
            keyed = self.state.config.keyed.enabled,
            admin = self.state.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Whether a method's body is forwarded upstream.
fn forwards_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}

fn reject(err: GateError, start: Instant) -> Response {
    let response = err.into_response();
    metrics::record_request("none", "none", "error", response.status().as_u16(), start);
    response
}

/// Gate handler.
/// Resolves the destination pair, classifies the client and dispatches.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let descriptor = RequestDescriptor::from_parts(&parts);

    tracing::debug!(
        request_id = %descriptor.request_id(),
        method = %descriptor.method(),
        path = %descriptor.path(),
        "Gating request"
    );

    let (pair, suffix): (DestinationConfig, &str) = match state.resolver.resolve(descriptor.path()) {
        Resolution::Bypass => {
            let response = response::plain(StatusCode::NOT_FOUND, "Not found");
            metrics::record_request("none", "none", "bypass", 404, start);
            return response;
        }
        Resolution::Static { suffix } => match &state.config.destinations {
            Some(pair) => (pair.clone(), suffix),
            None => return reject(GateError::MissingDestinations, start),
        },
        Resolution::Keyed { id, suffix } => match state.store.get(id) {
            Some(record) => (record.destinations(), suffix),
            None => return reject(GateError::UnknownLink(id.to_string()), start),
        },
    };

    let verdict = state.classifier.classify_request(descriptor.headers());

    let body = if state.dispatcher.mode() == DispatchMode::Proxy && forwards_body(descriptor.method()) {
        let limit = state.config.proxy.max_body_bytes;
        match axum::body::to_bytes(body, limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %descriptor.request_id(), error = %e, "Failed to read request body");
                return reject(GateError::BodyTooLarge(limit), start);
            }
        }
    } else {
        Bytes::new()
    };

    let dispatched = state
        .dispatcher
        .dispatch(&verdict, &descriptor, &pair, suffix, body)
        .await;
    let status = dispatched.response.status();

    tracing::info!(
        request_id = %descriptor.request_id(),
        method = %descriptor.method(),
        path = %descriptor.path(),
        verdict = verdict.label(),
        confidence = verdict.confidence.as_str(),
        reason = verdict.reason.as_deref().unwrap_or("-"),
        destination = dispatched.destination.as_str(),
        render = dispatched.render.as_str(),
        status = status.as_u16(),
        "Request routed"
    );
    metrics::record_request(
        verdict.label(),
        dispatched.destination.as_str(),
        dispatched.render.as_str(),
        status.as_u16(),
        start,
    );

    dispatched.response
}
