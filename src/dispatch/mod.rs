//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Verdict + RequestDescriptor + destination pair
//!     → Destination::for_verdict (bot URL only for actionable bot verdicts)
//!     → redirect.rs (mode A: 3xx with composed Location)
//!     → proxy.rs   (mode B: single upstream fetch, relay body + allow-listed headers)
//!         on failure → static 503 page | 302 to the human destination
//! ```
//!
//! # Design Decisions
//! - Mode is fixed by configuration, never by request content
//! - Every response carries no-cache and diagnostic headers
//! - No retries: one decision, one terminal action

pub mod proxy;
pub mod redirect;
pub mod target;

use axum::{
    body::Bytes,
    http::StatusCode,
    response::Response,
};

use crate::classifier::Verdict;
use crate::config::{DestinationConfig, DispatchMode, GateConfig, ProxyFallback};
use crate::http::request::RequestDescriptor;
use crate::http::response::{self, RenderMode};

pub use proxy::{ProxyDispatcher, UpstreamError};
pub use target::compose_target;

/// Which URL of the destination pair a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Human,
    Bot,
}

impl Destination {
    pub fn for_verdict(verdict: &Verdict) -> Self {
        if verdict.is_actionable_bot() {
            Destination::Bot
        } else {
            Destination::Human
        }
    }

    pub fn url<'a>(&self, pair: &'a DestinationConfig) -> &'a str {
        match self {
            Destination::Human => &pair.human_url,
            Destination::Bot => &pair.bot_url,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Human => "human",
            Destination::Bot => "bot",
        }
    }
}

/// The outcome of a dispatch, for logging and metrics.
#[derive(Debug)]
pub struct Dispatched {
    pub response: Response,
    pub destination: Destination,
    pub render: RenderMode,
}

/// Mode-parameterized dispatcher.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: DispatchMode,
    redirect_status: StatusCode,
    proxy: ProxyDispatcher,
}

impl Dispatcher {
    pub fn new(config: &GateConfig) -> Result<Self, reqwest::Error> {
        let redirect_status =
            StatusCode::from_u16(config.dispatch.redirect_status).unwrap_or(StatusCode::FOUND);
        Ok(Self {
            mode: config.dispatch.mode,
            redirect_status,
            proxy: ProxyDispatcher::new(config.proxy.clone())?,
        })
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Route one request to its destination.
    ///
    /// `suffix` is the part of the inbound path appended to the target.
    /// `body` is only forwarded in proxy mode, and never for GET/HEAD.
    pub async fn dispatch(
        &self,
        verdict: &Verdict,
        request: &RequestDescriptor,
        pair: &DestinationConfig,
        suffix: &str,
        body: Bytes,
    ) -> Dispatched {
        let destination = Destination::for_verdict(verdict);
        let base = destination.url(pair);

        match self.mode {
            DispatchMode::Redirect => Dispatched {
                response: redirect::redirect(
                    self.redirect_status,
                    verdict,
                    destination,
                    RenderMode::Redirect,
                    base,
                    request,
                    suffix,
                ),
                destination,
                render: RenderMode::Redirect,
            },
            DispatchMode::Proxy => {
                let target = match compose_target(base, suffix, request.query()) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!(base = %base, error = %e, "Target composition failed, using base URL");
                        match url::Url::parse(base) {
                            Ok(url) => url,
                            Err(_) => return self.fallback(verdict, request, pair, suffix),
                        }
                    }
                };

                match self.proxy.relay(verdict, destination, target, request, body).await {
                    Ok(response) => Dispatched {
                        response,
                        destination,
                        render: RenderMode::Proxy,
                    },
                    Err(_) => self.fallback(verdict, request, pair, suffix),
                }
            }
        }
    }

    fn fallback(
        &self,
        verdict: &Verdict,
        request: &RequestDescriptor,
        pair: &DestinationConfig,
        suffix: &str,
    ) -> Dispatched {
        match self.proxy.config().fallback {
            ProxyFallback::Unavailable => {
                let mut response = response::service_unavailable();
                response::apply_diagnostics(
                    response.headers_mut(),
                    verdict,
                    Destination::for_verdict(verdict),
                    RenderMode::Fallback,
                );
                Dispatched {
                    response,
                    destination: Destination::for_verdict(verdict),
                    render: RenderMode::Fallback,
                }
            }
            ProxyFallback::RedirectHuman => Dispatched {
                response: redirect::redirect(
                    StatusCode::FOUND,
                    verdict,
                    Destination::Human,
                    RenderMode::Fallback,
                    &pair.human_url,
                    request,
                    suffix,
                ),
                destination: Destination::Human,
                render: RenderMode::Fallback,
            },
        }
    }
}
