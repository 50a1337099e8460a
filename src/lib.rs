//! Bot-aware link gate.
//!
//! Classifies each inbound request as human or automated from its headers,
//! then redirects or reverse-proxies it to one of two destinations.

pub mod admin;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use classifier::{Classifier, Verdict};
pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
