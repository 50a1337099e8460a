//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate handler, dispatcher:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event of a request
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
