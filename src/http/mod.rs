//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, gate handler)
//!     → request.rs (request ID, read-only request descriptor)
//!     → [routing resolves destination pair]
//!     → [classifier + dispatcher]
//!     → response.rs (no-cache and diagnostic headers, static bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestDescriptor, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
