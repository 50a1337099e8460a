//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → matcher.rs (bypass prefixes)
//!     → router.rs (static vs keyed resolution)
//!     → Return: Bypass | Static { suffix } | Keyed { id, suffix }
//! ```
//!
//! # Design Decisions
//! - Resolver compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same resolution

pub mod matcher;
pub mod router;

pub use router::{Resolution, RouteResolver};
