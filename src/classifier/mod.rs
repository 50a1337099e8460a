//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound headers (User-Agent, Referer, presence of Accept*/Connection)
//!     → engine.rs (ordered rules, first match wins)
//!     → patterns.rs (static marker tables)
//!     → Verdict { is_bot, confidence, reason }
//!     → Verdict::is_actionable_bot() for dispatch
//! ```
//!
//! # Rules
//! 1. Platform webview marker → human/high
//! 2. Platform crawler marker (case-sensitive) → bot/high
//! 3. AI crawler marker → bot/high
//! 4. Referer from a listed domain (table empty by default) → bot/medium
//! 5. Automation marker + missing browser headers ≥ threshold → bot/medium
//! 6. Automation marker + no Accept → bot/medium
//! 7. Automation marker alone → bot/medium for obvious tools, else bot/low
//! 8. Otherwise → human/high
//!
//! # Design Decisions
//! - Pure function over immutable tables: no I/O, no hidden state
//! - Absent or non-UTF-8 headers are a negative signal, never an error
//! - Low-confidence bot verdicts are routed as human

pub mod engine;
pub mod headers;
pub mod patterns;
pub mod verdict;

pub use engine::Classifier;
pub use headers::{HeaderPresence, PresentHeaders};
pub use patterns::PatternTables;
pub use verdict::{Confidence, Verdict};
