//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (HUMAN_URL / BOT_URL / DECOY_* overrides)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AdminConfig, ClassifierConfig, DestinationConfig, DispatchConfig, DispatchMode, GateConfig,
    KeyedConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, ProxyFallback,
    RelayHeaderSet, TimeoutConfig,
};
