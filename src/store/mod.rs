//! Destination store subsystem.
//!
//! # Data Flow
//! ```text
//! GET /p/{id}/...
//!     → routing resolves `id`
//!     → DestinationStore::get(id) → DestinationRecord | not found
//!
//! POST /admin/links
//!     → register() → id.rs (random token) → DestinationStore::put
//! ```
//!
//! # Design Decisions
//! - The store is a collaborator behind a trait; the gate only reads
//!   and writes single records
//! - Identifiers come from the OS CSPRNG, never from a counter

pub mod id;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub use id::generate_id;
pub use memory::MemoryStore;

use crate::config::DestinationConfig;

/// Stored destination pair for one routing identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    pub human_url: String,
    pub bot_url: String,
    /// Creation time, seconds since epoch.
    pub created_at: u64,
}

impl DestinationRecord {
    pub fn new(human_url: impl Into<String>, bot_url: impl Into<String>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            human_url: human_url.into(),
            bot_url: bot_url.into(),
            created_at,
        }
    }

    pub fn destinations(&self) -> DestinationConfig {
        DestinationConfig {
            human_url: self.human_url.clone(),
            bot_url: self.bot_url.clone(),
        }
    }
}

/// Errors raised by store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not allocate a unique identifier")]
    Exhausted,
}

/// Key/value collaborator holding destination records.
pub trait DestinationStore: Send + Sync {
    fn get(&self, id: &str) -> Option<DestinationRecord>;

    fn put(&self, id: &str, record: DestinationRecord) -> Result<(), StoreError>;

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const MAX_ID_ATTEMPTS: usize = 8;

/// Store a new record under a freshly generated identifier.
pub fn register(
    store: &dyn DestinationStore,
    id_length: usize,
    human_url: &str,
    bot_url: &str,
) -> Result<(String, DestinationRecord), StoreError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate_id(id_length);
        if store.contains(&id) {
            tracing::warn!(id = %id, "Generated identifier collided, retrying");
            continue;
        }
        let record = DestinationRecord::new(human_url, bot_url);
        store.put(&id, record.clone())?;
        return Ok((id, record));
    }
    Err(StoreError::Exhausted)
}
