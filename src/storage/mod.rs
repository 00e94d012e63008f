//! Storage abstractions for catalog persistence.
//!
//! The catalog is written as a single JSON snapshot:
//!
//! ```text
//! storage/
//! ├── config.toml      # Pipeline configuration
//! └── catalog.json     # Last refreshed catalog
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Catalog;

// Re-export for convenience
pub use local::LocalStorage;

/// On-disk form of the catalog with bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// ISO 8601 timestamp of the refresh that produced the catalog
    pub updated_at: DateTime<Utc>,
    /// Entry count
    pub count: usize,
    /// Entries keyed by package name
    pub entries: Catalog,
}

impl CatalogSnapshot {
    pub fn new(entries: Catalog) -> Self {
        Self {
            updated_at: Utc::now(),
            count: entries.len(),
            entries,
        }
    }
}

/// Trait for catalog storage backends.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Load the last saved snapshot. `Ok(None)` when nothing was saved yet.
    async fn load(&self) -> Result<Option<CatalogSnapshot>>;

    /// Replace the saved snapshot.
    async fn save(&self, snapshot: &CatalogSnapshot) -> Result<()>;
}
