// src/pipeline/cache.rs

//! Process-wide catalog cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Catalog;
use crate::pipeline::Pipeline;
use crate::storage::{CatalogSnapshot, CatalogStorage};

#[derive(Debug, Default)]
struct CacheState {
    entries: Catalog,
    updated_at: Option<DateTime<Utc>>,
}

/// Last computed catalog plus the storage it is persisted to.
///
/// The state lock is held for the whole of a refresh, so concurrent
/// refreshes run one after another and a `list` issued during a refresh
/// waits for its result.
pub struct CatalogCache {
    state: Mutex<CacheState>,
    storage: Arc<dyn CatalogStorage>,
}

impl CatalogCache {
    /// Create an empty cache without touching storage.
    pub fn empty(storage: Arc<dyn CatalogStorage>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            storage,
        }
    }

    /// Load the persisted catalog. Missing or unreadable snapshots start the
    /// cache empty.
    pub async fn init(storage: Arc<dyn CatalogStorage>) -> Self {
        let state = match storage.load().await {
            Ok(Some(snapshot)) => {
                log::info!("Loaded {} cached catalog entries", snapshot.entries.len());
                CacheState {
                    entries: snapshot.entries,
                    updated_at: Some(snapshot.updated_at),
                }
            }
            Ok(None) => CacheState::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable catalog cache: {e}");
                CacheState::default()
            }
        };

        Self {
            state: Mutex::new(state),
            storage,
        }
    }

    /// Cached catalog, computing it first if the cache is empty.
    pub async fn list(&self, pipeline: &Pipeline) -> Result<Catalog> {
        let mut state = self.state.lock().await;
        if !state.entries.is_empty() {
            return Ok(state.entries.clone());
        }
        self.refresh_locked(&mut state, pipeline).await
    }

    /// Recompute, replace and persist the catalog.
    ///
    /// A listing failure leaves the previous catalog in place.
    pub async fn refresh(&self, pipeline: &Pipeline) -> Result<Catalog> {
        let mut state = self.state.lock().await;
        self.refresh_locked(&mut state, pipeline).await
    }

    /// Write the current catalog to storage.
    pub async fn persist(&self) -> Result<()> {
        let state = self.state.lock().await;
        self.persist_locked(&state).await
    }

    /// Copy of the cached entries without triggering a refresh.
    pub async fn entries(&self) -> Catalog {
        self.state.lock().await.entries.clone()
    }

    /// When the cached catalog was computed, if ever.
    pub async fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.updated_at
    }

    async fn refresh_locked(&self, state: &mut CacheState, pipeline: &Pipeline) -> Result<Catalog> {
        let entries = pipeline.compute().await?;

        state.entries = entries;
        state.updated_at = Some(Utc::now());

        // The fresh catalog is served even if it could not be written.
        if let Err(e) = self.persist_locked(state).await {
            log::error!("Failed to persist catalog: {e}");
        }

        Ok(state.entries.clone())
    }

    async fn persist_locked(&self, state: &CacheState) -> Result<()> {
        let snapshot = CatalogSnapshot {
            updated_at: state.updated_at.unwrap_or_else(Utc::now),
            count: state.entries.len(),
            entries: state.entries.clone(),
        };
        self.storage.save(&snapshot).await
    }
}
