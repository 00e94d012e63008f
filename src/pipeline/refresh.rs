// src/pipeline/refresh.rs

//! Full recomputation of the catalog.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Catalog, Config};
use crate::services::{Aggregator, RecipeExtractor, SubmissionLister};
use crate::utils::http::Fetch;

/// Everything needed to recompute the catalog from the network.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetch>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List open submissions and build one entry per recoverable recipe.
    ///
    /// Only a listing failure is an error; submissions whose recipe cannot
    /// be recovered, or that miss the deadline, are left out.
    pub async fn compute(&self) -> Result<Catalog> {
        let start_time = Utc::now();

        let submissions = SubmissionLister::new(self.fetcher.as_ref(), &self.config.index)
            .list()
            .await?;

        let aggregator = Aggregator::new(
            Arc::clone(&self.fetcher),
            self.config.index.clone(),
            RecipeExtractor::new(self.config.recipe.fetchers.clone()),
            self.config.aggregator.timeout(),
        );
        let outcome = aggregator.collect(submissions).await;

        let mut catalog = Catalog::new();
        for entry in outcome.entries {
            if catalog.contains_key(&entry.package) {
                log::debug!(
                    "Duplicate submission for {}, keeping the first one",
                    entry.package
                );
                continue;
            }
            catalog.insert(entry.package.clone(), entry);
        }

        log::info!(
            "Built {} catalog entries from {} diffs ({} completed) in {}s",
            catalog.len(),
            outcome.dispatched,
            outcome.completed,
            (Utc::now() - start_time).num_seconds()
        );

        Ok(catalog)
    }
}
