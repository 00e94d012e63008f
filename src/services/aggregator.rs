// src/services/aggregator.rs

//! Concurrent diff fetching and recipe extraction.
//!
//! One task is spawned per submission. Completions are collected through a
//! channel until every task has reported or the deadline passes. Tasks still
//! running at the deadline are left to finish on their own; their results
//! are discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

use crate::error::Result;
use crate::models::{CatalogEntry, IndexConfig, Submission};
use crate::services::{EntryBuilder, RecipeExtractor};
use crate::utils::http::Fetch;
use crate::utils::url::raw_diff_url;

/// Entries gathered by one aggregation run.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Entries in the order their tasks completed
    pub entries: Vec<CatalogEntry>,
    /// Tasks spawned
    pub dispatched: usize,
    /// Tasks that reported before the deadline
    pub completed: usize,
    /// Whether the deadline passed with tasks outstanding
    pub timed_out: bool,
}

/// Fans out one fetch-and-extract task per submission.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn Fetch>,
    index: IndexConfig,
    extractor: RecipeExtractor,
    builder: EntryBuilder,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        index: IndexConfig,
        extractor: RecipeExtractor,
        timeout: Duration,
    ) -> Self {
        let builder = EntryBuilder::new(index.clone());
        Self {
            fetcher,
            index,
            extractor,
            builder,
            timeout,
        }
    }

    /// Process all submissions that have a diff, waiting at most `timeout`.
    pub async fn collect(&self, submissions: Vec<Submission>) -> AggregateOutcome {
        let deadline = Instant::now() + self.timeout;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut outcome = AggregateOutcome::default();
        for submission in submissions {
            let Some(diff_url) = submission.diff_url.clone() else {
                continue;
            };

            let this = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let entry = this.process(&diff_url, submission).await;
                // The receiver is gone once the deadline has passed.
                let _ = tx.send(entry);
            });
            outcome.dispatched += 1;
        }
        drop(tx);

        while outcome.completed < outcome.dispatched {
            match timeout_at(deadline, rx.recv()).await {
                Ok(Some(entry)) => {
                    outcome.completed += 1;
                    outcome.entries.extend(entry);
                }
                Ok(None) => break,
                Err(_) => {
                    outcome.timed_out = true;
                    log::warn!(
                        "Timed out after {:?}: {} of {} diff tasks completed, continuing with partial results",
                        self.timeout,
                        outcome.completed,
                        outcome.dispatched
                    );
                    break;
                }
            }
        }

        outcome
    }

    /// Fetch one diff and turn it into an entry. Every failure is logged and
    /// reported as `None`.
    async fn process(&self, diff_url: &str, submission: Submission) -> Option<CatalogEntry> {
        let diff = match self.fetch_diff(diff_url).await {
            Ok(diff) => diff,
            Err(e) => {
                log::debug!("Skipping {diff_url}: {e}");
                return None;
            }
        };

        let Some(recipe) = self.extractor.extract(&diff) else {
            log::debug!("No valid recipe in {diff_url}");
            return None;
        };

        Some(self.builder.build(recipe, &submission))
    }

    async fn fetch_diff(&self, diff_url: &str) -> Result<String> {
        let url = raw_diff_url(diff_url, &self.index)?;
        let response = self.fetcher.fetch(&url, &[]).await?;
        Ok(response.text())
    }
}
