// src/services/submissions.rs

//! Open submission listing.

use crate::error::{AppError, Result};
use crate::models::{IndexConfig, Submission};
use crate::utils::http::Fetch;

/// Accept header asking the review API for JSON.
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Lists open submissions against the package index.
pub struct SubmissionLister<'a> {
    fetcher: &'a dyn Fetch,
    index: &'a IndexConfig,
}

impl<'a> SubmissionLister<'a> {
    pub fn new(fetcher: &'a dyn Fetch, index: &'a IndexConfig) -> Self {
        Self { fetcher, index }
    }

    /// Fetch the first page of open submissions.
    ///
    /// Only one page is requested; anything beyond `page_size` is not seen.
    pub async fn list(&self) -> Result<Vec<Submission>> {
        let url = self.index.pulls_url();
        log::debug!("Listing submissions from {url}");

        let response = self
            .fetcher
            .fetch(&url, &[("Accept", ACCEPT_JSON)])
            .await
            .map_err(AppError::list)?;

        let submissions: Vec<Submission> =
            serde_json::from_slice(&response.body).map_err(AppError::list)?;

        log::info!("Found {} open submissions", submissions.len());
        Ok(submissions)
    }
}
