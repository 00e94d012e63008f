// src/services/entries.rs

//! Catalog entry assembly.

use crate::models::{CatalogEntry, Description, IndexConfig, Link, Recipe, Submission};
use crate::services::summary;
use crate::utils::url::{thread_label, web_thread_url};

/// Shown when a submission carries no usable summary.
pub const NO_SUMMARY: &str = "n/a";

/// Builds catalog entries from recipes and their submissions.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    index: IndexConfig,
}

impl EntryBuilder {
    pub fn new(index: IndexConfig) -> Self {
        Self { index }
    }

    /// Combine a recipe with the submission it came from.
    pub fn build(&self, recipe: Recipe, submission: &Submission) -> CatalogEntry {
        CatalogEntry {
            package: recipe.package.clone(),
            source: Link::new(&self.index.source_label, self.index.review_queue_url()),
            date: submission.created_at(),
            description: self.describe(submission),
            url: self.resolve_url(&recipe, submission),
            recipe,
        }
    }

    /// Summary line, prefixed by a link to the discussion thread when known.
    fn describe(&self, submission: &Submission) -> Description {
        let summary = summary::summarize(submission.body.as_deref())
            .unwrap_or_else(|| Description::text(NO_SUMMARY));

        let Some(issue_url) = submission.issue_url.as_deref() else {
            return summary;
        };
        let target = web_thread_url(issue_url, &self.index);
        let label = thread_label(&target).unwrap_or_else(|| target.clone());

        let mut thread = Description::default();
        thread.push_link(Link::new(label, target));
        summary.prefixed_with(thread)
    }

    /// Canonical URL: the recipe's `:url`, then a repository page derived
    /// from `:repo` for hosted fetchers, then the submission page, its
    /// discussion thread or its diff.
    fn resolve_url(&self, recipe: &Recipe, submission: &Submission) -> String {
        if let Some(url) = recipe.url() {
            return url.to_string();
        }
        if let (Some(host), Some(repo)) = (recipe.fetcher.web_host(), recipe.repo()) {
            return format!("https://{host}/{repo}");
        }
        if let Some(page) = &submission.html_url {
            return page.clone();
        }
        if let Some(issue_url) = submission.issue_url.as_deref() {
            return web_thread_url(issue_url, &self.index);
        }
        submission.diff_url.clone().unwrap_or_default()
    }
}
