//! Service layer for the catalog pipeline.
//!
//! This module contains the business logic for:
//! - Submission listing (`SubmissionLister`)
//! - Recipe extraction from diffs (`RecipeExtractor`)
//! - Body summaries (`summary`)
//! - Entry assembly (`EntryBuilder`)
//! - Concurrent fan-out/fan-in (`Aggregator`)

mod aggregator;
mod entries;
mod recipes;
mod submissions;
pub mod summary;

pub use aggregator::{AggregateOutcome, Aggregator};
pub use entries::{EntryBuilder, NO_SUMMARY};
pub use recipes::{RecipeExtractor, default_files};
pub use submissions::SubmissionLister;
