// src/models/mod.rs

//! Domain models for the catalog pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod recipe;
mod submission;

// Re-export all public types
pub use config::{AggregatorConfig, CacheConfig, Config, HttpConfig, IndexConfig, RecipeConfig};
pub use entry::{Catalog, CatalogEntry, Description, Link, Segment};
pub use recipe::{Fetcher, Recipe, Value};
pub use submission::Submission;
