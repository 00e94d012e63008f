// src/lib.rs

//! Pending package catalog library.
//!
//! Lists open submissions to a package index, recovers the recipe each one
//! adds, and serves the result as a cached catalog.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use pipeline::{CatalogCache, Pipeline, Request, run};
