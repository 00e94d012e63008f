//! Pipeline entry points for catalog requests.
//!
//! - `run`: serve a `list` or `refresh` request from the host catalog
//! - `Pipeline`: recompute the catalog from open submissions
//! - `CatalogCache`: hold and persist the last computed catalog

mod cache;
mod refresh;

use std::fmt;
use std::str::FromStr;

pub use cache::CatalogCache;
pub use refresh::Pipeline;

use crate::error::{AppError, Result};
use crate::models::Catalog;

/// Kind of request the host catalog makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Serve the cache, populating it first if empty
    List,
    /// Recompute the catalog
    Refresh,
}

impl FromStr for Request {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(Request::List),
            "refresh" => Ok(Request::Refresh),
            other => Err(AppError::validation(format!("unknown request kind: {other}"))),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::List => f.write_str("list"),
            Request::Refresh => f.write_str("refresh"),
        }
    }
}

/// Serve one catalog request.
pub async fn run(request: Request, cache: &CatalogCache, pipeline: &Pipeline) -> Result<Catalog> {
    log::debug!("Handling {request} request");
    match request {
        Request::List => cache.list(pipeline).await,
        Request::Refresh => cache.refresh(pipeline).await,
    }
}
