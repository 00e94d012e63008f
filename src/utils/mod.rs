//! Utility functions and helpers.

pub mod http;
pub mod sexp;
pub mod url;
