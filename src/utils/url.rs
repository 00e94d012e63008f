// src/utils/url.rs

//! URL rewriting between API, web and raw-content hosts.

use url::Url;

use crate::error::Result;
use crate::models::IndexConfig;

/// Rewrite a submission's diff URL onto the raw-content mirror host.
///
/// `https://github.com/o/r/pull/7.diff` becomes
/// `https://patch-diff.githubusercontent.com/raw/o/r/pull/7.diff` with the
/// default configuration. An empty `diff_host` leaves the URL untouched.
pub fn raw_diff_url(diff_url: &str, index: &IndexConfig) -> Result<String> {
    if index.diff_host.is_empty() {
        return Ok(diff_url.to_string());
    }

    let mut url = Url::parse(diff_url)?;
    url.set_host(Some(index.diff_host.as_str()))?;

    let prefix = index.diff_path_prefix.trim_end_matches('/');
    if !prefix.is_empty() {
        let path = format!("{}{}", prefix, url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

/// Rewrite an API thread URL to the page a person would open in a browser.
///
/// URLs outside `{api_base}/repos/` are returned unchanged.
pub fn web_thread_url(api_url: &str, index: &IndexConfig) -> String {
    let api_prefix = format!("{}/repos/", index.api_base.trim_end_matches('/'));
    match api_url.strip_prefix(&api_prefix) {
        Some(rest) => format!("{}/{}", index.web_base.trim_end_matches('/'), rest),
        None => api_url.to_string(),
    }
}

/// Short identifier of a thread, e.g. `#9001`.
pub fn thread_label(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains(':'))
        .map(|id| format!("#{id}"))
}
