//! Open submission (pull request) data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One open pull request against the package index, as returned by the
/// listing endpoint. Fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Submission {
    /// Pull request number
    #[serde(default)]
    pub number: Option<u64>,

    /// Pull request title
    #[serde(default)]
    pub title: Option<String>,

    /// Web page of the pull request
    #[serde(default)]
    pub html_url: Option<String>,

    /// Unified diff of the change
    #[serde(default)]
    pub diff_url: Option<String>,

    /// API URL of the discussion thread
    #[serde(default)]
    pub issue_url: Option<String>,

    /// Free-text description written by the submitter
    #[serde(default)]
    pub body: Option<String>,

    /// Creation timestamp as sent by the server
    #[serde(default, rename = "created_at")]
    pub created_at_raw: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Submission {
    /// Creation time, or `None` when missing or unparsable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at_raw
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
