//! Catalog entry data structures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Recipe;

/// Catalog keyed by package name.
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// A (label, target) pair for the host UI to render as a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub target: String,
}

impl Link {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

/// A piece of rendered description text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text { text: String },
    Link(Link),
}

/// Description text with embedded links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(pub Vec<Segment>);

impl Description {
    pub fn text(text: impl Into<String>) -> Self {
        Self(vec![Segment::Text { text: text.into() }])
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Segment::Text { text: last }) => last.push_str(&text),
            _ => self.0.push(Segment::Text { text }),
        }
    }

    pub fn push_link(&mut self, link: Link) {
        self.0.push(Segment::Link(link));
    }

    /// Prepend `other` followed by a single space.
    pub fn prefixed_with(self, other: Description) -> Self {
        let mut out = other;
        out.push_text(" ");
        for segment in self.0 {
            match segment {
                Segment::Text { text } => out.push_text(text),
                Segment::Link(link) => out.push_link(link),
            }
        }
        out
    }

    /// All links in order of appearance.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.0.iter().filter_map(|s| match s {
            Segment::Link(link) => Some(link),
            Segment::Text { .. } => None,
        })
    }

    /// Text with links replaced by their labels.
    pub fn to_plain(&self) -> String {
        self.0
            .iter()
            .map(|s| match s {
                Segment::Text { text } => text.as_str(),
                Segment::Link(link) => link.label.as_str(),
            })
            .collect()
    }

    /// Text with links written back as `[label](target)`.
    pub fn to_markdown(&self) -> String {
        self.0
            .iter()
            .map(|s| match s {
                Segment::Text { text } => text.clone(),
                Segment::Link(link) => format!("[{}]({})", link.label, link.target),
            })
            .collect()
    }
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Package name (catalog key)
    pub package: String,

    /// Provenance label linking to the review queue
    pub source: Link,

    /// Submission creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// One-line summary, prefixed by a link to the discussion thread
    pub description: Description,

    /// Canonical link for the package
    pub url: String,

    pub recipe: Recipe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_merges_adjacent_text() {
        let mut desc = Description::text("a");
        desc.push_text("b");
        desc.push_link(Link::new("c", "https://c"));
        desc.push_text("");
        desc.push_text("d");
        assert_eq!(desc.0.len(), 3);
        assert_eq!(desc.to_plain(), "abcd");
    }

    #[test]
    fn test_prefixed_with() {
        let mut thread = Description::default();
        thread.push_link(Link::new("#12", "https://github.com/o/r/issues/12"));

        let desc = Description::text("Summary.").prefixed_with(thread);
        assert_eq!(desc.to_plain(), "#12 Summary.");
        assert_eq!(
            desc.to_markdown(),
            "[#12](https://github.com/o/r/issues/12) Summary."
        );
        assert_eq!(desc.links().count(), 1);
    }
}
