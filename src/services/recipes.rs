// src/services/recipes.rs

//! Recipe extraction from submission diffs.
//!
//! A submission adds one recipe file to the index, so the recipe is the
//! added text of the diff's final hunk. Earlier hunks (metadata files and
//! the like) are ignored.

use crate::models::{Fetcher, Recipe, Value};
use crate::utils::sexp;

/// Marker that opens a hunk header line.
const HUNK_MARKER: &str = "@@";

/// Extracts recipes from unified diffs.
#[derive(Debug, Clone)]
pub struct RecipeExtractor {
    fetchers: Vec<Fetcher>,
}

impl Default for RecipeExtractor {
    fn default() -> Self {
        Self::new(Fetcher::ALL.to_vec())
    }
}

impl RecipeExtractor {
    /// Create an extractor accepting the given fetchers.
    pub fn new(fetchers: Vec<Fetcher>) -> Self {
        Self { fetchers }
    }

    /// Recover a valid recipe from raw diff text, or `None` if the diff does
    /// not carry one.
    pub fn extract(&self, diff: &str) -> Option<Recipe> {
        let added = added_text_of_last_hunk(diff)?;
        let form = sexp::read(&added)?;
        self.recipe_from_form(form)
    }

    /// Validate a parsed form and turn it into a recipe.
    ///
    /// The form must be `(name :key value ...)` with a bare symbol head, an
    /// even run of keyword/value pairs, and a supported `:fetcher`.
    pub fn recipe_from_form(&self, form: Value) -> Option<Recipe> {
        let Value::List(items) = form else {
            return None;
        };
        let mut items = items.into_iter();

        let package = match items.next()? {
            Value::Symbol(name) if name != "nil" => name,
            _ => return None,
        };

        let rest: Vec<Value> = items.collect();
        if rest.len() % 2 != 0 {
            return None;
        }

        let mut fetcher = None;
        let mut fields = Vec::with_capacity(rest.len() / 2 + 1);
        let mut pairs = rest.into_iter();
        let mut seen_fetcher = false;
        while let (Some(key), Some(value)) = (pairs.next(), pairs.next()) {
            let key = key.as_keyword()?.to_string();
            // First occurrence of a key wins, as with `plist-get`.
            if key == "fetcher" {
                if !seen_fetcher {
                    seen_fetcher = true;
                    fetcher = value.as_symbol().and_then(Fetcher::from_symbol);
                }
            } else if !fields.iter().any(|(k, _)| *k == key) {
                fields.push((key, value));
            }
        }

        let fetcher = fetcher.filter(|f| self.fetchers.contains(f))?;

        if !fields.iter().any(|(k, _)| k == "files") {
            fields.push(("files".to_string(), default_files()));
        }

        Some(Recipe {
            package,
            fetcher,
            fields,
        })
    }
}

/// The "include everything sensible" file list, `(:defaults)`.
pub fn default_files() -> Value {
    Value::List(vec![Value::Keyword("defaults".to_string())])
}

/// Added content of the final hunk, with deletions and diff annotations
/// removed and the `+` markers stripped.
fn added_text_of_last_hunk(diff: &str) -> Option<String> {
    let lines: Vec<&str> = diff.lines().collect();
    let header = lines.iter().rposition(|l| l.starts_with(HUNK_MARKER))?;

    let mut out = String::new();
    for &line in &lines[header + 1..] {
        if line.starts_with('-') || line.starts_with('\\') {
            continue;
        }
        out.push_str(line.strip_prefix('+').unwrap_or(line));
        out.push('\n');
    }
    Some(out)
}
