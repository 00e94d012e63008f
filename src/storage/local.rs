//! Local filesystem storage implementation.
//!
//! Keeps the catalog snapshot in one JSON file. Writes go to a temporary
//! file first and are renamed into place, so readers never see a partial
//! snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{CatalogSnapshot, CatalogStorage};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl CatalogStorage for LocalStorage {
    async fn load(&self) -> Result<Option<CatalogSnapshot>> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::storage(format!("{} is not a valid catalog: {e}", self.path.display()))
                })?;
                Ok(Some(snapshot))
            }
            None => {
                log::debug!("No catalog found at {}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Saved {} catalog entries to {}",
            snapshot.count,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use crate::models::{Catalog, CatalogEntry, Description, Fetcher, Link, Recipe, Value};

    fn sample_catalog() -> Catalog {
        let recipe = Recipe {
            package: "pkg".into(),
            fetcher: Fetcher::Github,
            fields: vec![
                ("repo".into(), Value::String("a/b".into())),
                ("version-regexp".into(), Value::Integer(3)),
                (
                    "files".into(),
                    Value::List(vec![
                        Value::Keyword("defaults".into()),
                        Value::List(vec![
                            Value::Keyword("exclude".into()),
                            Value::String("t.el".into()),
                        ]),
                    ]),
                ),
            ],
        };

        let mut description = Description::default();
        description.push_link(Link::new("#7", "https://github.com/melpa/melpa/issues/7"));
        description.push_text(" Ships [docs](https://d.io) too.");

        let entry = CatalogEntry {
            package: "pkg".into(),
            source: Link::new("PR", "https://github.com/melpa/melpa/pulls"),
            date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            description,
            url: "https://www.github.com/a/b".into(),
            recipe,
        };

        let mut undated = entry.clone();
        undated.package = "other".into();
        undated.date = None;

        Catalog::from([("pkg".to_string(), entry), ("other".to_string(), undated)])
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested/catalog.json"));

        let snapshot = CatalogSnapshot::new(sample_catalog());
        storage.save(&snapshot).await.unwrap();

        let loaded = storage.load().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.count, 2);
        assert!(!tmp.path().join("nested/catalog.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_missing() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("catalog.json"));
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = LocalStorage::new(&path);
        assert!(matches!(storage.load().await, Err(AppError::Storage(_))));
    }
}
