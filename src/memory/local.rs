//! JSON-file-backed memory store
//!
//! Entries live in a JSON object keyed by insertion index, persisted to
//! the memory index artifact on every mutation. The empty store is `{}`,
//! which is exactly what the bootstrap seeds for a new index file.

use super::{rank_relevant, MemoryBackend, MemoryStats};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Memory backend persisted as a JSON mapping on disk
pub struct LocalMemory {
    path: PathBuf,
    entries: RwLock<Vec<String>>,
}

impl LocalMemory {
    /// Open the store at `path`, loading any existing entries.
    ///
    /// The bootstrap guarantees the file exists before backends are
    /// constructed; an unreadable or non-mapping file is an error, an
    /// empty file is treated as the empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Memory(format!(
                "failed to read memory index {}: {e}",
                path.display()
            ))
        })?;

        let entries = if contents.trim().is_empty() {
            Vec::new()
        } else {
            let map: Map<String, Value> = serde_json::from_str(&contents).map_err(|e| {
                Error::Memory(format!(
                    "memory index {} is not a JSON mapping: {e}",
                    path.display()
                ))
            })?;
            let mut indexed: Vec<(usize, String)> = map
                .into_iter()
                .filter_map(|(k, v)| {
                    let idx = k.parse::<usize>().ok()?;
                    Some((idx, v.as_str()?.to_string()))
                })
                .collect();
            indexed.sort_by_key(|(idx, _)| *idx);
            indexed.into_iter().map(|(_, text)| text).collect()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &[String]) -> Result<()> {
        let map: Map<String, Value> = entries
            .iter()
            .enumerate()
            .map(|(idx, text)| (idx.to_string(), Value::String(text.clone())))
            .collect();
        let body = serde_json::to_string(&Value::Object(map))?;
        tokio::fs::write(&self.path, body).await.map_err(|e| {
            Error::Memory(format!(
                "failed to write memory index {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl MemoryBackend for LocalMemory {
    async fn add(&self, text: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(text.to_string());
        self.persist(&entries).await
    }

    async fn get_relevant(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(rank_relevant(&entries, query, k))
    }

    async fn stats(&self) -> Result<MemoryStats> {
        Ok(MemoryStats {
            entries: self.entries.read().await.len(),
        })
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.persist(&entries).await
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_at(dir: &TempDir, initial: &str) -> LocalMemory {
        let path = dir.path().join("mem.json");
        std::fs::write(&path, initial).unwrap();
        LocalMemory::open(&path).unwrap()
    }

    #[tokio::test]
    async fn test_add_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, "{}");

        store.add("remember the milk").await.unwrap();

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("mem.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk["0"], "remember the milk");
    }

    #[tokio::test]
    async fn test_open_restores_entries_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, r#"{"1":"second","0":"first"}"#);

        let relevant = store.get_relevant("first second", 10).await.unwrap();

        assert_eq!(store.stats().await.unwrap().entries, 2);
        assert_eq!(relevant.len(), 2);
    }

    #[tokio::test]
    async fn test_open_treats_empty_file_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, "");

        assert_eq!(store.stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_clear_resets_store_and_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, r#"{"0":"stale entry"}"#);
        assert_eq!(store.stats().await.unwrap().entries, 1);

        store.clear().await.unwrap();

        assert_eq!(store.stats().await.unwrap().entries, 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("mem.json")).unwrap(),
            "{}"
        );
    }

    #[tokio::test]
    async fn test_get_relevant_filters_unrelated_entries() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, "{}");
        store.add("deploy checklist for the api server").await.unwrap();
        store.add("birthday gift ideas").await.unwrap();

        let relevant = store.get_relevant("api deploy", 5).await.unwrap();

        assert_eq!(relevant, vec!["deploy checklist for the api server"]);
    }

    #[tokio::test]
    async fn test_open_rejects_non_mapping_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mem.json");
        std::fs::write(&path, "[1,2,3]").unwrap();

        assert!(matches!(LocalMemory::open(&path), Err(Error::Memory(_))));
    }
}
