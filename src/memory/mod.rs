//! Persistent assistant memory
//!
//! The interaction loop reads and writes memory through the
//! [`MemoryBackend`] trait; which implementation backs it is selected at
//! startup from the `--use-memory` flag. Wiping prior contents for a
//! fresh run is the backend's own `clear` capability, requested by the
//! caller after construction — the bootstrap layer never inspects the
//! store.

mod local;
mod volatile;

pub use local::LocalMemory;
pub use volatile::VolatileMemory;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Counters reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Number of stored entries
    pub entries: usize,
}

/// Interface every memory backend implements
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Append one entry
    async fn add(&self, text: &str) -> Result<()>;

    /// The `k` stored entries most relevant to `query`, best first.
    /// Entries sharing no token with the query are never returned.
    async fn get_relevant(&self, query: &str, k: usize) -> Result<Vec<String>>;

    /// Current store counters
    async fn stats(&self) -> Result<MemoryStats>;

    /// Discard all stored entries. This is the reset capability invoked
    /// when the caller requests a clean start.
    async fn clear(&self) -> Result<()>;

    /// Human-readable backend name, for startup logging
    fn name(&self) -> &'static str;
}

/// Backend selector, parsed from `--use-memory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MemoryKind {
    /// JSON file persisted at the memory index path
    #[default]
    Local,
    /// Process-local only, nothing written to disk
    Volatile,
}

/// Construct the selected backend over the memory index at `path`.
///
/// When `reset` is set the backend's prior contents are discarded after
/// construction; the file's existence does not imply its contents survive
/// a fresh run.
pub async fn get_memory(
    kind: MemoryKind,
    path: &Path,
    reset: bool,
) -> Result<Box<dyn MemoryBackend>> {
    let backend: Box<dyn MemoryBackend> = match kind {
        MemoryKind::Local => Box::new(LocalMemory::open(path)?),
        MemoryKind::Volatile => Box::new(VolatileMemory::new()),
    };
    if reset {
        backend.clear().await?;
    }
    Ok(backend)
}

/// Lowercased alphanumeric tokens of `text`
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Number of query tokens present in the entry
pub(crate) fn overlap_score(entry: &str, query_tokens: &[String]) -> usize {
    let entry_tokens = tokenize(entry);
    query_tokens
        .iter()
        .filter(|q| entry_tokens.iter().any(|e| e == *q))
        .count()
}

/// Rank `entries` against `query` and keep the best `k` with any overlap
pub(crate) fn rank_relevant(entries: &[String], query: &str, k: usize) -> Vec<String> {
    let query_tokens = tokenize(query);
    let mut scored: Vec<(usize, &String)> = entries
        .iter()
        .map(|e| (overlap_score(e, &query_tokens), e))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(k).map(|(_, e)| e.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_non_alphanumeric() {
        assert_eq!(
            tokenize("Check the API-budget, now!"),
            vec!["check", "the", "api", "budget", "now"]
        );
    }

    #[test]
    fn test_rank_relevant_orders_by_overlap() {
        let entries = vec![
            "notes about rust lifetimes".to_string(),
            "rust memory model notes".to_string(),
            "shopping list".to_string(),
        ];

        let ranked = rank_relevant(&entries, "rust memory notes", 5);

        assert_eq!(ranked[0], "rust memory model notes");
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_relevant_respects_k() {
        let entries = vec![
            "alpha one".to_string(),
            "alpha two".to_string(),
            "alpha three".to_string(),
        ];

        assert_eq!(rank_relevant(&entries, "alpha", 2).len(), 2);
    }

    #[tokio::test]
    async fn test_get_memory_volatile_ignores_path() {
        let backend = get_memory(MemoryKind::Volatile, Path::new("/nonexistent/mem.json"), true)
            .await
            .unwrap();

        assert_eq!(backend.stats().await.unwrap().entries, 0);
        assert_eq!(backend.name(), "volatile");
    }
}
