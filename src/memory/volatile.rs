//! Process-local memory store with no persistence

use super::{rank_relevant, MemoryBackend, MemoryStats};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process memory backend; contents vanish when the run ends
#[derive(Default)]
pub struct VolatileMemory {
    entries: RwLock<Vec<String>>,
}

impl VolatileMemory {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryBackend for VolatileMemory {
    async fn add(&self, text: &str) -> Result<()> {
        self.entries.write().await.push(text.to_string());
        Ok(())
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
        self.entries.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "volatile"
    }
}
