//! Local memory store: records in insertion order, optionally mirrored to a
//! JSON lines file, ranked by word overlap.

use crate::traits::Memory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    pub content: String,
    pub timestamp: String,
}

pub struct LocalMemory {
    entries: RwLock<Vec<MemoryEntry>>,
    path: Option<PathBuf>,
}

impl Default for LocalMemory {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LocalMemory {
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Opens the store backed by `path`, loading any records already there.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries = Vec::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                for (line_no, line) in content.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<MemoryEntry>(line) {
                        Ok(entry) => entries.push(entry),
                        Err(e) => tracing::warn!(
                            "Skipping unreadable memory record {}:{}: {}",
                            path.display(),
                            line_no + 1,
                            e
                        ),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read memory from {}", path.display()));
            }
        }

        tracing::debug!(records = entries.len(), "loaded memory from {}", path.display());

        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    async fn persist(&self, entry: &MemoryEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open memory file {}", path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Cosine similarity of two word sets.
fn similarity(query: &HashSet<String>, doc: &HashSet<String>) -> f64 {
    if query.is_empty() || doc.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(doc).count() as f64;
    shared / ((query.len() * doc.len()) as f64).sqrt()
}

#[async_trait]
impl Memory for LocalMemory {
    fn name(&self) -> &str {
        "local"
    }

    async fn add(&self, text: &str) -> Result<()> {
        let entry = MemoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            content: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let mut entries = self.entries.write().await;
        self.persist(&entry).await?;
        entries.push(entry);

        Ok(())
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let query_tokens = tokenize(query);
        let entries = self.entries.read().await;

        let mut scored: Vec<(f64, &MemoryEntry)> = entries
            .iter()
            .map(|e| (similarity(&query_tokens, &tokenize(&e.content)), e))
            .collect();

        // Stable, so equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, e)| e.content.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ranks_by_word_overlap() {
        let mem = LocalMemory::in_memory();
        mem.add("Keeps goats and chickens").await.unwrap();
        mem.add("Grows maize on two acres near Gulu").await.unwrap();
        mem.add("Maize leaves showed rust last season").await.unwrap();

        let hits = mem.similarity_search("maize rust", 2).await.unwrap();
        assert_eq!(
            hits,
            vec![
                "Maize leaves showed rust last season".to_string(),
                "Grows maize on two acres near Gulu".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn returns_up_to_k_even_without_overlap() {
        let mem = LocalMemory::in_memory();
        mem.add("Keeps goats").await.unwrap();

        assert_eq!(mem.similarity_search("cassava", 3).await.unwrap(), vec!["Keeps goats"]);
        assert!(mem.similarity_search("cassava", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("memory.jsonl");

        {
            let mem = LocalMemory::open(&path).unwrap();
            mem.add("Grows beans").await.unwrap();
            mem.add("Grows beans").await.unwrap();
        }

        let reopened = LocalMemory::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 2);
        assert_eq!(
            reopened.similarity_search("beans", 3).await.unwrap(),
            vec!["Grows beans", "Grows beans"]
        );
    }

    #[tokio::test]
    async fn skips_corrupt_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.jsonl");
        std::fs::write(
            &path,
            "not json\n{\"id\":\"1\",\"content\":\"Grows sorghum\",\"timestamp\":\"t\"}\n",
        )
        .unwrap();

        let mem = LocalMemory::open(&path).unwrap();
        assert_eq!(mem.count().await.unwrap(), 1);
    }
}
