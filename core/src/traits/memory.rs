use async_trait::async_trait;

/// Long-term store of free-text farmer records with similarity lookup.
#[async_trait]
pub trait Memory: Send + Sync {
    fn name(&self) -> &str;

    async fn add(&self, text: &str) -> anyhow::Result<()>;

    /// Up to `k` records, most similar first.
    async fn similarity_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<String>>;

    async fn count(&self) -> anyhow::Result<usize>;
}
