use crate::error::FeedError;
use crate::feed::xml;
use async_trait::async_trait;
use serde_json::Value;

/// Common trait for listing feed sources
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Download the raw XML document
    async fn fetch_xml(&self) -> Result<String, FeedError>;

    /// Get the name of the feed source
    fn source_name(&self) -> &'static str;

    /// Download the feed and convert it to a JSON tree. Conversion runs on
    /// the blocking pool.
    async fn fetch_tree(&self) -> Result<Value, FeedError> {
        let xml = self.fetch_xml().await?;
        tokio::task::spawn_blocking(move || xml::to_json(&xml))
            .await
            .map_err(|e| FeedError::Xml(format!("conversion task failed: {}", e)))?
    }
}
