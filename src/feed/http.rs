use crate::error::FeedError;
use crate::feed::traits::FeedSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Feed source backed by a single HTTP(S) URL
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    /// Create a feed client; `timeout` bounds each whole fetch
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("imovel-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch_xml(&self) -> Result<String, FeedError> {
        debug!("Fetching feed: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Feed returned status: {}", status);
            return Err(FeedError::Status(status.as_u16()));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| FeedError::Body(e.to_string()))?;

        debug!("Downloaded {} bytes of XML", xml.len());
        Ok(xml)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
