use async_trait::async_trait;
use std::collections::HashMap;

pub mod http;

/// Outbound request surface for both extractors. One blocking attempt per
/// request; a failure propagates and aborts the ingestion run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String>;
    async fn fetch_json(&self, url: &str) -> anyhow::Result<serde_json::Value>;
    fn name(&self) -> &'static str;
}

/// Deterministic in-memory fetcher for tests and offline replays.
#[derive(Default)]
pub struct FixtureFetcher {
    texts: HashMap<String, String>,
    pages: HashMap<String, serde_json::Value>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.texts.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_page(mut self, url: &str, page: serde_json::Value) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no fixture text for {}", url))
    }

    async fn fetch_json(&self, url: &str) -> anyhow::Result<serde_json::Value> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no fixture page for {}", url))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
