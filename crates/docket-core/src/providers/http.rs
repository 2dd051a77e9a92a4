use super::PageFetcher;
use crate::config::AuthScheme;
use async_trait::async_trait;
use tracing::debug;

/// Live fetcher. Page fetches go out bare; API fetches carry the configured
/// Authorization header. No retries, no backoff.
pub struct HttpFetcher {
    auth_scheme: AuthScheme,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(auth_scheme: AuthScheme, api_key: Option<String>) -> Self {
        Self {
            auth_scheme,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn auth_header(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        match self.auth_scheme {
            AuthScheme::Token => Some(format!("Token {}", key)),
            AuthScheme::Bearer => Some(format!("Bearer {}", key)),
            AuthScheme::None => None,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        debug!(url, "fetching page");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("HTTP {} for {}", resp.status(), url);
        }
        Ok(resp.text().await?)
    }

    async fn fetch_json(&self, url: &str) -> anyhow::Result<serde_json::Value> {
        debug!(url, "fetching API page");
        let mut req = self.client.get(url);
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("case API error {}: {}", status, body);
        }
        Ok(resp.json().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
