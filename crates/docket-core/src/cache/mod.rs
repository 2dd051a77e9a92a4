use crate::providers::PageFetcher;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A memoized response: raw text for page fetches, structured JSON for API
/// pages. Variant order matters for untagged deserialization: plain strings
/// are Text, everything else falls through to Json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedPayload {
    Text(String),
    Json(serde_json::Value),
}

/// Whole-file request memo. Entries never expire; equality is exact key
/// match. The snapshot is rewritten in full on every flush.
pub struct FetchCache {
    path: PathBuf,
    entries: BTreeMap<String, CachedPayload>,
}

impl FetchCache {
    /// Loads the persisted snapshot. A missing or unparsable file starts an
    /// empty cache; corruption is never surfaced as an error.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache snapshot unparsable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CachedPayload> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: &str, payload: CachedPayload) {
        self.entries.insert(key.to_string(), payload);
    }

    /// Rewrites the whole snapshot, write-to-temp then rename, so a crash
    /// mid-write cannot leave a truncated file behind.
    pub fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)
            .with_context(|| format!("failed to write cache temp file {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace cache snapshot {}", self.path.display()))?;
        Ok(())
    }
}

/// Cache-through text fetch. On miss the page is stored and the snapshot
/// flushed before the body is handed to the caller, so a later crash cannot
/// lose a paid-for fetch.
pub async fn fetch_text_cached(
    cache: &mut FetchCache,
    fetcher: &dyn PageFetcher,
    url: &str,
) -> anyhow::Result<String> {
    if let Some(CachedPayload::Text(text)) = cache.get(url) {
        debug!(url, "cache hit");
        return Ok(text.clone());
    }
    debug!(url, fetcher = fetcher.name(), "cache miss, fetching");
    let text = fetcher.fetch_text(url).await?;
    cache.insert(url, CachedPayload::Text(text.clone()));
    cache.flush()?;
    Ok(text)
}

/// Cache-through JSON fetch, same persist-before-consume ordering.
pub async fn fetch_json_cached(
    cache: &mut FetchCache,
    fetcher: &dyn PageFetcher,
    url: &str,
) -> anyhow::Result<serde_json::Value> {
    if let Some(CachedPayload::Json(value)) = cache.get(url) {
        debug!(url, "cache hit");
        return Ok(value.clone());
    }
    debug!(url, fetcher = fetcher.name(), "cache miss, fetching");
    let value = fetcher.fetch_json(url).await?;
    cache.insert(url, CachedPayload::Json(value.clone()));
    cache.flush()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FetchCache::load(&dir.path().join("cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn garbage_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        let cache = FetchCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_round_trips_both_payload_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = FetchCache::load(&path);
        cache.insert("https://a", CachedPayload::Text("<html>roster</html>".into()));
        cache.insert(
            "https://b",
            CachedPayload::Json(json!({"results": [], "next": null})),
        );
        cache.flush().unwrap();

        let reloaded = FetchCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get("https://a"),
            Some(&CachedPayload::Text("<html>roster</html>".into()))
        );
        assert_eq!(
            reloaded.get("https://b"),
            Some(&CachedPayload::Json(json!({"results": [], "next": null})))
        );
    }

    #[test]
    fn flush_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = FetchCache::load(&path);
        cache.insert("k", CachedPayload::Text("v".into()));
        cache.flush().unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn hit_returns_stored_payload_without_fetching() {
        use crate::providers::FixtureFetcher;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = FetchCache::load(&path);
        cache.insert("https://a", CachedPayload::Text("stored".into()));

        // Empty fetcher: any real fetch would error.
        let fetcher = FixtureFetcher::new();
        let text = fetch_text_cached(&mut cache, &fetcher, "https://a")
            .await
            .unwrap();
        assert_eq!(text, "stored");
    }

    #[tokio::test]
    async fn miss_persists_before_returning() {
        use crate::providers::FixtureFetcher;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = FetchCache::load(&path);

        let fetcher = FixtureFetcher::new().with_text("https://a", "fresh");
        let text = fetch_text_cached(&mut cache, &fetcher, "https://a")
            .await
            .unwrap();
        assert_eq!(text, "fresh");

        // The snapshot on disk already holds the entry.
        let reloaded = FetchCache::load(&path);
        assert_eq!(
            reloaded.get("https://a"),
            Some(&CachedPayload::Text("fresh".into()))
        );
    }
}
