use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub source_text: String,
    pub language_pair: String,
    /// Which capability produced the output: "translate" or "transliterate"
    pub kind: String,
    pub output: String,
    pub cached_at: u64,
}

/// In-memory plus persistent JSON cache for external capability results.
///
/// Cache failures never fail a conversion: reads that go wrong behave as
/// misses and write errors are logged and dropped.
pub struct TranslationCache {
    dir: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Failed to create translation cache directory: {}", e);
        }

        Self {
            dir,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key over the source text, language pair, and operation kind.
    pub fn key(source_text: &str, language_pair: &str, kind: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        source_text.hash(&mut hasher);
        language_pair.hash(&mut hasher);
        kind.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if let Ok(entries) = self.entries.lock() {
            if let Some(output) = entries.get(key) {
                return Some(output.clone());
            }
        }

        let cache_file = self.dir.join(format!("{}.json", key));
        if !cache_file.exists() {
            return None;
        }

        match tokio::fs::read_to_string(&cache_file).await {
            Ok(content) => match serde_json::from_str::<CacheEntry>(&content) {
                Ok(entry) => {
                    debug!("Translation cache hit: {}", key);
                    if let Ok(mut entries) = self.entries.lock() {
                        entries.insert(key.to_string(), entry.output.clone());
                    }
                    Some(entry.output)
                }
                Err(e) => {
                    warn!("Failed to parse translation cache entry: {}", e);
                    None
                }
            },
            Err(_) => None,
        }
    }

    pub async fn put(
        &self,
        key: &str,
        source_text: &str,
        language_pair: &str,
        kind: &str,
        output: &str,
    ) -> Result<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), output.to_string());
        }

        let entry = CacheEntry {
            source_text: source_text.to_string(),
            language_pair: language_pair.to_string(),
            kind: kind.to_string(),
            output: output.to_string(),
            cached_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };

        let cache_file = self.dir.join(format!("{}.json", key));
        let content = serde_json::to_string_pretty(&entry)?;

        if let Err(e) = tokio::fs::write(&cache_file, content).await {
            warn!("Failed to write translation cache: {}", e);
        } else {
            debug!("Saved translation to cache: {}", key);
        }

        Ok(())
    }

    /// List persistent cache entries, newest first.
    pub async fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        if let Ok(mut dir_entries) = tokio::fs::read_dir(&self.dir).await {
            while let Ok(Some(entry)) = dir_entries.next_entry().await {
                if entry.path().extension().is_some_and(|ext| ext == "json") {
                    if let Ok(content) = tokio::fs::read_to_string(entry.path()).await {
                        if let Ok(cache_entry) = serde_json::from_str::<CacheEntry>(&content) {
                            entries.push(cache_entry);
                        }
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));

        Ok(entries)
    }

    /// Delete all persistent cache entries, returning how many were removed.
    pub async fn clear(&self) -> Result<u64> {
        let mut count = 0;

        if let Ok(mut dir_entries) = tokio::fs::read_dir(&self.dir).await {
            while let Ok(Some(entry)) = dir_entries.next_entry().await {
                if entry.path().extension().is_some_and(|ext| ext == "json")
                    && tokio::fs::remove_file(entry.path()).await.is_ok()
                {
                    count += 1;
                }
            }
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }

        info!("Cleared {} translation cache entries", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::new(dir.path());

        let key = TranslationCache::key("雪", "ja|en", "transliterate");
        cache.put(&key, "雪", "ja|en", "transliterate", "Yuki").await.unwrap();

        assert_eq!(cache.get(&key).await.as_deref(), Some("Yuki"));
    }

    #[tokio::test]
    async fn entries_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let key = TranslationCache::key("夜", "ja|en", "transliterate");

        {
            let cache = TranslationCache::new(dir.path());
            cache.put(&key, "夜", "ja|en", "transliterate", "Yoru").await.unwrap();
        }

        let cache = TranslationCache::new(dir.path());
        assert_eq!(cache.get(&key).await.as_deref(), Some("Yoru"));
    }

    #[tokio::test]
    async fn keys_distinguish_operation_kind() {
        let translate = TranslationCache::key("ミク", "ja|en", "translate");
        let transliterate = TranslationCache::key("ミク", "ja|en", "transliterate");
        assert_ne!(translate, transliterate);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::new(dir.path());

        for (i, text) in ["あ", "い", "う"].iter().enumerate() {
            let key = TranslationCache::key(text, "ja|en", "transliterate");
            cache.put(&key, text, "ja|en", "transliterate", &format!("out{}", i)).await.unwrap();
        }

        assert_eq!(cache.list().await.unwrap().len(), 3);
        assert_eq!(cache.clear().await.unwrap(), 3);
        assert!(cache.list().await.unwrap().is_empty());

        let key = TranslationCache::key("あ", "ja|en", "transliterate");
        assert!(cache.get(&key).await.is_none());
    }
}
