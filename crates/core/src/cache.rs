use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::fs;
use tracing::{debug, warn};

use crate::{
    extractor::Extraction,
    guidance::{ContentFormat, Tone},
};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("brollbot")
}

/// On-disk cache of beat extraction results. Entries older than `ttl` are
/// treated as missing.
#[derive(Debug, Clone)]
pub struct BeatCache {
    dir: PathBuf,
    ttl: Duration,
    skip_reads: bool,
}

impl BeatCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            skip_reads: false,
        }
    }

    pub fn in_default_dir(ttl: Duration) -> Self {
        Self::new(get_root_cache_dir(), ttl)
    }

    /// Ignore existing entries but keep writing fresh ones.
    pub fn refreshing(mut self) -> Self {
        self.skip_reads = true;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache key for one extraction: same script, tone, format and service
    /// give the same key.
    pub fn key(script: &str, tone: Tone, format: ContentFormat, service: &str) -> String {
        let mut hasher = DefaultHasher::new();
        script.hash(&mut hasher);
        tone.hash(&mut hasher);
        format.hash(&mut hasher);
        service.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Get the path for a cached extraction
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("beats_{}.json", key))
    }

    pub async fn load(&self, key: &str) -> Option<Extraction> {
        if self.skip_reads {
            return None;
        }
        let path = self.path_for(key);
        let metadata = fs::metadata(&path).await.ok()?;
        let fresh = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age < self.ttl)
            .unwrap_or(false);
        if !fresh {
            debug!(path = %path.display(), "cache entry missing or expired");
            return None;
        }

        let json_content = fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&json_content) {
            Ok(extraction) => Some(extraction),
            Err(e) => {
                warn!(path = %path.display(), "ignoring corrupt cache entry: {}", e);
                None
            }
        }
    }

    pub async fn store(&self, key: &str, extraction: &Extraction) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let pretty_json = serde_json::to_string_pretty(extraction)?;
        fs::write(self.path_for(key), &pretty_json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionalBeat;

    fn extraction() -> Extraction {
        Extraction {
            beats: vec![EmotionalBeat {
                excerpt: "Tired of cold calling?".to_string(),
                offset: 0,
                timestamp: "00:00".to_string(),
                tone: Tone::Urgent,
                visual_hint: Some("Person frustrated with phone".to_string()),
            }],
            returned: 2,
            dropped: 1,
        }
    }

    #[test]
    fn key_depends_on_every_input() {
        let base = BeatCache::key("script", Tone::Calm, ContentFormat::Ugc, "openai/gpt-4o");
        assert_eq!(
            base,
            BeatCache::key("script", Tone::Calm, ContentFormat::Ugc, "openai/gpt-4o")
        );
        assert_ne!(
            base,
            BeatCache::key("script!", Tone::Calm, ContentFormat::Ugc, "openai/gpt-4o")
        );
        assert_ne!(
            base,
            BeatCache::key("script", Tone::Funny, ContentFormat::Ugc, "openai/gpt-4o")
        );
        assert_ne!(
            base,
            BeatCache::key("script", Tone::Calm, ContentFormat::Testimonial, "openai/gpt-4o")
        );
        assert_ne!(
            base,
            BeatCache::key("script", Tone::Calm, ContentFormat::Ugc, "grok/grok-4-fast")
        );
    }

    #[tokio::test]
    async fn round_trips_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BeatCache::new(dir.path().join("nested"), Duration::from_secs(3600));

        assert!(cache.load("abc").await.is_none());
        cache.store("abc", &extraction()).await.unwrap();
        assert_eq!(cache.load("abc").await, Some(extraction()));
    }

    #[tokio::test]
    async fn expired_and_corrupt_entries_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let expired = BeatCache::new(dir.path(), Duration::ZERO);
        expired.store("abc", &extraction()).await.unwrap();
        assert!(expired.load("abc").await.is_none());

        let cache = BeatCache::new(dir.path(), Duration::from_secs(3600));
        fs::write(cache.path_for("bad"), "not json").await.unwrap();
        assert!(cache.load("bad").await.is_none());
    }

    #[tokio::test]
    async fn refreshing_cache_writes_but_never_reads() {
        let dir = tempfile::tempdir().unwrap();
        let refreshing = BeatCache::new(dir.path(), Duration::from_secs(3600)).refreshing();
        refreshing.store("abc", &extraction()).await.unwrap();
        assert!(refreshing.load("abc").await.is_none());

        let cache = BeatCache::new(dir.path(), Duration::from_secs(3600));
        assert_eq!(cache.load("abc").await, Some(extraction()));
    }
}
