//! In-memory duration cache with optional JSON persistence
//!
//! Wraps a slower backend provider (typically MusicBrainz) and remembers
//! every known answer under a lowercase track key, so a detection run asks
//! the backend at most once per distinct track. Unknown answers are not
//! cached: a later run may learn the duration once the backend can resolve
//! it.
//!
//! Persistence is explicit. The binary loads the cache file before a run and
//! saves it after; the engine never knows the file exists.

use crate::types::DurationProvider;
use scrubble_common::{Result, TrackKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    artist: String,
    track: String,
    duration_ms: u64,
}

/// Caching wrapper around another duration provider.
pub struct CachingProvider {
    inner: Arc<dyn DurationProvider>,
    cache: RwLock<HashMap<TrackKey, u64>>,
}

impl CachingProvider {
    pub fn new(inner: Arc<dyn DurationProvider>) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Merge entries from a JSON cache file into the in-memory cache.
    ///
    /// Returns the number of entries loaded. Keys are re-normalized on load,
    /// so files written by older runs stay valid if normalization rules
    /// change.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or `Error::Json` if it
    /// does not parse.
    pub async fn load_from_file(&self, path: &Path) -> Result<usize> {
        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<CacheEntry> = serde_json::from_str(&contents)?;
        let count = entries.len();

        let mut cache = self.cache.write().await;
        for entry in entries {
            cache.insert(
                TrackKey::new(&entry.artist, &entry.track),
                entry.duration_ms,
            );
        }
        debug!(entries = count, path = %path.display(), "Loaded duration cache");
        Ok(count)
    }

    /// Write the in-memory cache to a JSON file, sorted by track key so the
    /// file diffs cleanly between runs.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails or `Error::Io` if the
    /// file cannot be written.
    pub async fn save_to_file(&self, path: &Path) -> Result<usize> {
        let cache = self.cache.read().await;
        let mut entries: Vec<CacheEntry> = cache
            .iter()
            .map(|(key, &duration_ms)| CacheEntry {
                artist: key.artist.clone(),
                track: key.track.clone(),
                duration_ms,
            })
            .collect();
        drop(cache);
        entries.sort_by(|a, b| (&a.artist, &a.track).cmp(&(&b.artist, &b.track)));

        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, json)?;
        debug!(entries = entries.len(), path = %path.display(), "Saved duration cache");
        Ok(entries.len())
    }
}

#[async_trait::async_trait]
impl DurationProvider for CachingProvider {
    fn name(&self) -> &'static str {
        "DurationCache"
    }

    async fn lookup(&self, artist: &str, track: &str) -> Option<u64> {
        let key = TrackKey::new(artist, track);
        if let Some(duration_ms) = self.cache.read().await.get(&key).copied() {
            return Some(duration_ms);
        }

        let answer = self.inner.lookup(artist, track).await;
        if let Some(duration_ms) = answer {
            self.cache.write().await.insert(key, duration_ms);
            debug!(
                artist = %artist,
                track = %track,
                duration_ms,
                "Cached duration from backend"
            );
        }
        answer
    }
}
