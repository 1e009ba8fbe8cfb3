//! Static duration table provider
//!
//! An immutable in-memory duration source loaded from a TOML table file (or
//! built programmatically in tests). Deterministic by construction, which
//! makes it the reference provider for offline runs and for every detector
//! test in this crate.
//!
//! # Table format
//! ```toml
//! [[track]]
//! artist = "Boards of Canada"
//! title = "Roygbiv"
//! duration_ms = 159000
//! ```

use crate::types::DurationProvider;
use scrubble_common::{Result, TrackKey};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct DurationTable {
    #[serde(default)]
    track: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    artist: String,
    title: String,
    duration_ms: u64,
}

/// Immutable in-memory duration lookup, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct TableProvider {
    durations: HashMap<TrackKey, u64>,
}

impl TableProvider {
    /// Create an empty table (every lookup answers unknown).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a TOML duration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or `Error::Toml` if it
    /// does not parse.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: DurationTable = toml::from_str(&contents)?;

        let mut provider = Self::new();
        for entry in table.track {
            provider.insert(&entry.artist, &entry.title, entry.duration_ms);
        }
        debug!(
            tracks = provider.len(),
            path = %path.display(),
            "Loaded duration table"
        );
        Ok(provider)
    }

    /// Add or replace one track's duration.
    pub fn insert(&mut self, artist: &str, track: &str, duration_ms: u64) {
        self.durations
            .insert(TrackKey::new(artist, track), duration_ms);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

#[async_trait::async_trait]
impl DurationProvider for TableProvider {
    fn name(&self) -> &'static str {
        "DurationTable"
    }

    async fn lookup(&self, artist: &str, track: &str) -> Option<u64> {
        self.durations.get(&TrackKey::new(artist, track)).copied()
    }
}
