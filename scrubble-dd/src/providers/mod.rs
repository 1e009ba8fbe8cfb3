// Duration provider implementations
//
// Detection consumes one `DurationProvider`; these are the sources a run can
// compose: a static TOML table, an in-memory cache with optional JSON
// persistence, the MusicBrainz recording search, and a fallback chain that
// strings them together. Composition happens in the binary, never inside the
// engine.

pub mod cache;
pub mod musicbrainz;
pub mod table;

pub use cache::CachingProvider;
pub use musicbrainz::MusicBrainzProvider;
pub use table::TableProvider;

use crate::types::DurationProvider;
use std::sync::Arc;

/// Ordered fallback across several providers.
///
/// `lookup` asks each provider in turn and returns the first known answer;
/// an empty chain answers unknown for everything.
pub struct ChainProvider {
    providers: Vec<Arc<dyn DurationProvider>>,
}

impl ChainProvider {
    pub fn new(providers: Vec<Arc<dyn DurationProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait::async_trait]
impl DurationProvider for ChainProvider {
    fn name(&self) -> &'static str {
        "ProviderChain"
    }

    async fn lookup(&self, artist: &str, track: &str) -> Option<u64> {
        for provider in &self.providers {
            if let Some(duration_ms) = provider.lookup(artist, track).await {
                return Some(duration_ms);
            }
        }
        None
    }
}
