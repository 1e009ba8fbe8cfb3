//! Test Helper Utilities
//!
//! Shared builders for detection tests: scrobble streams and deterministic
//! duration providers.

use scrubble_common::Scrobble;
use scrubble_dd::providers::TableProvider;

/// Build one scrobble.
pub fn scrobble(artist: &str, track: &str, timestamp: i64) -> Scrobble {
    Scrobble::new(artist, track, timestamp)
}

/// Arrange events newest-first, the order exports arrive in.
#[allow(dead_code)]
pub fn newest_first(mut events: Vec<Scrobble>) -> Vec<Scrobble> {
    events.sort_by_key(|s| std::cmp::Reverse(s.timestamp));
    events
}

/// Build a duration table from (artist, track, duration_ms) triples.
pub fn durations(entries: &[(&str, &str, u64)]) -> TableProvider {
    let mut provider = TableProvider::new();
    for (artist, track, duration_ms) in entries {
        provider.insert(artist, track, *duration_ms);
    }
    provider
}
