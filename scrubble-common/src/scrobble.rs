//! Scrobble record and track identity types
//!
//! A scrobble is one listening event recorded by the upstream client: the
//! artist and track names plus the Unix timestamp at which playback started.
//! The timestamp is unique within a user's history and serves as the event's
//! identity key throughout detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One listening event from the user's scrobble history.
///
/// Immutable once constructed. Exports deliver scrobbles newest-first; code
/// that needs gap arithmetic sorts a copy with [`sort_chronological`] rather
/// than mutating the caller's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scrobble {
    /// Artist name exactly as recorded by the scrobbling client
    pub artist: String,
    /// Track title exactly as recorded by the scrobbling client
    pub track: String,
    /// Unix timestamp (seconds) of playback start; identity key
    pub timestamp: i64,
}

impl Scrobble {
    pub fn new(artist: impl Into<String>, track: impl Into<String>, timestamp: i64) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
            timestamp,
        }
    }

    /// True when `other` names the identical track, compared exactly as
    /// received (case-sensitive). Lookup-side normalization is the duration
    /// provider's concern, not this record's.
    pub fn same_track(&self, other: &Scrobble) -> bool {
        self.artist == other.artist && self.track == other.track
    }

    /// Playback start as a UTC datetime.
    ///
    /// Returns `None` for timestamps outside chrono's representable range.
    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Case-normalized (artist, track) key for duration lookup and caching.
///
/// Detectors never use this type; they compare raw names. Providers build a
/// `TrackKey` at their boundary so cache identity is stable across
/// capitalization variants in the history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub artist: String,
    pub track: String,
}

impl TrackKey {
    pub fn new(artist: &str, track: &str) -> Self {
        Self {
            artist: artist.to_lowercase(),
            track: track.to_lowercase(),
        }
    }
}

/// Return a copy of `scrobbles` sorted oldest-first by timestamp.
///
/// The sort is stable, so equal timestamps (which a well-formed history does
/// not contain) keep their input order.
pub fn sort_chronological(scrobbles: &[Scrobble]) -> Vec<Scrobble> {
    let mut sorted = scrobbles.to_vec();
    sorted.sort_by_key(|s| s.timestamp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_track_exact_match() {
        let a = Scrobble::new("Boards of Canada", "Roygbiv", 1000);
        let b = Scrobble::new("Boards of Canada", "Roygbiv", 2000);
        assert!(a.same_track(&b));
    }

    #[test]
    fn test_same_track_is_case_sensitive() {
        let a = Scrobble::new("Boards of Canada", "Roygbiv", 1000);
        let b = Scrobble::new("boards of canada", "Roygbiv", 2000);
        assert!(!a.same_track(&b));
    }

    #[test]
    fn test_track_key_normalizes_case() {
        let k1 = TrackKey::new("Boards of Canada", "ROYGBIV");
        let k2 = TrackKey::new("boards of canada", "roygbiv");
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_played_at() {
        let s = Scrobble::new("A", "T", 1640995200);
        let dt = s.played_at().unwrap();
        assert_eq!(dt.timestamp(), 1640995200);
    }

    #[test]
    fn test_sort_chronological_reverses_export_order() {
        // Exports arrive newest-first
        let input = vec![
            Scrobble::new("A", "T3", 300),
            Scrobble::new("A", "T2", 200),
            Scrobble::new("A", "T1", 100),
        ];
        let sorted = sort_chronological(&input);
        let timestamps: Vec<i64> = sorted.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![100, 200, 300]);
        // Caller's vec untouched
        assert_eq!(input[0].timestamp, 300);
    }

    #[test]
    fn test_sort_chronological_empty() {
        assert!(sort_chronological(&[]).is_empty());
    }
}
