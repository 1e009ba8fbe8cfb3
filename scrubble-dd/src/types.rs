//! Core Types and Trait Definitions for Scrubble-DD
//!
//! Defines the duration lookup capability trait plus the result types shared
//! by the detectors and the merge step:
//! - **DurationProvider:** async capability interface for track length lookup
//! - **DuplicateReason / FlaggedScrobble:** reason-tagged detector output
//! - **DetectionResult:** one run's flagged list plus session statistics
//!
//! # Architecture
//! Detectors consume a `&dyn DurationProvider` and never learn whether the
//! answer came from a table, a cache, or the network. Providers resolve their
//! own failures to `None` so detection logic only ever sees known/unknown.

use scrubble_common::Scrobble;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Duration Lookup Capability
// ============================================================================

/// Track duration lookup interface.
///
/// Implementations answer with the canonical playback length in milliseconds
/// or `None` when the track is unknown. Lookups are idempotent and carry no
/// ordering requirement between calls. Implementations must not surface
/// errors: a failed backend query is coerced to `None` at the provider
/// boundary, because detection treats unknown and unavailable identically.
///
/// # Example
/// ```rust,ignore
/// use scrubble_dd::types::DurationProvider;
///
/// pub struct FixedProvider;
///
/// #[async_trait::async_trait]
/// impl DurationProvider for FixedProvider {
///     fn name(&self) -> &'static str { "Fixed" }
///
///     async fn lookup(&self, _artist: &str, _track: &str) -> Option<u64> {
///         Some(200_000)
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait DurationProvider: Send + Sync {
    /// Provider name for log provenance
    fn name(&self) -> &'static str;

    /// Look up a track's duration in milliseconds.
    ///
    /// # Arguments
    /// * `artist` - Artist name as recorded in the scrobble
    /// * `track` - Track title as recorded in the scrobble
    ///
    /// # Returns
    /// Duration in milliseconds, or `None` when unknown or unavailable
    async fn lookup(&self, artist: &str, track: &str) -> Option<u64>;
}

// ============================================================================
// Detection Output Types
// ============================================================================

/// Why a scrobble was flagged as a duplicate artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateReason {
    /// First event of a session repeats the previous session's last track
    SessionReplay,
    /// Repeat play closer to its predecessor than the track's length allows
    DurationOverlap,
    /// Abandoned play inside a run of consecutive identical-track events
    IncompleteReplay,
    /// Flagged by both the session-replay and duration-overlap detectors
    Both,
}

impl DuplicateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateReason::SessionReplay => "session-replay",
            DuplicateReason::DurationOverlap => "duration-overlap",
            DuplicateReason::IncompleteReplay => "incomplete-replay",
            DuplicateReason::Both => "both",
        }
    }
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged scrobble with its final merged reason.
///
/// The merge step guarantees at most one `FlaggedScrobble` per event identity
/// (timestamp) in a `DetectionResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedScrobble {
    pub scrobble: Scrobble,
    pub reason: DuplicateReason,
}

impl FlaggedScrobble {
    pub fn new(scrobble: Scrobble, reason: DuplicateReason) -> Self {
        Self { scrobble, reason }
    }
}

/// Result of one detection run.
///
/// A pure function of the input scrobbles, the configured thresholds, and the
/// duration answers observed during the run. Nothing is persisted between
/// runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Flagged scrobbles in merged detector order, one per event identity
    pub flagged: Vec<FlaggedScrobble>,
    /// Number of listening sessions the stream partitioned into
    pub session_count: usize,
    /// Number of scrobbles examined
    pub scrobble_count: usize,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_serializes_kebab_case() {
        let json = serde_json::to_string(&DuplicateReason::SessionReplay).unwrap();
        assert_eq!(json, "\"session-replay\"");
        let json = serde_json::to_string(&DuplicateReason::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }

    #[test]
    fn test_reason_display_matches_serialization() {
        assert_eq!(DuplicateReason::DurationOverlap.to_string(), "duration-overlap");
        assert_eq!(DuplicateReason::IncompleteReplay.to_string(), "incomplete-replay");
    }

    #[test]
    fn test_detection_result_json_shape() {
        let result = DetectionResult {
            flagged: vec![FlaggedScrobble::new(
                Scrobble::new("A", "T", 100),
                DuplicateReason::DurationOverlap,
            )],
            session_count: 1,
            scrobble_count: 2,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["session_count"], 1);
        assert_eq!(value["scrobble_count"], 2);
        assert_eq!(value["flagged"][0]["reason"], "duration-overlap");
        assert_eq!(value["flagged"][0]["scrobble"]["timestamp"], 100);
    }
}
