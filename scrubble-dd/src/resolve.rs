//! Merge and priority resolution of detector output
//!
//! The three detectors run independently and can claim the same scrobble.
//! This step unions their output by event identity (timestamp) into one list
//! with exactly one entry per event, applying a fixed reason priority:
//!
//! 1. session-replay and duration-overlap agree → `both`
//! 2. session-replay alone → `session-replay`
//! 3. duration-overlap alone → `duration-overlap`
//! 4. incomplete-replay alone → `incomplete-replay`
//!
//! First writer wins per this priority, not per insertion order. Output keeps
//! each winning detector's discovery order: session-replay flags first, then
//! unclaimed overlap flags, then unclaimed incomplete-replay flags.

use crate::types::{DuplicateReason, FlaggedScrobble};
use scrubble_common::Scrobble;
use std::collections::HashSet;
use tracing::debug;

/// Merge detector flags into one reason-tagged list, one entry per event
/// identity.
pub fn resolve(
    replay_flags: Vec<Scrobble>,
    overlap_flags: Vec<Scrobble>,
    incomplete_flags: Vec<Scrobble>,
) -> Vec<FlaggedScrobble> {
    debug!(
        replay = replay_flags.len(),
        overlap = overlap_flags.len(),
        incomplete = incomplete_flags.len(),
        "Merging detector flags"
    );

    let overlap_ids: HashSet<i64> = overlap_flags.iter().map(|s| s.timestamp).collect();
    let mut claimed: HashSet<i64> = HashSet::new();
    let mut flagged = Vec::new();

    for event in replay_flags {
        if !claimed.insert(event.timestamp) {
            continue;
        }
        let reason = if overlap_ids.contains(&event.timestamp) {
            DuplicateReason::Both
        } else {
            DuplicateReason::SessionReplay
        };
        flagged.push(FlaggedScrobble::new(event, reason));
    }

    for event in overlap_flags {
        if !claimed.insert(event.timestamp) {
            continue;
        }
        flagged.push(FlaggedScrobble::new(event, DuplicateReason::DurationOverlap));
    }

    for event in incomplete_flags {
        if !claimed.insert(event.timestamp) {
            continue;
        }
        flagged.push(FlaggedScrobble::new(event, DuplicateReason::IncompleteReplay));
    }

    flagged
}
