//! Duration-overlap detection
//!
//! Catches two scrobbles of the identical track positioned closer together
//! than the track could physically have been played twice. Session membership
//! is irrelevant here; the pass runs over the full chronological stream and
//! crosses session boundaries freely.

use crate::detectors::fraction_of_duration_secs;
use crate::types::DurationProvider;
use scrubble_common::scrobble::{sort_chronological, Scrobble};
use scrubble_common::DetectionParams;
use tracing::debug;

/// Flag repeat plays whose gap to the preceding identical-track scrobble is
/// shorter than `overlap_fraction` of the track duration (strict `<`).
///
/// Only the second scrobble of an offending pair is flagged; the first is
/// assumed to be the legitimate play. Pairs with unknown or zero duration are
/// skipped, since there is no physical bound to violate.
pub async fn detect_duration_overlaps(
    scrobbles: &[Scrobble],
    provider: &dyn DurationProvider,
    params: &DetectionParams,
) -> Vec<Scrobble> {
    let ordered = sort_chronological(scrobbles);
    let mut flagged = Vec::new();

    for pair in ordered.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if !prev.same_track(curr) {
            continue;
        }

        let duration_ms = match provider.lookup(&curr.artist, &curr.track).await {
            Some(ms) if ms > 0 => ms,
            // Unknown or zero length: no physical bound to test against
            _ => continue,
        };

        let gap = curr.timestamp - prev.timestamp;
        let overlap_window = fraction_of_duration_secs(duration_ms, params.overlap_fraction);
        if (gap as f64) < overlap_window {
            debug!(
                timestamp = curr.timestamp,
                artist = %curr.artist,
                track = %curr.track,
                gap,
                overlap_window,
                "Duration overlap: repeat play physically too soon, flagging"
            );
            flagged.push(curr.clone());
        }
    }

    flagged
}
