//! Session-replay detection
//!
//! Catches the client behavior where a previously-interrupted track is
//! resumed as the first event of a new session, duplicating the tail of the
//! prior session. Only adjacent session pairs are compared; replay chains
//! spanning three or more sessions are evaluated pairwise.
//!
//! # Evidence model
//! The scrobbling client records a play at track start, so the gap from a
//! suspect first event to the session's second event measures how long the
//! suspect actually played. A gap of at least `replay_fraction` of the track
//! duration reads as a genuine re-listen; anything shorter reads as a skip
//! past a replay artifact. When that evidence is unavailable (single-event
//! session, unknown duration) the conservative default is to flag.

use crate::detectors::fraction_of_duration_secs;
use crate::sessions::Session;
use crate::types::DurationProvider;
use scrubble_common::{DetectionParams, Scrobble};
use tracing::debug;

/// Flag first-of-session scrobbles that replay the previous session's last
/// track.
///
/// Returns flagged scrobbles in session order. Duration lookups happen only
/// for matched boundaries with an observable follow-up gap.
pub async fn detect_session_replays(
    sessions: &[Session],
    provider: &dyn DurationProvider,
    params: &DetectionParams,
) -> Vec<Scrobble> {
    let mut flagged = Vec::new();

    for pair in sessions.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        let prior_last = before.last();
        let suspect = after.first();

        if !prior_last.same_track(suspect) {
            continue;
        }

        if after.len() == 1 {
            // No second event to measure playback against; flag on the
            // conservative default.
            debug!(
                timestamp = suspect.timestamp,
                artist = %suspect.artist,
                track = %suspect.track,
                "Session replay: single-event session, flagging"
            );
            flagged.push(suspect.clone());
            continue;
        }

        let gap = after.scrobbles()[1].timestamp - suspect.timestamp;
        match provider.lookup(&suspect.artist, &suspect.track).await {
            Some(duration_ms) => {
                let replay_window = fraction_of_duration_secs(duration_ms, params.replay_fraction);
                if (gap as f64) < replay_window {
                    debug!(
                        timestamp = suspect.timestamp,
                        artist = %suspect.artist,
                        track = %suspect.track,
                        gap,
                        replay_window,
                        "Session replay: playback too short, flagging"
                    );
                    flagged.push(suspect.clone());
                } else {
                    debug!(
                        timestamp = suspect.timestamp,
                        gap,
                        replay_window,
                        "Session replay suppressed: playback long enough"
                    );
                }
            }
            None => {
                // Cannot confirm playback length; flag on the conservative
                // default.
                debug!(
                    timestamp = suspect.timestamp,
                    artist = %suspect.artist,
                    track = %suspect.track,
                    "Session replay: unknown duration, flagging"
                );
                flagged.push(suspect.clone());
            }
        }
    }

    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::table::TableProvider;
    use crate::sessions::partition;

    fn params() -> DetectionParams {
        DetectionParams::default()
    }

    #[tokio::test]
    async fn test_no_match_no_flag() {
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("Y", "Song2", 5000),
        ];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 2);

        let provider = TableProvider::new();
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert!(flagged.is_empty());
    }

    #[tokio::test]
    async fn test_single_event_session_flagged_regardless_of_duration() {
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("X", "Song1", 5000),
        ];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 2);

        let mut provider = TableProvider::new();
        provider.insert("X", "Song1", 300_000);
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].timestamp, 5000);
    }

    #[tokio::test]
    async fn test_replay_suppressed_by_sufficient_playback() {
        // Session A ends with Song1 at t=1000; Session B replays Song1 at
        // t=1900 then moves on at t=2200. The 300 s gap reaches half of the
        // 300 s track, so the replay was genuinely listened to.
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("X", "Song1", 1900),
            Scrobble::new("Y", "Song2", 2200),
        ];
        let sessions = partition(&events, 500);
        assert_eq!(sessions.len(), 2);

        let mut provider = TableProvider::new();
        provider.insert("X", "Song1", 300_000);
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert!(flagged.is_empty());
    }

    #[tokio::test]
    async fn test_replay_flagged_when_playback_too_short() {
        // Same boundary, but only 50 s of playback before Song2: under half
        // of the 300 s track, so the replay reads as a skip.
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("X", "Song1", 1900),
            Scrobble::new("Y", "Song2", 1950),
        ];
        let sessions = partition(&events, 500);
        assert_eq!(sessions.len(), 2);

        let mut provider = TableProvider::new();
        provider.insert("X", "Song1", 300_000);
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].timestamp, 1900);
    }

    #[tokio::test]
    async fn test_unknown_duration_flags_conservatively() {
        let suspect_ts = 5000;
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("X", "Song1", suspect_ts),
            Scrobble::new("Y", "Song2", suspect_ts + 400),
        ];
        let sessions = partition(&events, 1800);

        let provider = TableProvider::new();
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].timestamp, suspect_ts);
    }

    #[tokio::test]
    async fn test_comparison_is_case_sensitive() {
        let events = vec![
            Scrobble::new("X", "Song1", 1000),
            Scrobble::new("X", "song1", 5000),
            Scrobble::new("Y", "Song2", 5050),
        ];
        let sessions = partition(&events, 1800);

        let provider = TableProvider::new();
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        assert!(flagged.is_empty());
    }

    #[tokio::test]
    async fn test_chain_of_sessions_evaluated_pairwise() {
        // Three sessions, each starting by replaying the previous session's
        // closer. Both boundaries flag independently.
        let events = vec![
            Scrobble::new("X", "Song1", 0),
            Scrobble::new("X", "Song1", 10_000),
            Scrobble::new("X", "Song1", 20_000),
        ];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 3);

        let provider = TableProvider::new();
        let flagged = detect_session_replays(&sessions, &provider, &params()).await;
        let timestamps: Vec<i64> = flagged.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10_000, 20_000]);
    }
}
