// Detector passes over the scrobble stream
//
// Three independent detectors, each a pure async pass returning the scrobbles
// it flags in discovery order. Reasons are assigned later by the merge step,
// which also deduplicates events claimed by more than one detector.

pub mod duration_overlap;
pub mod incomplete_replay;
pub mod session_replay;

pub use duration_overlap::detect_duration_overlaps;
pub use incomplete_replay::detect_incomplete_replays;
pub use session_replay::detect_session_replays;

/// Seconds of playback implied by `fraction` of a track's duration.
///
/// Detector thresholds are expressed as a fraction of the track length;
/// durations arrive in milliseconds, gaps in whole seconds.
pub(crate) fn fraction_of_duration_secs(duration_ms: u64, fraction: f64) -> f64 {
    fraction * (duration_ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_of_duration_secs() {
        assert_eq!(fraction_of_duration_secs(200_000, 0.9), 180.0);
        assert_eq!(fraction_of_duration_secs(300_000, 0.5), 150.0);
        assert_eq!(fraction_of_duration_secs(0, 0.9), 0.0);
    }
}
