//! Detection engine orchestration
//!
//! Runs one full detection pass: partition the stream into sessions, run the
//! three detectors, merge their flags, and report session statistics. The
//! engine owns nothing persistent; every run recomputes from the input
//! scrobbles and whatever the duration provider answers at that moment.
//!
//! # Determinism
//! Given identical scrobbles and identical provider answers, two runs produce
//! identical results. Nothing here reads the clock; all arithmetic is on
//! event timestamps.

use crate::detectors::{
    detect_duration_overlaps, detect_incomplete_replays, detect_session_replays,
};
use crate::resolve::resolve;
use crate::sessions::partition;
use crate::types::{DetectionResult, DurationProvider};
use scrubble_common::{DetectionParams, Scrobble};
use std::sync::Arc;
use tracing::{debug, info};

/// One-shot duplicate detection over a scrobble stream.
///
/// Holds the configured thresholds and the duration provider; call
/// [`DetectionEngine::run`] per detection window. Detectors execute
/// sequentially and share no mutable state, so the engine is cheap to reuse
/// across runs.
pub struct DetectionEngine {
    params: DetectionParams,
    provider: Arc<dyn DurationProvider>,
}

impl DetectionEngine {
    /// Create an engine with default thresholds.
    pub fn new(provider: Arc<dyn DurationProvider>) -> Self {
        Self {
            params: DetectionParams::default(),
            provider,
        }
    }

    /// Create an engine with custom thresholds.
    pub fn with_params(provider: Arc<dyn DurationProvider>, params: DetectionParams) -> Self {
        Self { params, provider }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Run duplicate detection over one scrobble window.
    ///
    /// Input order is arbitrary (exports arrive newest-first); the caller's
    /// slice is never mutated. The returned flag list carries one entry per
    /// event identity, ordered by winning detector discovery order.
    pub async fn run(&self, scrobbles: &[Scrobble]) -> DetectionResult {
        info!(
            scrobbles = scrobbles.len(),
            gap_seconds = self.params.gap_seconds,
            provider = self.provider.name(),
            "Starting duplicate detection run"
        );

        let sessions = partition(scrobbles, self.params.gap_seconds);
        debug!(sessions = sessions.len(), "Partitioned stream into sessions");

        let replay_flags =
            detect_session_replays(&sessions, self.provider.as_ref(), &self.params).await;
        let overlap_flags =
            detect_duration_overlaps(scrobbles, self.provider.as_ref(), &self.params).await;
        let incomplete_flags =
            detect_incomplete_replays(scrobbles, self.provider.as_ref(), &self.params).await;

        debug!(
            replay = replay_flags.len(),
            overlap = overlap_flags.len(),
            incomplete = incomplete_flags.len(),
            "Detector passes complete"
        );

        let flagged = resolve(replay_flags, overlap_flags, incomplete_flags);

        info!(
            flagged = flagged.len(),
            sessions = sessions.len(),
            "Detection run complete"
        );

        DetectionResult {
            flagged,
            session_count: sessions.len(),
            scrobble_count: scrobbles.len(),
        }
    }
}
