//! Incomplete-replay run detection
//!
//! Catches runs of two or more consecutive plays of the identical track where
//! some plays were abandoned before completion. Distinct from plain
//! back-to-back overlap: a run mixes completed and abandoned plays, and the
//! completed ones must survive.
//!
//! # Completion proxy
//! An event counts as completed when the gap to the immediately following
//! stream event (any track) is at least `overlap_fraction` of the track
//! duration, i.e. the track had time to finish before the next play started.
//! The globally-last event of the stream has no following event to measure
//! against and is always treated as completed; absence of evidence is not
//! evidence of incompleteness.

use crate::detectors::fraction_of_duration_secs;
use crate::types::DurationProvider;
use scrubble_common::scrobble::{sort_chronological, Scrobble};
use scrubble_common::DetectionParams;
use tracing::debug;

/// Flag abandoned plays inside runs of consecutive identical-track scrobbles.
///
/// Runs of length 1 are ignored, as are runs whose track duration is unknown
/// or zero (no completion evidence to evaluate). For an evaluable run:
/// - some events completed: flag every non-completed event;
/// - none completed: keep only the run's first event and flag the rest, the
///   first being the listener's actual attempt.
///
/// One duration lookup per run. Flags come back in chronological scan order.
pub async fn detect_incomplete_replays(
    scrobbles: &[Scrobble],
    provider: &dyn DurationProvider,
    params: &DetectionParams,
) -> Vec<Scrobble> {
    let ordered = sort_chronological(scrobbles);
    let mut flagged = Vec::new();

    let mut start = 0;
    while start < ordered.len() {
        let mut end = start + 1;
        while end < ordered.len() && ordered[end].same_track(&ordered[start]) {
            end += 1;
        }

        if end - start >= 2 {
            evaluate_run(&ordered, start, end, provider, params, &mut flagged).await;
        }
        start = end;
    }

    flagged
}

/// Evaluate one maximal run `ordered[start..end]` and append its flags.
async fn evaluate_run(
    ordered: &[Scrobble],
    start: usize,
    end: usize,
    provider: &dyn DurationProvider,
    params: &DetectionParams,
    flagged: &mut Vec<Scrobble>,
) {
    let lead = &ordered[start];
    let duration_ms = match provider.lookup(&lead.artist, &lead.track).await {
        Some(ms) if ms > 0 => ms,
        _ => {
            debug!(
                artist = %lead.artist,
                track = %lead.track,
                run_len = end - start,
                "Run skipped: duration unknown"
            );
            return;
        }
    };
    let completion_window = fraction_of_duration_secs(duration_ms, params.overlap_fraction);

    // Completion per run event, measured against the next stream event of
    // any track. The last event of the whole stream defaults to completed.
    let completed: Vec<bool> = (start..end)
        .map(|i| match ordered.get(i + 1) {
            Some(next) => ((next.timestamp - ordered[i].timestamp) as f64) >= completion_window,
            None => true,
        })
        .collect();

    let any_completed = completed.iter().any(|&c| c);
    debug!(
        artist = %lead.artist,
        track = %lead.track,
        run_len = end - start,
        completed = completed.iter().filter(|&&c| c).count(),
        "Evaluating identical-track run"
    );

    if any_completed {
        // Keep the completed plays, flag the abandoned ones
        for (offset, was_completed) in completed.iter().enumerate() {
            if !was_completed {
                flagged.push(ordered[start + offset].clone());
            }
        }
    } else {
        // Nothing completed: keep the first attempt, flag the rest
        for event in &ordered[start + 1..end] {
            flagged.push(event.clone());
        }
    }
}
