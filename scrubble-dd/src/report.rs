//! Detection report rendering
//!
//! Two output shapes: a text report for reading in a terminal and a JSON
//! document for machine consumption. The renderer never re-queries durations;
//! it works purely from the `DetectionResult` and the params the run used.

use chrono::Local;

use crate::types::{DetectionResult, FlaggedScrobble};
use scrubble_common::human_time::format_clock;
use scrubble_common::{DetectionParams, Result};
use std::fmt::Write;

/// Render a text report.
///
/// `limit` caps how many flagged lines are listed; a trailer states how many
/// were held back. `None` lists everything.
pub fn render_text(
    result: &DetectionResult,
    params: &DetectionParams,
    limit: Option<usize>,
) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail; discard the fmt::Result
    let _ = writeln!(out, "Duplicate detection report");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(out, "Scrobbles examined:  {}", result.scrobble_count);
    let _ = writeln!(
        out,
        "Listening sessions:  {} (gap threshold {})",
        result.session_count,
        format_clock(params.gap_seconds)
    );
    let _ = writeln!(out, "Flagged duplicates:  {}", result.flagged.len());

    if result.flagged.is_empty() {
        return out;
    }
    let _ = writeln!(out);

    let shown = match limit {
        Some(limit) => limit.min(result.flagged.len()),
        None => result.flagged.len(),
    };
    for flagged in &result.flagged[..shown] {
        let _ = writeln!(out, "{}", flag_line(flagged));
    }
    if shown < result.flagged.len() {
        let _ = writeln!(
            out,
            "... and {} more ({} total)",
            result.flagged.len() - shown,
            result.flagged.len()
        );
    }

    out
}

/// Render the result as pretty-printed JSON.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn render_json(result: &DetectionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn flag_line(flagged: &FlaggedScrobble) -> String {
    let scrobble = &flagged.scrobble;
    // Timestamps render in the local timezone; out-of-range values fall
    // back to the raw epoch seconds.
    let when = match scrobble.played_at() {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => format!("@{}", scrobble.timestamp),
    };
    format!(
        "{}  {} - {}  [{}]",
        when, scrobble.artist, scrobble.track, flagged.reason
    )
}
