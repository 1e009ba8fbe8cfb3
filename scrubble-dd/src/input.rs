//! Scrobble export loading
//!
//! Reads a listening-history export: a JSON array of scrobble records,
//! newest-first as the upstream service writes them. Field names vary across
//! export tools, so the loader accepts the common spellings for each field.
//! Order is preserved exactly as found in the file; chronological
//! normalization is the engine's job.

use scrubble_common::{Error, Result, Scrobble};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One export record, tolerant of the field spellings in the wild.
#[derive(Debug, Deserialize)]
struct RawScrobble {
    #[serde(alias = "artistName", alias = "artist_name")]
    artist: String,
    #[serde(alias = "trackName", alias = "track_name")]
    track: String,
    #[serde(alias = "timestampSeconds", alias = "uts")]
    timestamp: i64,
}

/// Load a scrobble export file.
///
/// Records keep their file order. Every record must carry non-empty artist
/// and track names; a violation names the offending record index.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read, `Error::Json` if it does
/// not parse, or `Error::InvalidInput` for empty name fields.
pub fn load_scrobbles(path: &Path) -> Result<Vec<Scrobble>> {
    let contents = std::fs::read_to_string(path)?;
    let raw: Vec<RawScrobble> = serde_json::from_str(&contents)?;

    let mut scrobbles = Vec::with_capacity(raw.len());
    for (index, record) in raw.into_iter().enumerate() {
        if record.artist.is_empty() {
            return Err(Error::InvalidInput(format!(
                "record {}: empty artist name",
                index
            )));
        }
        if record.track.is_empty() {
            return Err(Error::InvalidInput(format!(
                "record {}: empty track name",
                index
            )));
        }
        scrobbles.push(Scrobble::new(record.artist, record.track, record.timestamp));
    }

    debug!(
        scrobbles = scrobbles.len(),
        path = %path.display(),
        "Loaded scrobble export"
    );
    Ok(scrobbles)
}
