// MusicBrainz recording search provider
//
// Resolves (artist, track) to a canonical duration via the MusicBrainz
// recording search API. Rate limited to 1 request/second per MusicBrainz
// etiquette. Every failure mode (network, HTTP status, parse, no match)
// resolves to "unknown duration" at the trait boundary.

use crate::types::DurationProvider;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

const MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";
const USER_AGENT: &str = "scrubble-dd/0.1.0 (scrobble duplicate scrubber)";

#[derive(Debug, Deserialize)]
struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<Recording>,
}

#[derive(Debug, Deserialize)]
struct Recording {
    #[serde(default)]
    length: Option<u64>, // Duration in milliseconds
}

pub struct MusicBrainzProvider {
    client: reqwest::Client,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl Default for MusicBrainzProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicBrainzProvider {
    pub fn new() -> Self {
        // MusicBrainz rate limit: 1 request/second
        // Safe: 1 is always non-zero
        let quota = governor::Quota::per_second(std::num::NonZeroU32::new(1).unwrap());
        let rate_limiter = governor::RateLimiter::direct(quota);

        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client (system error)"),
            rate_limiter,
        }
    }

    /// Search recordings for the track and return the best match's length.
    ///
    /// # Arguments
    /// * `artist` - Artist name as scrobbled
    /// * `track` - Track title as scrobbled
    ///
    /// # Returns
    /// * Duration in milliseconds of the first result carrying a non-zero
    ///   length, or `None` when nothing matched
    async fn search_recording_length(&self, artist: &str, track: &str) -> Result<Option<u64>> {
        debug!(artist = %artist, track = %track, "Searching MusicBrainz recording");

        // Rate limit API calls
        self.rate_limiter.until_ready().await;

        let query = format!(
            "artist:\"{}\" AND recording:\"{}\"",
            escape_lucene(artist),
            escape_lucene(track)
        );
        let url = format!("{}/recording", MUSICBRAINZ_API_URL);

        let response = self
            .client
            .get(&url)
            .query(&[("query", query.as_str()), ("fmt", "json"), ("limit", "5")])
            .send()
            .await
            .context("MusicBrainz API request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("MusicBrainz API returned error: {}", response.status());
        }

        let search: RecordingSearchResponse = response
            .json()
            .await
            .context("Failed to parse MusicBrainz response")?;

        // Results come back best-match first; take the first one that knows
        // its length.
        let length = search
            .recordings
            .iter()
            .find_map(|recording| recording.length.filter(|&ms| ms > 0));

        debug!(
            artist = %artist,
            track = %track,
            candidates = search.recordings.len(),
            length_ms = length,
            "MusicBrainz search complete"
        );
        Ok(length)
    }
}

/// Escape characters with meaning in Lucene query syntax.
fn escape_lucene(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if "\\+-&|!(){}[]^\"~*?:/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait::async_trait]
impl DurationProvider for MusicBrainzProvider {
    fn name(&self) -> &'static str {
        "MusicBrainz"
    }

    async fn lookup(&self, artist: &str, track: &str) -> Option<u64> {
        match self.search_recording_length(artist, track).await {
            Ok(length) => length,
            Err(error) => {
                warn!(
                    artist = %artist,
                    track = %track,
                    error = %error,
                    "MusicBrainz lookup failed, treating duration as unknown"
                );
                None
            }
        }
    }
}
