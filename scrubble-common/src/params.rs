//! Detection threshold parameters
//!
//! The three detectors share a small set of tunable thresholds. The defaults
//! match the behavior the detectors were calibrated against; all three can be
//! overridden from a TOML file or adjusted programmatically.
//!
//! # Thresholds
//! - `gap_seconds`: idle gap that ends a listening session (default 1800)
//! - `overlap_fraction`: fraction of track duration below which a repeat play
//!   is physically impossible (default 0.9)
//! - `replay_fraction`: fraction of track duration below which a
//!   session-boundary replay is judged a skip rather than a re-listen
//!   (default 0.5)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_GAP_SECONDS: i64 = 1800;
const DEFAULT_OVERLAP_FRACTION: f64 = 0.9;
const DEFAULT_REPLAY_FRACTION: f64 = 0.5;

/// Tunable thresholds for one detection run.
///
/// The overlap and replay fractions are deliberately asymmetric: overlap
/// detection asserts physical impossibility and needs near-full duration,
/// while replay detection judges likely intent and accepts half.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Idle gap (seconds) separating listening sessions; inclusive boundary
    pub gap_seconds: i64,
    /// Fraction of track duration defining an impossible repeat (strict `<`)
    pub overlap_fraction: f64,
    /// Fraction of track duration defining a too-short boundary replay
    pub replay_fraction: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            gap_seconds: DEFAULT_GAP_SECONDS,
            overlap_fraction: DEFAULT_OVERLAP_FRACTION,
            replay_fraction: DEFAULT_REPLAY_FRACTION,
        }
    }
}

impl DetectionParams {
    /// Create params with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the session gap threshold. Values below 1 second are raised
    /// to 1 rather than rejected.
    pub fn with_gap_seconds(mut self, gap_seconds: i64) -> Self {
        self.gap_seconds = gap_seconds.max(1);
        self
    }

    /// Override the detector fractions, clamped to (0.0, 1.0].
    pub fn with_fractions(mut self, overlap_fraction: f64, replay_fraction: f64) -> Self {
        self.overlap_fraction = overlap_fraction.clamp(f64::MIN_POSITIVE, 1.0);
        self.replay_fraction = replay_fraction.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    /// Load params from a TOML file and validate them.
    ///
    /// Missing keys take their defaults, so a file overriding only
    /// `gap_seconds` is valid.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Toml` if it
    /// does not parse, or `Error::Config` if a value is out of range.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let params: DetectionParams = toml::from_str(&contents)?;
        params.validate()?;
        debug!(
            gap_seconds = params.gap_seconds,
            overlap_fraction = params.overlap_fraction,
            replay_fraction = params.replay_fraction,
            path = %path.display(),
            "Loaded detection params"
        );
        Ok(params)
    }

    /// Check that all thresholds are in range.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.gap_seconds <= 0 {
            return Err(Error::Config(format!(
                "gap_seconds must be positive, got {}",
                self.gap_seconds
            )));
        }
        if !(0.0..=1.0).contains(&self.overlap_fraction) || self.overlap_fraction == 0.0 {
            return Err(Error::Config(format!(
                "overlap_fraction must be in (0.0, 1.0], got {}",
                self.overlap_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.replay_fraction) || self.replay_fraction == 0.0 {
            return Err(Error::Config(format!(
                "replay_fraction must be in (0.0, 1.0], got {}",
                self.replay_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let params = DetectionParams::default();
        assert_eq!(params.gap_seconds, 1800);
        assert_eq!(params.overlap_fraction, 0.9);
        assert_eq!(params.replay_fraction, 0.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_with_gap_seconds_floors_at_one() {
        let params = DetectionParams::new().with_gap_seconds(0);
        assert_eq!(params.gap_seconds, 1);
    }

    #[test]
    fn test_with_fractions_clamps() {
        let params = DetectionParams::new().with_fractions(1.5, -0.2);
        assert_eq!(params.overlap_fraction, 1.0);
        assert!(params.replay_fraction > 0.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_gap() {
        let params = DetectionParams {
            gap_seconds: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_fraction() {
        let params = DetectionParams {
            overlap_fraction: 1.1,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = DetectionParams {
            replay_fraction: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_from_toml_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gap_seconds = 900").unwrap();

        let params = DetectionParams::from_toml_file(file.path()).unwrap();
        assert_eq!(params.gap_seconds, 900);
        // Unspecified keys keep their defaults
        assert_eq!(params.overlap_fraction, 0.9);
        assert_eq!(params.replay_fraction, 0.5);
    }

    #[test]
    fn test_from_toml_file_rejects_bad_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "overlap_fraction = 2.0").unwrap();

        assert!(DetectionParams::from_toml_file(file.path()).is_err());
    }

    #[test]
    fn test_from_toml_file_missing_file() {
        let result = DetectionParams::from_toml_file(Path::new("/nonexistent/params.toml"));
        assert!(result.is_err());
    }
}
