//! # Scrubble Common Library
//!
//! Shared code for the Scrubble crates including:
//! - The scrobble record and track identity types
//! - Detection threshold parameters
//! - Error types
//! - Human-readable time formatting

pub mod error;
pub mod human_time;
pub mod params;
pub mod scrobble;

pub use error::{Error, Result};
pub use params::DetectionParams;
pub use scrobble::{Scrobble, TrackKey};
