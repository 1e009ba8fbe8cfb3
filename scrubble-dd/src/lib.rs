//! scrubble-dd library - Duplicate Detection engine
//!
//! Exposes the detection engine, detectors, and duration providers for
//! integration testing and for embedding in other tooling.

pub mod detectors;
pub mod engine;
pub mod input;
pub mod providers;
pub mod report;
pub mod resolve;
pub mod sessions;
pub mod types;

pub use engine::DetectionEngine;
pub use types::{DetectionResult, DuplicateReason, DurationProvider, FlaggedScrobble};
