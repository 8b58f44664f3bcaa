//! Turns shape-varying detector payloads into one canonical, presentation-ready result.
//!
//! The pipeline is pure and synchronous: resolve the payload's shape, extract any
//! structured result embedded in free text, classify the verdict, normalize flags, and
//! assemble a [`CanonicalResult`]. Nothing here fails; every branch has a fallback.

pub mod assemble;
pub mod config;
pub mod detector;
pub mod extract;
pub mod flags;
pub mod result;
pub mod shape;
pub mod verdict;

pub use assemble::{normalize, normalize_with};
pub use config::{NormalizeConfig, Thresholds};
pub use detector::Detector;
pub use result::{CanonicalResult, Flag, Metrics, Severity, ShapeKind};
pub use shape::{resolve, Shape};
pub use verdict::{ConfidenceBand, RiskBand, Verdict};

/// A backend payload exactly as received; structurally opaque until resolved.
pub type RawResponse = serde_json::Value;
