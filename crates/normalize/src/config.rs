use serde::{Deserialize, Serialize};

/// Fixed band edges for numeric classification.
///
/// A score strictly above `positive_above` is a positive detection, strictly below
/// `negative_below` is negative, and everything in between (inclusive) is neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub positive_above: u8,
    pub negative_below: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive_above: 75,
            negative_below: 25,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
}
