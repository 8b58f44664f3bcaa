use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::config::Thresholds;
use crate::detector::Detector;

/// The three-band structure every detector's verdicts map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskBand {
    Negative,
    Neutral,
    Positive,
}

impl RiskBand {
    /// Risk score used when a backend supplies a label but no score.
    pub fn representative_score(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Neutral => 50,
            Self::Positive => 100,
        }
    }
}

pub fn band_for_score(score: u8, thresholds: &Thresholds) -> RiskBand {
    if score > thresholds.positive_above {
        RiskBand::Positive
    } else if score < thresholds.negative_below {
        RiskBand::Negative
    } else {
        RiskBand::Neutral
    }
}

/// Canonical verdicts across all detectors. Which ones a detector may produce is
/// decided by its label table in [`crate::detector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    HumanMade,
    AiGenerated,
    Safe,
    Suspicious,
    Fake,
    Scam,
    Unsafe,
    Low,
    Medium,
    High,
    Critical,
    True,
    False,
    Uncertain,
    Unknown,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::HumanMade => "Human Made",
            Self::AiGenerated => "AI Generated",
            Self::Safe => "Safe",
            Self::Suspicious => "Suspicious",
            Self::Fake => "Fake",
            Self::Scam => "Scam",
            Self::Unsafe => "Unsafe",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Uncertain => "UNCERTAIN",
            Self::Unknown => "Unknown",
        }
    }

    /// `None` only for [`Verdict::Unknown`].
    pub fn band(self) -> Option<RiskBand> {
        match self {
            Self::HumanMade | Self::Safe | Self::Low | Self::True => Some(RiskBand::Negative),
            Self::Suspicious | Self::Medium | Self::Uncertain => Some(RiskBand::Neutral),
            Self::AiGenerated
            | Self::Fake
            | Self::Scam
            | Self::Unsafe
            | Self::High
            | Self::Critical
            | Self::False => Some(RiskBand::Positive),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn from_score(score: u8, thresholds: &Thresholds) -> Self {
        match band_for_score(score, thresholds) {
            RiskBand::Negative => Self::Low,
            RiskBand::Neutral => Self::Medium,
            RiskBand::Positive => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub risk_score: u8,
}

/// Discrete mode: exact, case-sensitive lookup in the detector's label table.
pub fn classify_label(detector: Detector, label: &str) -> Verdict {
    detector.lookup_label(label)
}

/// Numeric mode: normalize a probability or percentage, then band it.
pub fn classify_score(detector: Detector, raw: f64, thresholds: &Thresholds) -> Classification {
    let risk_score = normalize_score(raw);
    Classification {
        verdict: detector.verdict_for_band(band_for_score(risk_score, thresholds)),
        risk_score,
    }
}

/// Values in `[0, 1]` are probabilities and scale by 100; anything above 1 is
/// already a percentage. The result is always in `[0, 100]`.
pub fn normalize_score(raw: f64) -> u8 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let pct = if raw <= 1.0 { raw * 100.0 } else { raw };
    pct.round().min(100.0) as u8
}

/// Clamp a value that is already a percentage, without probability scaling.
pub fn clamp_percentage(raw: f64) -> u8 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round().min(100.0) as u8
}

/// Numbers, and strings holding a number (optionally suffixed with `%`).
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
}
