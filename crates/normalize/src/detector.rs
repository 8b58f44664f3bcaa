//! Detector identifiers and their verdict vocabularies.
//!
//! Each detector accepts a fixed set of backend labels (exact, case-sensitive) and
//! names the three numeric bands with its own verdicts. Extend the tables below when a
//! backend revision starts emitting a new label.

use serde::{Deserialize, Serialize};

use crate::verdict::{RiskBand, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    Image,
    News,
    Ecommerce,
    JobPosting,
}

/// Labels accepted from the image detector.
pub const IMAGE_LABELS: &[(&str, Verdict)] = &[
    ("AI Generated", Verdict::AiGenerated),
    ("Suspicious", Verdict::Suspicious),
    ("Human Made", Verdict::HumanMade),
];

/// Labels accepted from the news detector, including the fact-checker's
/// True/False/Uncertain verdicts in the casings it has been seen to emit.
pub const NEWS_LABELS: &[(&str, Verdict)] = &[
    ("Fake", Verdict::Fake),
    ("Suspicious", Verdict::Suspicious),
    ("Safe", Verdict::Safe),
    ("TRUE", Verdict::True),
    ("True", Verdict::True),
    ("true", Verdict::True),
    ("FALSE", Verdict::False),
    ("False", Verdict::False),
    ("false", Verdict::False),
    ("UNCERTAIN", Verdict::Uncertain),
    ("Uncertain", Verdict::Uncertain),
    ("uncertain", Verdict::Uncertain),
];

/// Labels accepted from the e-commerce detector.
pub const ECOMMERCE_LABELS: &[(&str, Verdict)] = &[
    ("Fake", Verdict::Fake),
    ("Unsafe", Verdict::Unsafe),
    ("Suspicious", Verdict::Suspicious),
    ("Safe", Verdict::Safe),
    ("CRITICAL", Verdict::Critical),
    ("HIGH", Verdict::High),
    ("MEDIUM", Verdict::Medium),
    ("LOW", Verdict::Low),
];

/// Labels accepted from the job posting detector.
pub const JOB_POSTING_LABELS: &[(&str, Verdict)] = &[
    ("Scam", Verdict::Scam),
    ("Suspicious", Verdict::Suspicious),
    ("Safe", Verdict::Safe),
    ("CRITICAL", Verdict::Critical),
    ("HIGH", Verdict::High),
    ("MEDIUM", Verdict::Medium),
    ("LOW", Verdict::Low),
];

impl Detector {
    pub const ALL: [Detector; 4] = [
        Detector::Image,
        Detector::News,
        Detector::Ecommerce,
        Detector::JobPosting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::News => "news",
            Self::Ecommerce => "ecommerce",
            Self::JobPosting => "job_posting",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "news" => Some(Self::News),
            "ecommerce" | "e-commerce" => Some(Self::Ecommerce),
            "job_posting" | "job-posting" | "job" | "jobs" => Some(Self::JobPosting),
            _ => None,
        }
    }

    pub fn labels(self) -> &'static [(&'static str, Verdict)] {
        match self {
            Self::Image => IMAGE_LABELS,
            Self::News => NEWS_LABELS,
            Self::Ecommerce => ECOMMERCE_LABELS,
            Self::JobPosting => JOB_POSTING_LABELS,
        }
    }

    /// Unrecognized labels map to [`Verdict::Unknown`]; so does the literal `"Unknown"`.
    pub fn lookup_label(self, label: &str) -> Verdict {
        self.labels()
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, verdict)| *verdict)
            .unwrap_or(Verdict::Unknown)
    }

    pub fn verdict_for_band(self, band: RiskBand) -> Verdict {
        match (self, band) {
            (_, RiskBand::Neutral) => Verdict::Suspicious,
            (Self::Image, RiskBand::Negative) => Verdict::HumanMade,
            (Self::Image, RiskBand::Positive) => Verdict::AiGenerated,
            (Self::News | Self::Ecommerce, RiskBand::Positive) => Verdict::Fake,
            (Self::JobPosting, RiskBand::Positive) => Verdict::Scam,
            (_, RiskBand::Negative) => Verdict::Safe,
        }
    }
}
