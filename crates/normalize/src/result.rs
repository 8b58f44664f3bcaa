use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::Thresholds;
use crate::verdict::{ConfidenceBand, Verdict};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pass,
    #[default]
    Warning,
    Fail,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "warning" => Some(Self::Warning),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub label: String,
    pub severity: Severity,
    pub description: String,
}

impl Flag {
    pub fn new(
        label: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            severity,
            description: description.into(),
        }
    }
}

/// Ordered mapping of metric name to percentage. Serializes as a JSON object in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics(Vec<(String, u8)>);

impl Metrics {
    /// Re-inserting an existing name overwrites the value in place.
    pub fn insert(&mut self, name: impl Into<String>, percentage: u8) {
        let name = name.into();
        let percentage = percentage.min(100);
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = percentage,
            None => self.0.push((name, percentage)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, pct)| *pct)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(name, pct)| (name.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, pct) in &self.0 {
            map.serialize_entry(name, pct)?;
        }
        map.end()
    }
}

/// Which resolver rule produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Prediction,
    DirectClassification,
    EmbeddedText,
    MultiSectionReport,
    Canonical,
    Verification,
    Unknown,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prediction => "prediction",
            Self::DirectClassification => "direct_classification",
            Self::EmbeddedText => "embedded_text",
            Self::MultiSectionReport => "multi_section_report",
            Self::Canonical => "canonical",
            Self::Verification => "verification",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "prediction" => Some(Self::Prediction),
            "direct_classification" => Some(Self::DirectClassification),
            "embedded_text" => Some(Self::EmbeddedText),
            "multi_section_report" => Some(Self::MultiSectionReport),
            "canonical" => Some(Self::Canonical),
            "verification" => Some(Self::Verification),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// The single normalized structure handed to presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResult {
    pub verdict: Verdict,
    pub risk_score: u8,
    pub confidence_band: ConfidenceBand,
    pub metrics: Metrics,
    pub flags: Vec<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_excerpt: Option<String>,
    pub shape: ShapeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl CanonicalResult {
    /// Empty metrics and flags; the confidence band is derived from `risk_score`.
    pub fn new(
        verdict: Verdict,
        risk_score: u8,
        shape: ShapeKind,
        thresholds: &Thresholds,
    ) -> Self {
        let risk_score = risk_score.min(100);
        Self {
            verdict,
            risk_score,
            confidence_band: ConfidenceBand::from_score(risk_score, thresholds),
            metrics: Metrics::default(),
            flags: Vec::new(),
            raw_excerpt: None,
            shape,
            recommendations: Vec::new(),
        }
    }

    pub fn unknown(shape: ShapeKind, thresholds: &Thresholds) -> Self {
        Self::new(Verdict::Unknown, 0, shape, thresholds)
    }
}
