//! Structural classification of raw payloads.
//!
//! Rules are evaluated top to bottom and the first match wins:
//!   1. `prediction` is a mapping of category → probability
//!   2. `risk_level` and/or `confidence_score` at the top level
//!   3. `result` holding a string (possibly wrapping JSON) or an object
//!   4. object-valued sub-reports carrying a suspicious/valid indicator
//!   5. an already-canonical result (`verdict` + `riskScore` + `confidenceBand`)
//!   6. a verification report (`status`, `verification_result`, `verdict_overall`,
//!      `verdict`, `explanation` or a nested `parsed_output`)
//!   7. anything else → `Unknown`
//!
//! The first four rules list the most informative shapes first; the pass-through and
//! verification rules sit after them so they never capture a payload an earlier rule
//! would have matched.

use serde_json::{Map, Value};

use crate::extract::{extract_embedded, Extraction};
use crate::flags::has_indicator;
use crate::result::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section<'a> {
    pub name: &'a str,
    pub report: &'a Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    Prediction {
        categories: &'a Map<String, Value>,
        metadata: Option<&'a Value>,
    },
    DirectClassification(&'a Map<String, Value>),
    EmbeddedText(Extraction),
    MultiSectionReport {
        payload: &'a Map<String, Value>,
        sections: Vec<Section<'a>>,
    },
    Canonical(&'a Map<String, Value>),
    Verification(&'a Map<String, Value>),
    Unknown(&'a Value),
}

impl Shape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Prediction { .. } => ShapeKind::Prediction,
            Self::DirectClassification(_) => ShapeKind::DirectClassification,
            Self::EmbeddedText(_) => ShapeKind::EmbeddedText,
            Self::MultiSectionReport { .. } => ShapeKind::MultiSectionReport,
            Self::Canonical(_) => ShapeKind::Canonical,
            Self::Verification(_) => ShapeKind::Verification,
            Self::Unknown(_) => ShapeKind::Unknown,
        }
    }
}

pub fn resolve(raw: &Value) -> Shape<'_> {
    let Some(payload) = raw.as_object() else {
        return Shape::Unknown(raw);
    };

    if let Some(categories) = prediction_categories(payload) {
        return Shape::Prediction {
            categories,
            metadata: payload.get("metadata"),
        };
    }
    if payload.contains_key("risk_level") || payload.contains_key("confidence_score") {
        return Shape::DirectClassification(payload);
    }
    if let Some(extraction) = embedded_result(payload) {
        return Shape::EmbeddedText(extraction);
    }
    if let Some(sections) = sub_reports(payload) {
        return Shape::MultiSectionReport { payload, sections };
    }
    if is_canonical(payload) {
        return Shape::Canonical(payload);
    }
    if is_verification(payload) {
        return Shape::Verification(payload);
    }
    Shape::Unknown(raw)
}

fn prediction_categories(payload: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let categories = payload.get("prediction")?.as_object()?;
    if categories.is_empty() || !categories.values().all(Value::is_number) {
        return None;
    }
    Some(categories)
}

fn embedded_result(payload: &Map<String, Value>) -> Option<Extraction> {
    match payload.get("result")? {
        Value::String(text) => Some(extract_embedded(text)),
        Value::Object(object) => Some(Extraction::Parsed(object.clone())),
        _ => None,
    }
}

fn sub_reports(payload: &Map<String, Value>) -> Option<Vec<Section<'_>>> {
    let sections: Vec<Section<'_>> = payload
        .iter()
        .filter_map(|(name, value)| {
            value.as_object().map(|report| Section {
                name: name.as_str(),
                report,
            })
        })
        .collect();

    if sections.iter().any(|s| has_indicator(s.report)) {
        Some(sections)
    } else {
        None
    }
}

fn is_canonical(payload: &Map<String, Value>) -> bool {
    ["verdict", "riskScore", "confidenceBand"]
        .iter()
        .all(|key| payload.contains_key(*key))
}

fn is_verification(payload: &Map<String, Value>) -> bool {
    [
        "verdict_overall",
        "verification_result",
        "status",
        "verdict",
        "explanation",
        "parsed_output",
    ]
    .iter()
    .any(|key| payload.contains_key(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prediction_mapping() {
        let raw = json!({"prediction": {"ai": 0.98, "human": 0.02}, "metadata": null});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Prediction);
    }

    #[test]
    fn prediction_must_be_numeric_mapping() {
        let raw = json!({"prediction": "ai"});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Unknown);

        let raw = json!({"prediction": {}});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Unknown);

        let raw = json!({"prediction": {"ai": "high"}});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Unknown);
    }

    #[test]
    fn direct_classification_on_either_key() {
        assert_eq!(
            resolve(&json!({"risk_level": "LOW"})).kind(),
            ShapeKind::DirectClassification
        );
        assert_eq!(
            resolve(&json!({"confidence_score": 12.5})).kind(),
            ShapeKind::DirectClassification
        );
    }

    #[test]
    fn embedded_text_string_and_object() {
        let raw = json!({"result": "text {\"status\": \"true\"}"});
        match resolve(&raw) {
            Shape::EmbeddedText(Extraction::Parsed(object)) => {
                assert_eq!(object.get("status"), Some(&json!("true")));
            }
            other => panic!("expected parsed embedded text, got {other:?}"),
        }

        let raw = json!({"result": {"status": "false"}});
        assert!(matches!(
            resolve(&raw),
            Shape::EmbeddedText(Extraction::Parsed(_))
        ));
    }

    #[test]
    fn embedded_text_without_json_is_degraded() {
        let raw = json!({"result": "no json here"});
        assert!(matches!(
            resolve(&raw),
            Shape::EmbeddedText(Extraction::Degraded(_))
        ));
    }

    #[test]
    fn multi_section_report() {
        let raw = json!({
            "domain": {"age_days": 12, "is_suspicious": true},
            "ssl": {"is_valid": true},
            "whois": {"suspicious": false},
            "patterns": {"issues": [], "is_suspicious": false},
            "risk_score": 1,
            "verdict": "Safe"
        });
        match resolve(&raw) {
            Shape::MultiSectionReport { sections, .. } => {
                let names: Vec<&str> = sections.iter().map(|s| s.name).collect();
                assert_eq!(names, vec!["domain", "ssl", "whois", "patterns"]);
            }
            other => panic!("expected multi-section report, got {other:?}"),
        }
    }

    #[test]
    fn objects_without_indicators_are_not_sub_reports() {
        let raw = json!({"domain": {"age_days": 12}});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Unknown);
    }

    #[test]
    fn earliest_rule_wins() {
        let raw = json!({
            "prediction": {"ai": 0.5},
            "risk_level": "HIGH",
            "result": "{}",
            "domain": {"is_suspicious": true}
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::Prediction);

        let raw = json!({
            "risk_level": "HIGH",
            "result": "{}",
            "domain": {"is_suspicious": true}
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::DirectClassification);

        let raw = json!({"result": "{}", "domain": {"is_suspicious": true}});
        assert_eq!(resolve(&raw).kind(), ShapeKind::EmbeddedText);

        let raw = json!({
            "domain": {"is_suspicious": true},
            "verdict": "Safe",
            "riskScore": 3,
            "confidenceBand": "Low",
            "status": "success"
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::MultiSectionReport);
    }

    #[test]
    fn canonical_before_verification() {
        let raw = json!({
            "verdict": "Fake",
            "riskScore": 90,
            "confidenceBand": "High",
            "metrics": {"Confidence": 90},
            "flags": [],
            "status": "ok"
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::Canonical);
    }

    #[test]
    fn verification_report() {
        let raw = json!({
            "status": "success",
            "verification_result": "The information is likely true",
            "confidence": 0.85,
            "timestamp": "2025-01-01T00:00:00"
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::Verification);
    }

    #[test]
    fn news_report_with_verdict_and_explanation() {
        let raw = json!({
            "verdict": "Uncertain",
            "explanation": "No corroborating sources were found",
            "parsed_output": {"verdict_overall": "Uncertain", "claims": []},
            "grounding_metadata": {}
        });
        assert_eq!(resolve(&raw).kind(), ShapeKind::Verification);

        let raw = json!({"parsed_output": {"verdict_overall": "True"}});
        assert_eq!(resolve(&raw).kind(), ShapeKind::Verification);
    }

    #[test]
    fn non_objects_are_unknown() {
        assert_eq!(resolve(&json!("plain text")).kind(), ShapeKind::Unknown);
        assert_eq!(resolve(&json!([1, 2])).kind(), ShapeKind::Unknown);
        assert_eq!(resolve(&Value::Null).kind(), ShapeKind::Unknown);
        assert_eq!(resolve(&json!({})).kind(), ShapeKind::Unknown);
    }
}
