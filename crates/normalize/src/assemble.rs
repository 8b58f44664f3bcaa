use serde_json::{Map, Value};

use crate::config::NormalizeConfig;
use crate::detector::Detector;
use crate::flags::{
    humanize, indicator_severity, normalize_flags, normalize_flags_as, report_flag,
    SIMILARITY_MATCHES, WARNINGS,
};
use crate::result::{CanonicalResult, Flag, Metrics, Severity, ShapeKind};
use crate::shape::{resolve, Section, Shape};
use crate::verdict::{
    clamp_percentage, classify_label, classify_score, normalize_score, parse_number, RiskBand,
    Verdict,
};

/// Embedded results may wrap further embedded results; past this depth the payload is
/// treated as unknown.
const MAX_NESTING: usize = 4;

const AI_KEYS: &[&str] = &["ai", "machine_generated"];
const HUMAN_KEYS: &[&str] = &["human", "human_generated"];
const VERIFICATION_LABEL_KEYS: &[&str] = &["verdict_overall", "verdict", "status"];
const VERIFICATION_TEXT_KEYS: &[&str] = &["verification_result", "explanation", "reason"];

pub fn normalize(detector: Detector, raw: &Value) -> CanonicalResult {
    normalize_with(&NormalizeConfig::default(), detector, raw)
}

/// Resolve, classify, and assemble. Total over every JSON value.
pub fn normalize_with(
    config: &NormalizeConfig,
    detector: Detector,
    raw: &Value,
) -> CanonicalResult {
    assemble(config, detector, raw, 0)
}

fn assemble(
    config: &NormalizeConfig,
    detector: Detector,
    raw: &Value,
    depth: usize,
) -> CanonicalResult {
    let shape = resolve(raw);
    tracing::debug!(
        detector = detector.as_str(),
        shape = shape.kind().as_str(),
        depth,
        "resolved payload shape"
    );

    match shape {
        Shape::Prediction {
            categories,
            metadata,
        } => from_prediction(config, detector, categories, metadata),
        Shape::DirectClassification(payload) => from_direct(config, detector, payload),
        Shape::EmbeddedText(extraction) => {
            if depth >= MAX_NESTING {
                return from_unknown(config, raw);
            }
            let inner = extraction.into_value();
            let mut result = assemble(config, detector, &inner, depth + 1);
            result.shape = ShapeKind::EmbeddedText;
            result
        }
        Shape::MultiSectionReport { payload, sections } => {
            from_sections(config, detector, payload, &sections)
        }
        Shape::Canonical(payload) => from_canonical(config, detector, payload),
        Shape::Verification(payload) => from_verification(config, detector, payload),
        Shape::Unknown(raw) => from_unknown(config, raw),
    }
}

fn from_prediction(
    config: &NormalizeConfig,
    detector: Detector,
    categories: &Map<String, Value>,
    metadata: Option<&Value>,
) -> CanonicalResult {
    let thresholds = &config.thresholds;
    let ai_score = first_number(categories, AI_KEYS)
        .or_else(|| {
            first_number(categories, HUMAN_KEYS).map(|human| 1.0 - probability(human))
        });

    let mut result = match ai_score {
        Some(ai) => {
            let c = classify_score(detector, ai, thresholds);
            CanonicalResult::new(c.verdict, c.risk_score, ShapeKind::Prediction, thresholds)
        }
        None => CanonicalResult::unknown(ShapeKind::Prediction, thresholds),
    };

    for (name, value) in categories {
        if let Some(p) = value.as_f64() {
            result.metrics.insert(humanize(name), normalize_score(p));
        }
    }

    if ai_score.is_some() {
        // Warning starts strictly above the negative edge, so the edge itself passes.
        let severity = if result.risk_score > thresholds.positive_above {
            Severity::Fail
        } else if result.risk_score > thresholds.negative_below {
            Severity::Warning
        } else {
            Severity::Pass
        };
        result.flags.push(Flag::new(
            "AI Generation Probability",
            severity,
            format!(
                "The model is {}% confident the image is AI-generated.",
                result.risk_score
            ),
        ));
    }
    result.flags.push(metadata_flag(metadata));
    result
}

/// Probabilities stay as-is; percentages are brought back to [0, 1].
fn probability(raw: f64) -> f64 {
    f64::from(normalize_score(raw)) / 100.0
}

fn metadata_flag(metadata: Option<&Value>) -> Flag {
    match metadata {
        Some(Value::Object(tags)) if !tags.is_empty() => Flag::new(
            "Metadata Verification",
            Severity::Pass,
            format!("Image carries {} EXIF tags.", tags.len()),
        ),
        Some(_) => Flag::new(
            "Metadata Verification",
            Severity::Warning,
            "No EXIF metadata was found in the image.",
        ),
        None => Flag::new(
            "Metadata Verification",
            Severity::Warning,
            "The backend did not report image metadata.",
        ),
    }
}

fn from_direct(
    config: &NormalizeConfig,
    detector: Detector,
    payload: &Map<String, Value>,
) -> CanonicalResult {
    let thresholds = &config.thresholds;
    let raw_score = payload.get("confidence_score").and_then(parse_number);
    let score = raw_score.map(normalize_score);

    let (verdict, risk_score) = match payload.get("risk_level") {
        Some(level) => {
            let verdict = classify_label(detector, level.as_str().unwrap_or_default());
            let risk = score
                .or_else(|| verdict.band().map(RiskBand::representative_score))
                .unwrap_or(0);
            (verdict, risk)
        }
        None => match raw_score {
            Some(raw) => {
                let c = classify_score(detector, raw, thresholds);
                (c.verdict, c.risk_score)
            }
            None => (Verdict::Unknown, 0),
        },
    };

    let mut result =
        CanonicalResult::new(verdict, risk_score, ShapeKind::DirectClassification, thresholds);

    if let Some(score) = score {
        result.metrics.insert("Confidence Score", score);
    }
    for key in ["checks", "verification_checks"] {
        if let Some(Value::Object(checks)) = payload.get(key) {
            for (name, check) in checks {
                if let Some(report) = check.as_object() {
                    insert_score(&mut result.metrics, name, report);
                }
            }
        }
    }

    let flags = &mut result.flags;
    if let Some(red_flags) = payload.get("red_flags") {
        flags.extend(normalize_flags(red_flags));
    }
    if let Some(warnings) = payload.get("warnings") {
        flags.extend(normalize_flags_as(warnings, WARNINGS));
    }
    if let Some(matches) = payload.get("similarity_matches") {
        flags.extend(normalize_flags_as(matches, SIMILARITY_MATCHES));
    }
    for key in ["checks", "verification_checks"] {
        if let Some(checks) = payload.get(key) {
            flags.extend(normalize_flags(checks));
        }
    }

    result.raw_excerpt = payload
        .get("final_prediction_reason")
        .and_then(Value::as_str)
        .map(str::to_owned);
    result.recommendations = string_list(payload.get("recommendations"));
    result
}

fn from_sections(
    config: &NormalizeConfig,
    detector: Detector,
    payload: &Map<String, Value>,
    sections: &[Section<'_>],
) -> CanonicalResult {
    let thresholds = &config.thresholds;
    let severities: Vec<Option<Severity>> = sections
        .iter()
        .map(|s| indicator_severity(s.report))
        .collect();
    let checked = severities.iter().flatten().count();
    let failed = severities
        .iter()
        .filter(|s| **s == Some(Severity::Fail))
        .count();
    let derived = if checked == 0 {
        0.0
    } else {
        failed as f64 * 100.0 / checked as f64
    };
    let risk_score = clamp_percentage(derived);

    let verdict = match payload.get("verdict") {
        Some(label) => classify_label(detector, label.as_str().unwrap_or_default()),
        None => classify_score(detector, f64::from(risk_score), thresholds).verdict,
    };

    let mut result =
        CanonicalResult::new(verdict, risk_score, ShapeKind::MultiSectionReport, thresholds);
    for section in sections {
        insert_score(&mut result.metrics, section.name, section.report);
        result.flags.push(report_flag(section.name, section.report));
    }
    result
}

fn from_canonical(
    config: &NormalizeConfig,
    detector: Detector,
    payload: &Map<String, Value>,
) -> CanonicalResult {
    let thresholds = &config.thresholds;
    let verdict = classify_label(
        detector,
        payload
            .get("verdict")
            .and_then(Value::as_str)
            .unwrap_or_default(),
    );
    let risk_score = payload
        .get("riskScore")
        .and_then(parse_number)
        .map(clamp_percentage)
        .unwrap_or(0);
    let shape = payload
        .get("shape")
        .and_then(Value::as_str)
        .and_then(ShapeKind::parse)
        .unwrap_or(ShapeKind::Canonical);

    let mut result = CanonicalResult::new(verdict, risk_score, shape, thresholds);
    if let Some(Value::Object(metrics)) = payload.get("metrics") {
        for (name, value) in metrics {
            if let Some(pct) = parse_number(value) {
                result.metrics.insert(name.clone(), clamp_percentage(pct));
            }
        }
    }
    if let Some(flags) = payload.get("flags") {
        result.flags = normalize_flags(flags);
    }
    result.raw_excerpt = payload
        .get("rawExcerpt")
        .and_then(Value::as_str)
        .map(str::to_owned);
    result.recommendations = string_list(payload.get("recommendations"));
    result
}

fn from_verification(
    config: &NormalizeConfig,
    detector: Detector,
    payload: &Map<String, Value>,
) -> CanonicalResult {
    let thresholds = &config.thresholds;
    // Some detectors wrap the structured report under `parsed_output`.
    let nested = payload.get("parsed_output").and_then(Value::as_object);
    let field = |key: &str| {
        payload
            .get(key)
            .or_else(|| nested.and_then(|inner| inner.get(key)))
    };
    let label = VERIFICATION_LABEL_KEYS
        .iter()
        .find_map(|key| field(*key).and_then(Value::as_str))
        .unwrap_or_default();
    let verdict = classify_label(detector, label);
    let confidence = field("confidence")
        .and_then(parse_number)
        .map(normalize_score);

    // Confidence is in the verdict, not in the risk; orient it by band.
    let risk_score = match (verdict.band(), confidence) {
        (None, _) => 0,
        (Some(RiskBand::Positive), Some(c)) => c,
        (Some(RiskBand::Negative), Some(c)) => 100 - c,
        (Some(band), _) => band.representative_score(),
    };

    let mut result =
        CanonicalResult::new(verdict, risk_score, ShapeKind::Verification, thresholds);
    if let Some(c) = confidence {
        result.metrics.insert("Confidence", c);
    }
    if let Some(Value::Array(claims)) = field("claims") {
        result.flags.extend(claims.iter().filter_map(claim_flag));
    }
    result.raw_excerpt = VERIFICATION_TEXT_KEYS
        .iter()
        .find_map(|key| field(*key).and_then(Value::as_str))
        .map(str::to_owned);
    result
}

fn claim_flag(claim: &Value) -> Option<Flag> {
    let claim = claim.as_object()?;
    let text = claim.get("claim_text").and_then(Value::as_str)?;
    let severity = match claim.get("evaluation").and_then(Value::as_str) {
        Some("Supported") => Severity::Pass,
        Some("Refuted") => Severity::Fail,
        _ => Severity::Warning,
    };
    Some(Flag::new("Claim", severity, text))
}

fn from_unknown(config: &NormalizeConfig, raw: &Value) -> CanonicalResult {
    let mut result = CanonicalResult::unknown(ShapeKind::Unknown, &config.thresholds);
    result.raw_excerpt = Some(match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    });
    result
}

fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| map.get(*key).and_then(parse_number))
}

/// A check's numeric `score` becomes a metric under its readable name.
fn insert_score(metrics: &mut Metrics, name: &str, report: &Map<String, Value>) {
    if let Some(score) = report.get("score").and_then(parse_number) {
        metrics.insert(humanize(name), normalize_score(score));
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
