use serde_json::{Map, Value};

use crate::result::{Flag, Severity};

/// How plain-string entries in a list become flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringEntries {
    pub label: &'static str,
    pub severity: Severity,
}

pub const RED_FLAGS: StringEntries = StringEntries {
    label: "Red Flag",
    severity: Severity::Fail,
};

pub const WARNINGS: StringEntries = StringEntries {
    label: "Warning",
    severity: Severity::Warning,
};

pub const SIMILARITY_MATCHES: StringEntries = StringEntries {
    label: "Similarity Match",
    severity: Severity::Warning,
};

const LABEL_KEYS: &[&str] = &["label", "type", "name", "check"];
const SEVERITY_KEYS: &[&str] = &["severity", "status"];
const DESCRIPTION_KEYS: &[&str] = &["description", "message", "detail", "reason"];

/// Normalize any supported flag representation, treating bare strings as red flags.
pub fn normalize_flags(source: &Value) -> Vec<Flag> {
    normalize_flags_as(source, RED_FLAGS)
}

/// Normalize a list of strings or records, or a check-name mapping, preserving source
/// order. Anything else yields an empty list.
pub fn normalize_flags_as(source: &Value, strings: StringEntries) -> Vec<Flag> {
    match source {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| list_entry(item, strings))
            .collect(),
        Value::Object(checks) => checks
            .iter()
            .map(|(name, entry)| check_entry(name, entry))
            .collect(),
        Value::String(text) if !text.trim().is_empty() => {
            vec![Flag::new(strings.label, strings.severity, text.clone())]
        }
        _ => Vec::new(),
    }
}

fn list_entry(item: &Value, strings: StringEntries) -> Option<Flag> {
    match item {
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(Flag::new(strings.label, strings.severity, text.clone())),
        Value::Object(record) => Some(record_entry(record)),
        Value::Null => None,
        other => Some(Flag::new(strings.label, strings.severity, other.to_string())),
    }
}

/// `{type, status, description}` records, and canonical `{label, severity, description}`.
fn record_entry(record: &Map<String, Value>) -> Flag {
    let label = first_str(record, LABEL_KEYS).unwrap_or("Check");
    let severity = first_str(record, SEVERITY_KEYS)
        .and_then(Severity::parse)
        .or_else(|| indicator_severity(record))
        .unwrap_or_default();
    let description = first_str(record, DESCRIPTION_KEYS).unwrap_or_default();
    Flag::new(label, severity, description)
}

fn check_entry(name: &str, entry: &Value) -> Flag {
    let label = humanize(name);
    match entry {
        Value::Object(report) => report_flag(name, report),
        Value::String(text) => Flag::new(label, Severity::default(), text.clone()),
        Value::Null => Flag::new(label, Severity::default(), ""),
        other => Flag::new(label, Severity::default(), other.to_string()),
    }
}

/// One flag for a named sub-report; severity comes from its boolean indicator.
pub fn report_flag(name: &str, report: &Map<String, Value>) -> Flag {
    let severity = indicator_severity(report).unwrap_or_default();
    Flag::new(humanize(name), severity, describe_report(report, severity))
}

/// Severity from a sub-report's boolean indicator: suspicious → fail, invalid or unsafe
/// → fail, otherwise pass. `None` when the report carries no indicator.
pub fn indicator_severity(report: &Map<String, Value>) -> Option<Severity> {
    for key in ["is_suspicious", "suspicious"] {
        if let Some(Value::Bool(flagged)) = report.get(key) {
            return Some(if *flagged { Severity::Fail } else { Severity::Pass });
        }
    }
    for key in ["is_valid", "safe"] {
        if let Some(Value::Bool(ok)) = report.get(key) {
            return Some(if *ok { Severity::Pass } else { Severity::Fail });
        }
    }
    None
}

pub fn has_indicator(report: &Map<String, Value>) -> bool {
    indicator_severity(report).is_some()
}

fn describe_report(report: &Map<String, Value>, severity: Severity) -> String {
    if let Some(error) = report.get("error").and_then(Value::as_str) {
        return error.to_owned();
    }
    if let Some(Value::Array(issues)) = report.get("issues") {
        let issues: Vec<&str> = issues.iter().filter_map(Value::as_str).collect();
        if !issues.is_empty() {
            return issues.join("; ");
        }
    }
    if let Some(text) = first_str(report, DESCRIPTION_KEYS) {
        return text.to_owned();
    }
    match severity {
        Severity::Fail => "Check flagged this as suspicious".to_owned(),
        Severity::Pass => "No issues detected".to_owned(),
        Severity::Warning => "No result reported for this check".to_owned(),
    }
}

fn first_str<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
}

/// `domain_age` → `Domain Age`, `sslCertificate` → `Ssl Certificate`.
pub fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_become_red_flags() {
        let flags = normalize_flags(&json!(["fake domain", "no contact info"]));
        assert_eq!(
            flags,
            vec![
                Flag::new("Red Flag", Severity::Fail, "fake domain"),
                Flag::new("Red Flag", Severity::Fail, "no contact info"),
            ]
        );
    }

    #[test]
    fn records_keep_their_fields() {
        let flags = normalize_flags(&json!([
            {"type": "SSL Security", "status": "pass", "description": "valid cert"},
            {"type": "Contact Information", "description": "missing"},
        ]));
        assert_eq!(flags[0], Flag::new("SSL Security", Severity::Pass, "valid cert"));
        assert_eq!(flags[1].severity, Severity::Warning);
        assert_eq!(flags[1].label, "Contact Information");
    }

    #[test]
    fn canonical_records_pass_through() {
        let flags = normalize_flags(&json!([
            {"label": "Red Flag", "severity": "fail", "description": "fake domain"}
        ]));
        assert_eq!(flags, vec![Flag::new("Red Flag", Severity::Fail, "fake domain")]);
    }

    #[test]
    fn unknown_status_defaults_to_warning() {
        let flags = normalize_flags(&json!([{"type": "X", "status": "maybe"}]));
        assert_eq!(flags[0].severity, Severity::Warning);
        assert_eq!(flags[0].description, "");
    }

    #[test]
    fn mapping_derives_severity_from_indicator() {
        let flags = normalize_flags(&json!({
            "domain_age": {"score": 80, "is_suspicious": true},
            "ssl": {"is_valid": true},
            "logo": {"suspicious": false},
            "safe_browsing": {"safe": false, "error": "API key missing"},
            "payment_methods": {"score": 40},
        }));
        let summary: Vec<(&str, Severity)> = flags
            .iter()
            .map(|f| (f.label.as_str(), f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Domain Age", Severity::Fail),
                ("Ssl", Severity::Pass),
                ("Logo", Severity::Pass),
                ("Safe Browsing", Severity::Fail),
                ("Payment Methods", Severity::Warning),
            ]
        );
        assert_eq!(flags[3].description, "API key missing");
    }

    #[test]
    fn invalid_is_fail() {
        let flags = normalize_flags(&json!({"ssl": {"is_valid": false}}));
        assert_eq!(flags[0].severity, Severity::Fail);
        assert_eq!(flags[0].description, "Check flagged this as suspicious");
    }

    #[test]
    fn mapping_preserves_source_order() {
        let flags = normalize_flags(&json!({
            "zeta": {"suspicious": true},
            "alpha": {"suspicious": false},
        }));
        assert_eq!(flags[0].label, "Zeta");
        assert_eq!(flags[1].label, "Alpha");
    }

    #[test]
    fn string_mapping_values_default_to_warning() {
        let flags = normalize_flags(&json!({"website_check": "Domain registered 12 days ago"}));
        assert_eq!(
            flags,
            vec![Flag::new("Website Check", Severity::Warning, "Domain registered 12 days ago")]
        );
    }

    #[test]
    fn issues_are_joined_into_description() {
        let flags = normalize_flags(&json!({
            "patterns": {"issues": ["typosquatting", "too many hyphens"], "is_suspicious": true}
        }));
        assert_eq!(flags[0].description, "typosquatting; too many hyphens");
    }

    #[test]
    fn custom_string_policy() {
        let flags = normalize_flags_as(&json!(["NEVER pay to apply"]), WARNINGS);
        assert_eq!(flags, vec![Flag::new("Warning", Severity::Warning, "NEVER pay to apply")]);
    }

    #[test]
    fn missing_or_odd_sources_yield_empty() {
        assert!(normalize_flags(&Value::Null).is_empty());
        assert!(normalize_flags(&json!(42)).is_empty());
        assert!(normalize_flags(&json!([])).is_empty());
        assert!(normalize_flags(&json!(["", null])).is_empty());
    }

    #[test]
    fn humanize_handles_common_styles() {
        assert_eq!(humanize("domain_age"), "Domain Age");
        assert_eq!(humanize("sslCertificate"), "Ssl Certificate");
        assert_eq!(humanize("safe-browsing"), "Safe Browsing");
        assert_eq!(humanize("SSL"), "SSL");
        assert_eq!(humanize("ai"), "Ai");
        assert_eq!(humanize(""), "");
    }
}
