use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use sniff_common::error::SniffError;
use sniff_normalize::{normalize_with, CanonicalResult, Detector};

use crate::error::ApiError;
use crate::AppState;

/// Normalize a payload the caller already has, without contacting any detector.
///
/// Bodies that are not JSON are normalized as a plain string, the same way a
/// detector's non-JSON reply is.
pub async fn normalize_payload(
    State(state): State<AppState>,
    Path(detector): Path<String>,
    body: Bytes,
) -> Result<Json<CanonicalResult>, ApiError> {
    let detector = Detector::parse(&detector)
        .ok_or_else(|| SniffError::NotFound(format!("unknown detector: {detector}")))?;
    let raw = serde_json::from_slice::<Value>(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

    let result = normalize_with(state.scanner.normalize_config(), detector, &raw);
    tracing::debug!(
        detector = detector.as_str(),
        shape = result.shape.as_str(),
        verdict = result.verdict.label(),
        "normalized posted payload"
    );
    Ok(Json(result))
}
