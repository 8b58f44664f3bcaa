use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sniff_common::error::SniffError;
use sniff_ingest::ScanError;

pub enum ApiError {
    Sniff(SniffError),
    Scan(ScanError),
}

impl From<SniffError> for ApiError {
    fn from(err: SniffError) -> Self {
        Self::Sniff(err)
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Rejected(inner) => Self::Sniff(inner),
            other => Self::Scan(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Sniff(SniffError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg }))
            }
            Self::Sniff(SniffError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            Self::Sniff(err @ SniffError::Config(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": err.to_string() }),
            ),
            Self::Scan(ScanError::Http { status, body }) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({
                    "error": format!("detector returned HTTP {}", status.as_u16()),
                    "upstream_status": status.as_u16(),
                    "detail": body,
                }),
            ),
            Self::Scan(other) => (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({ "error": other.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
